//! Pulse Registry
//!
//! Short-lived "just happened" markers per cause. Each mark carries a token;
//! an expiry only clears the slot when the token still matches, so an older
//! pulse's timer never clobbers a newer pulse.

/// Default lifetime of a pulse
pub const PULSE_WINDOW_MS: u64 = 1500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PulseCause {
    Dropped,
    Created,
    Saved,
}

/// Where services report "just happened" events
pub trait PulseSink {
    fn pulse(&self, cause: PulseCause, id: u32);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pulse {
    pub id: u32,
    pub token: u64,
    pub expires_at_ms: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PulseRegistry {
    window_ms: u64,
    next_token: u64,
    dropped: Option<Pulse>,
    created: Option<Pulse>,
    saved: Option<Pulse>,
}

impl Default for PulseRegistry {
    fn default() -> Self {
        Self::new(PULSE_WINDOW_MS)
    }
}

impl PulseRegistry {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            next_token: 0,
            dropped: None,
            created: None,
            saved: None,
        }
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    fn slot(&self, cause: PulseCause) -> &Option<Pulse> {
        match cause {
            PulseCause::Dropped => &self.dropped,
            PulseCause::Created => &self.created,
            PulseCause::Saved => &self.saved,
        }
    }

    fn slot_mut(&mut self, cause: PulseCause) -> &mut Option<Pulse> {
        match cause {
            PulseCause::Dropped => &mut self.dropped,
            PulseCause::Created => &mut self.created,
            PulseCause::Saved => &mut self.saved,
        }
    }

    /// Record a pulse, replacing the previous one for this cause.
    /// Returns the token an expiry timer must present.
    pub fn mark(&mut self, cause: PulseCause, id: u32, now_ms: u64) -> u64 {
        self.next_token += 1;
        let token = self.next_token;
        *self.slot_mut(cause) = Some(Pulse {
            id,
            token,
            expires_at_ms: now_ms + self.window_ms,
        });
        token
    }

    pub fn mark_dropped(&mut self, id: u32, now_ms: u64) -> u64 {
        self.mark(PulseCause::Dropped, id, now_ms)
    }

    pub fn mark_created(&mut self, id: u32, now_ms: u64) -> u64 {
        self.mark(PulseCause::Created, id, now_ms)
    }

    pub fn mark_saved(&mut self, id: u32, now_ms: u64) -> u64 {
        self.mark(PulseCause::Saved, id, now_ms)
    }

    pub fn current(&self, cause: PulseCause) -> Option<Pulse> {
        *self.slot(cause)
    }

    pub fn is_pulsing(&self, cause: PulseCause, id: u32) -> bool {
        matches!(self.slot(cause), Some(p) if p.id == id)
    }

    /// Compare-and-clear. Returns true when the slot was cleared.
    pub fn expire(&mut self, cause: PulseCause, token: u64) -> bool {
        let slot = self.slot_mut(cause);
        if slot.as_ref().is_some_and(|p| p.token == token) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Drop every pulse whose deadline has passed
    pub fn sweep(&mut self, now_ms: u64) {
        for cause in [PulseCause::Dropped, PulseCause::Created, PulseCause::Saved] {
            let slot = self.slot_mut(cause);
            if slot.as_ref().is_some_and(|p| p.expires_at_ms <= now_ms) {
                *slot = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.dropped = None;
        self.created = None;
        self.saved = None;
    }
}
