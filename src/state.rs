//! Reactive Adapters
//!
//! Bridges between the framework-free DnD core and Leptos signals: signal
//! backed lists, toast and pulse sinks with browser timers.

use std::collections::HashMap;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use kanban_dnd::{ListState, Notifications, Notifier, PulseCause, PulseRegistry, PulseSink, ToastLevel};

/// Milliseconds since the epoch, from the browser clock
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// A `Vec<T>` signal seen as the engine's shared list
pub struct SignalList<T: Send + Sync + 'static>(pub RwSignal<Vec<T>>);

impl<T: Send + Sync + 'static> Clone for SignalList<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for SignalList<T> {}

impl<T: Clone + Send + Sync + 'static> ListState<T> for SignalList<T> {
    fn snapshot(&self) -> Vec<T> {
        self.0.get_untracked()
    }

    fn replace(&self, items: Vec<T>) {
        self.0.set(items);
    }
}

/// Pending browser timeouts. Dropping a `Timeout` cancels it, so replacing
/// or removing an entry cancels that timer. Entries are never dropped from
/// inside their own callback.
#[derive(Default)]
pub struct Timers {
    toasts: HashMap<u64, Timeout>,
    pulses: HashMap<PulseCause, Timeout>,
}

impl Timers {
    pub fn cancel_all(&mut self) {
        self.toasts.clear();
        self.pulses.clear();
    }
}

pub type TimerStore = StoredValue<Timers, LocalStorage>;

/// Raises toasts and dismisses each one when its time is up
#[derive(Clone, Copy)]
pub struct ToastSink {
    toasts: RwSignal<Notifications>,
    ttl_ms: u64,
    timers: TimerStore,
}

impl ToastSink {
    pub fn new(toasts: RwSignal<Notifications>, ttl_ms: u64, timers: TimerStore) -> Self {
        Self { toasts, ttl_ms, timers }
    }

    fn push(&self, level: ToastLevel, message: &str) {
        let toasts = self.toasts;
        let Some(id) = toasts.try_update(|n| n.push(level, message, now_ms(), self.ttl_ms)) else {
            return;
        };
        let timeout = Timeout::new(self.ttl_ms as u32, move || {
            toasts.try_update(|n| n.dismiss(id));
        });
        let live: Vec<u64> = toasts.with_untracked(|n| n.toasts().iter().map(|t| t.id).collect());
        self.timers.try_update_value(|t| {
            // Fired or dismissed ones
            t.toasts.retain(|id, _| live.contains(id));
            t.toasts.insert(id, timeout);
        });
    }

    /// Close a toast early and cancel its timer
    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|n| n.dismiss(id));
        self.timers.try_update_value(|t| t.toasts.remove(&id));
    }
}

impl Notifier for ToastSink {
    fn error(&self, message: &str) {
        log::error!("[UI] {}", message);
        self.push(ToastLevel::Error, message);
    }

    fn info(&self, message: &str) {
        log::info!("[UI] {}", message);
        self.push(ToastLevel::Info, message);
    }
}

/// Marks pulses and schedules their token-checked expiry. A newer pulse of
/// the same cause cancels the older timer.
#[derive(Clone, Copy)]
pub struct PulseTimers {
    registry: RwSignal<PulseRegistry>,
    timers: TimerStore,
}

impl PulseTimers {
    pub fn new(registry: RwSignal<PulseRegistry>, timers: TimerStore) -> Self {
        Self { registry, timers }
    }
}

impl PulseSink for PulseTimers {
    fn pulse(&self, cause: PulseCause, id: u32) {
        let registry = self.registry;
        let now = now_ms();
        let Some(token) = registry.try_update(|r| r.mark(cause, id, now)) else {
            return;
        };
        let window = registry.with_untracked(|r| r.window_ms());
        let timeout = Timeout::new(window as u32, move || {
            registry.try_update(|r| r.expire(cause, token));
        });
        self.timers.try_update_value(|t| t.pulses.insert(cause, timeout));
    }
}
