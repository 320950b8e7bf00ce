//! User Notifications
//!
//! Transient toasts raised by failed operations.

use std::cell::RefCell;
use std::rc::Rc;

pub const TOAST_TTL_MS: u64 = 4000;

/// Sink for user-visible messages
pub trait Notifier {
    fn error(&self, message: &str);

    fn info(&self, message: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: ToastLevel,
    pub message: String,
    pub expires_at_ms: u64,
}

/// Ordered toast list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Notifications {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>, now_ms: u64, ttl_ms: u64) -> u64 {
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            level,
            message: message.into(),
            expires_at_ms: now_ms + ttl_ms,
        });
        self.next_id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    pub fn sweep(&mut self, now_ms: u64) {
        self.toasts.retain(|t| t.expires_at_ms > now_ms);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn errors(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(|t| t.level == ToastLevel::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Shared, clock-less notifications handle for non-UI callers and tests
#[derive(Clone, Debug, Default)]
pub struct SharedNotifications(Rc<RefCell<Notifications>>);

impl SharedNotifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Notifications {
        self.0.borrow().clone()
    }
}

impl Notifier for SharedNotifications {
    fn error(&self, message: &str) {
        self.0.borrow_mut().push(ToastLevel::Error, message, 0, TOAST_TTL_MS);
    }

    fn info(&self, message: &str) {
        self.0.borrow_mut().push(ToastLevel::Info, message, 0, TOAST_TTL_MS);
    }
}
