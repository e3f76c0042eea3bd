//! Transient notifications

use std::time::{Duration, Instant};

/// Channel for user-facing success/error messages
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn notify_success(&mut self, message: &str);
    fn notify_error(&mut self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A message that disappears on its own
#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub created_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }
}

/// Queue of live toasts, newest last
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    success_duration: Duration,
    error_duration: Duration,
}

impl ToastQueue {
    /// Lifetime of error toasts
    pub const ERROR_DURATION: Duration = Duration::from_millis(5000);
    /// Live toasts beyond this are dropped oldest first
    const MAX_TOASTS: usize = 5;

    pub fn new(success_duration: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            success_duration,
            error_duration: Self::ERROR_DURATION,
        }
    }

    fn push(&mut self, kind: ToastKind, message: &str, duration: Duration) {
        self.toasts.push(Toast {
            kind,
            message: message.to_string(),
            created_at: Instant::now(),
            duration,
        });
        if self.toasts.len() > Self::MAX_TOASTS {
            self.toasts.remove(0);
        }
    }

    /// Drop expired toasts
    pub fn prune(&mut self) {
        self.toasts.retain(|t| !t.is_expired());
    }

    /// The toast to display, if any
    pub fn current(&self) -> Option<&Toast> {
        self.toasts.iter().rev().find(|t| !t.is_expired())
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

impl Notifier for ToastQueue {
    fn notify_success(&mut self, message: &str) {
        self.push(ToastKind::Success, message, self.success_duration);
    }

    fn notify_error(&mut self, message: &str) {
        self.push(ToastKind::Error, message, self.error_duration);
    }
}
