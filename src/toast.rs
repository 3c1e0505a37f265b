//! Ephemeral toast notifications.
//!
//! `ToastNotifier` is a generic notifier: it accepts any kind and expires
//! toasts by elapsed time. Product policy suppresses error toasts at render
//! time; that lives in `ToastPolicy`, a presentation filter over the
//! notifier, so the notifier itself stays policy-free.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: Instant,
    pub duration: Duration,
}

impl Toast {
    pub fn expired(&self) -> bool {
        self.shown_at.elapsed() >= self.duration
    }
}

#[derive(Default)]
pub struct ToastNotifier {
    current: Mutex<Option<Toast>>,
}

impl ToastNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(&self) -> MutexGuard<'_, Option<Toast>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Show a toast for the default duration, replacing any active one.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) {
        self.show_for(message, kind, DEFAULT_TOAST_DURATION);
    }

    pub fn show_for(&self, message: impl Into<String>, kind: ToastKind, duration: Duration) {
        *self.current() = Some(Toast {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
            duration,
        });
    }

    pub fn hide(&self) {
        *self.current() = None;
    }

    /// Active toast if any and not yet expired. Expired toasts are dropped
    /// on read.
    pub fn active(&self) -> Option<Toast> {
        let mut slot = self.current();
        if slot.as_ref().is_some_and(Toast::expired) {
            *slot = None;
        }
        slot.clone()
    }
}

/// Render-time filter over the notifier. The store still accepts and holds
/// error toasts; this layer just declines to surface them.
#[derive(Clone, Copy, Debug)]
pub struct ToastPolicy {
    pub suppress_errors: bool,
}

impl Default for ToastPolicy {
    fn default() -> Self {
        Self {
            suppress_errors: true,
        }
    }
}

impl ToastPolicy {
    pub fn presentable(&self, notifier: &ToastNotifier) -> Option<Toast> {
        let toast = notifier.active()?;
        if self.suppress_errors && toast.kind == ToastKind::Error {
            return None;
        }
        Some(toast)
    }
}
