//! Transient toast notifications.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};

use crate::error::{Action, AppError};

/// How long a toast stays visible.
pub const TOAST_TTL_SECS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    /// True once the toast has been shown for the full TTL.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.created_at >= Duration::seconds(TOAST_TTL_SECS)
    }
}

#[derive(Debug, Default)]
struct Toasts {
    next_id: u64,
    active: Vec<Toast>,
}

/// Shared toast queue. Clones refer to the same queue.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    toasts: Arc<Mutex<Toasts>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a toast stamped with the current time and returns its id.
    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.push_at(kind, message, Utc::now())
    }

    /// Queues a toast stamped `now`. Toasts that expired by `now` are dropped.
    pub fn push_at(&self, kind: ToastKind, message: impl Into<String>, now: DateTime<Utc>) -> u64 {
        let message = message.into();
        match kind {
            ToastKind::Error => warn!("Toast: {}", message),
            _ => info!("Toast: {}", message),
        }
        let mut toasts = self.toasts.lock().unwrap_or_else(PoisonError::into_inner);
        toasts.active.retain(|toast| !toast.is_expired(now));
        toasts.next_id += 1;
        let id = toasts.next_id;
        toasts.active.push(Toast {
            id,
            message,
            kind,
            created_at: now,
        });
        id
    }

    /// Queues a success toast.
    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    /// Queues an error toast.
    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    /// Queues an informational toast.
    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, message)
    }

    /// Error toast for a failed mutation; 403s name the required role.
    pub fn failure(&self, action: Action, error: &AppError) -> u64 {
        self.error(error.user_message(action))
    }

    /// Removes one toast, e.g. when its close button is clicked.
    pub fn dismiss(&self, id: u64) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .retain(|toast| toast.id != id);
    }

    /// Drops toasts older than the TTL as of `now`.
    pub fn prune(&self, now: DateTime<Utc>) {
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .retain(|toast| !toast.is_expired(now));
    }

    /// Toasts still visible, oldest first.
    pub fn active(&self) -> Vec<Toast> {
        self.prune(Utc::now());
        self.toasts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .clone()
    }

    /// The most recent visible toast.
    pub fn last(&self) -> Option<Toast> {
        self.active().pop()
    }
}
