use std::sync::{Arc, Mutex, MutexGuard};

use super::NotificationRequest;

/// Hands notifications to the delivery channel.
///
/// `send` is fire-and-forget: implementations queue or log, and delivery
/// failures never reach the caller.
pub trait NotificationDispatcher: Send + Sync {
    fn send(&self, request: NotificationRequest);
}

/// Discards every notification.
#[derive(Clone, Default)]
pub struct NoOpNotificationDispatcher;

impl NotificationDispatcher for NoOpNotificationDispatcher {
    fn send(&self, _request: NotificationRequest) {}
}

/// Mock dispatcher for testing - collects sent notifications.
#[derive(Clone, Default)]
pub struct MockNotificationDispatcher {
    sent: Arc<Mutex<Vec<NotificationRequest>>>,
}

impl MockNotificationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<NotificationRequest>> {
        self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.guard().clone()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl NotificationDispatcher for MockNotificationDispatcher {
    fn send(&self, request: NotificationRequest) {
        self.guard().push(request);
    }
}
