//! Notification delivery for the worker: renders and logs push requests.

use tradedesk_core::notifications::{NotificationDispatcher, NotificationRequest};

/// Writes each notification to the log. Tokens are shortened.
pub struct LogNotificationDispatcher;

impl NotificationDispatcher for LogNotificationDispatcher {
    fn send(&self, request: NotificationRequest) {
        tracing::info!(
            account_id = %request.account_id,
            alert_id = %request.alert_id,
            device = %redact(&request.device_token),
            "Push notification: {} - {}",
            request.title(),
            request.body()
        );
    }
}

fn redact(token: &str) -> String {
    let visible: String = token.chars().take(8).collect();
    if visible.len() < token.len() {
        format!("{}...", visible)
    } else {
        visible
    }
}
