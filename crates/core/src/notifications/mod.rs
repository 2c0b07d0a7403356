//! Notification requests raised by the engine.
//!
//! Delivery (push service, email) lives outside the engine; it only
//! receives fully rendered [`NotificationRequest`]s through a
//! [`NotificationDispatcher`].

mod notification_model;
mod notification_dispatcher;

pub use notification_dispatcher::{
    MockNotificationDispatcher, NoOpNotificationDispatcher, NotificationDispatcher,
};
pub use notification_model::{NotificationPayload, NotificationRequest};
