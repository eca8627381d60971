use approvia_domain::Notification;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// API representation of a notification.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub notification_type: String,
    pub related_entity_type: String,
    pub related_entity_id: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id().to_string(),
            notification_type: notification.notification_type().as_str().to_owned(),
            related_entity_type: notification.related_entity_type().to_owned(),
            related_entity_id: notification.related_entity_id().to_owned(),
            title: notification.title().to_owned(),
            message: notification.message().to_owned(),
            is_read: notification.is_read(),
            created_at: notification.created_at(),
        }
    }
}

/// Unread notification count for the caller.
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: u64,
}

/// Number of notifications flipped by a read-all command.
#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}
