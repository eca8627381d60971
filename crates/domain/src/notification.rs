use std::fmt::{Display, Formatter};
use std::str::FromStr;

use approvia_core::{AppError, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a random notification identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a notification identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for NotificationId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Kind of per-user alert derived from a lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// A record was assigned to the target user.
    Assignment,
    /// The target user is asked to review a record.
    ApprovalRequest,
    /// A decision was made on a record the target user owns.
    ApprovalResult,
    /// The target user was mentioned in a comment.
    Mention,
    /// A comment was added to a record the target user follows.
    Comment,
    /// A quality issue was assigned to the target user.
    IssueAssigned,
}

impl NotificationType {
    /// Returns a stable storage value for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assignment => "assignment",
            Self::ApprovalRequest => "approval_request",
            Self::ApprovalResult => "approval_result",
            Self::Mention => "mention",
            Self::Comment => "comment",
            Self::IssueAssigned => "issue_assigned",
        }
    }
}

impl FromStr for NotificationType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "assignment" => Ok(Self::Assignment),
            "approval_request" => Ok(Self::ApprovalRequest),
            "approval_result" => Ok(Self::ApprovalResult),
            "mention" => Ok(Self::Mention),
            "comment" => Ok(Self::Comment),
            "issue_assigned" => Ok(Self::IssueAssigned),
            _ => Err(AppError::Validation(format!(
                "unknown notification type '{value}'"
            ))),
        }
    }
}

/// A per-user alert with a read/unread flag.
///
/// Append-only apart from the read flag; notifications are never deleted
/// by ordinary flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    id: NotificationId,
    target_user_id: UserId,
    notification_type: NotificationType,
    related_entity_type: String,
    related_entity_id: String,
    title: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification.
    #[must_use]
    pub fn new(
        target_user_id: UserId,
        notification_type: NotificationType,
        related_entity_type: impl Into<String>,
        related_entity_id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            target_user_id,
            notification_type,
            related_entity_type: related_entity_type.into(),
            related_entity_id: related_entity_id.into(),
            title: title.into(),
            message: message.into(),
            is_read: false,
            created_at: now,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the user this notification belongs to.
    #[must_use]
    pub fn target_user_id(&self) -> UserId {
        self.target_user_id
    }

    /// Returns the notification type.
    #[must_use]
    pub fn notification_type(&self) -> NotificationType {
        self.notification_type
    }

    /// Returns the related entity type label.
    #[must_use]
    pub fn related_entity_type(&self) -> &str {
        self.related_entity_type.as_str()
    }

    /// Returns the related entity identifier.
    #[must_use]
    pub fn related_entity_id(&self) -> &str {
        self.related_entity_id.as_str()
    }

    /// Returns the short title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the message body.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns whether the notification has been read.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.is_read
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Flips the read flag, the only permitted mutation.
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}

#[cfg(test)]
mod tests {
    use approvia_core::UserId;
    use chrono::Utc;

    use super::{Notification, NotificationType};

    #[test]
    fn notification_starts_unread() {
        let notification = Notification::new(
            UserId::new(),
            NotificationType::Assignment,
            "change_request",
            "abc",
            "Assigned to you",
            "You were assigned a change request.",
            Utc::now(),
        );
        assert!(!notification.is_read());
    }

    #[test]
    fn mark_read_flips_only_the_flag() {
        let mut notification = Notification::new(
            UserId::new(),
            NotificationType::Comment,
            "quality_issue",
            "abc",
            "New comment",
            "A comment was added.",
            Utc::now(),
        );
        let created_at = notification.created_at();
        notification.mark_read();
        assert!(notification.is_read());
        assert_eq!(notification.created_at(), created_at);
    }
}
