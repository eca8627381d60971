use async_trait::async_trait;
use approvia_core::{AppResult, UserId};
use approvia_domain::{Notification, NotificationId};

/// Port for persisting per-user notifications.
///
/// Entries are append-only apart from the read flag.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persists one unread notification.
    async fn insert(&self, notification: Notification) -> AppResult<()>;

    /// Finds a notification by id.
    async fn find(&self, notification_id: NotificationId) -> AppResult<Option<Notification>>;

    /// Flips one notification's read flag.
    async fn mark_read(&self, notification_id: NotificationId) -> AppResult<()>;

    /// Flips the read flag on every unread notification of one user.
    ///
    /// Returns the number of notifications affected.
    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64>;

    /// Counts unread notifications for one user.
    async fn unread_count(&self, user_id: UserId) -> AppResult<u64>;

    /// Lists notifications for one user, newest first.
    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Notification>>;
}
