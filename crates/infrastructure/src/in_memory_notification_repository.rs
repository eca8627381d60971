use std::collections::HashMap;

use async_trait::async_trait;
use approvia_application::NotificationRepository;
use approvia_core::{AppResult, UserId};
use approvia_domain::{Notification, NotificationId};
use tokio::sync::RwLock;

/// In-memory notification store.
#[derive(Debug, Default)]
pub struct InMemoryNotificationRepository {
    notifications: RwLock<HashMap<NotificationId, Notification>>,
}

impl InMemoryNotificationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notifications: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert(&self, notification: Notification) -> AppResult<()> {
        self.notifications
            .write()
            .await
            .insert(notification.id(), notification);
        Ok(())
    }

    async fn find(&self, notification_id: NotificationId) -> AppResult<Option<Notification>> {
        Ok(self
            .notifications
            .read()
            .await
            .get(&notification_id)
            .cloned())
    }

    async fn mark_read(&self, notification_id: NotificationId) -> AppResult<()> {
        if let Some(notification) = self.notifications.write().await.get_mut(&notification_id) {
            notification.mark_read();
        }
        Ok(())
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let mut notifications = self.notifications.write().await;
        let mut affected = 0;
        for notification in notifications.values_mut() {
            if notification.target_user_id() == user_id && !notification.is_read() {
                notification.mark_read();
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn unread_count(&self, user_id: UserId) -> AppResult<u64> {
        Ok(self
            .notifications
            .read()
            .await
            .values()
            .filter(|notification| {
                notification.target_user_id() == user_id && !notification.is_read()
            })
            .count() as u64)
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        let mut listed: Vec<Notification> = notifications
            .values()
            .filter(|notification| notification.target_user_id() == user_id)
            .cloned()
            .collect();
        listed.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use approvia_application::NotificationRepository;
    use approvia_core::UserId;
    use approvia_domain::{Notification, NotificationType};
    use chrono::Utc;

    use super::InMemoryNotificationRepository;

    fn notification_for(user_id: UserId) -> Notification {
        Notification::new(
            user_id,
            NotificationType::ApprovalRequest,
            "approval_package",
            "abc",
            "Review requested",
            "A package awaits your review.",
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn unread_counts_are_isolated_per_user() {
        let repository = InMemoryNotificationRepository::new();
        let alice = UserId::new();
        let bob = UserId::new();

        let alices = notification_for(alice);
        let alices_id = alices.id();
        assert!(repository.insert(alices).await.is_ok());
        assert!(repository.insert(notification_for(bob)).await.is_ok());
        assert!(repository.insert(notification_for(bob)).await.is_ok());

        assert!(repository.mark_read(alices_id).await.is_ok());
        assert_eq!(repository.unread_count(alice).await.ok(), Some(0));
        assert_eq!(repository.unread_count(bob).await.ok(), Some(2));
    }

    #[tokio::test]
    async fn mark_all_read_reports_affected_rows() {
        let repository = InMemoryNotificationRepository::new();
        let user = UserId::new();

        assert!(repository.insert(notification_for(user)).await.is_ok());
        assert!(repository.insert(notification_for(user)).await.is_ok());

        assert_eq!(repository.mark_all_read(user).await.ok(), Some(2));
        assert_eq!(repository.mark_all_read(user).await.ok(), Some(0));
        assert_eq!(repository.unread_count(user).await.ok(), Some(0));
    }
}
