use std::sync::Arc;

use approvia_core::{AppError, AppResult, Principal};
use approvia_domain::{Notification, NotificationId};

use crate::notification_ports::NotificationRepository;

/// User-facing notification reads and read-flag commands.
///
/// Strictly user-scoped: every operation touches only the requesting
/// principal's notifications. The administrative visibility bypass for
/// records does not extend here; an admin cannot read or flip another
/// user's notifications.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    /// Creates a notification service.
    #[must_use]
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    /// Lists the principal's notifications, newest first.
    pub async fn list(&self, principal: &Principal) -> AppResult<Vec<Notification>> {
        self.repository.list_for_user(principal.user_id()).await
    }

    /// Counts the principal's unread notifications.
    pub async fn unread_count(&self, principal: &Principal) -> AppResult<u64> {
        self.repository.unread_count(principal.user_id()).await
    }

    /// Marks one of the principal's notifications as read.
    pub async fn mark_read(
        &self,
        principal: &Principal,
        notification_id: NotificationId,
    ) -> AppResult<()> {
        let notification = self
            .repository
            .find(notification_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("notification '{notification_id}' does not exist"))
            })?;

        if notification.target_user_id() != principal.user_id() {
            return Err(AppError::Forbidden(
                "notifications can only be read by their target user".to_owned(),
            ));
        }

        self.repository.mark_read(notification_id).await
    }

    /// Marks every unread notification of the principal as read.
    ///
    /// Returns the number of notifications affected.
    pub async fn mark_all_read(&self, principal: &Principal) -> AppResult<u64> {
        self.repository.mark_all_read(principal.user_id()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use approvia_core::{AppError, AppResult, Principal, Role, UserId};
    use approvia_domain::{Notification, NotificationId, NotificationType};
    use chrono::Utc;
    use tokio::sync::Mutex;

    use crate::notification_ports::NotificationRepository;

    use super::NotificationService;

    struct FakeNotificationRepository {
        notifications: Mutex<Vec<Notification>>,
    }

    impl FakeNotificationRepository {
        fn new() -> Self {
            Self {
                notifications: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NotificationRepository for FakeNotificationRepository {
        async fn insert(&self, notification: Notification) -> AppResult<()> {
            self.notifications.lock().await.push(notification);
            Ok(())
        }

        async fn find(&self, notification_id: NotificationId) -> AppResult<Option<Notification>> {
            Ok(self
                .notifications
                .lock()
                .await
                .iter()
                .find(|notification| notification.id() == notification_id)
                .cloned())
        }

        async fn mark_read(&self, notification_id: NotificationId) -> AppResult<()> {
            let mut notifications = self.notifications.lock().await;
            for notification in notifications.iter_mut() {
                if notification.id() == notification_id {
                    notification.mark_read();
                }
            }
            Ok(())
        }

        async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
            let mut notifications = self.notifications.lock().await;
            let mut affected = 0;
            for notification in notifications.iter_mut() {
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
                .lock()
                .await
                .iter()
                .filter(|notification| {
                    notification.target_user_id() == user_id && !notification.is_read()
                })
                .count() as u64)
        }

        async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
            Ok(self
                .notifications
                .lock()
                .await
                .iter()
                .filter(|notification| notification.target_user_id() == user_id)
                .cloned()
                .collect())
        }
    }

    fn notification_for(user_id: UserId) -> Notification {
        Notification::new(
            user_id,
            NotificationType::Assignment,
            "change_request",
            "abc",
            "Assigned",
            "A record was assigned to you.",
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn mark_read_touches_only_the_target_users_entry() {
        let repository = Arc::new(FakeNotificationRepository::new());
        let service = NotificationService::new(repository.clone());

        let alice = Principal::new(UserId::new(), Role::Contributor, "quality");
        let bob = Principal::new(UserId::new(), Role::Contributor, "quality");

        let alices = notification_for(alice.user_id());
        let alices_id = alices.id();
        assert!(repository.insert(alices).await.is_ok());
        assert!(
            repository
                .insert(notification_for(bob.user_id()))
                .await
                .is_ok()
        );

        assert!(service.mark_read(&alice, alices_id).await.is_ok());
        assert_eq!(service.unread_count(&alice).await.unwrap_or(99), 0);
        assert_eq!(service.unread_count(&bob).await.unwrap_or(99), 1);
    }

    #[tokio::test]
    async fn admin_cannot_read_another_users_notification() {
        let repository = Arc::new(FakeNotificationRepository::new());
        let service = NotificationService::new(repository.clone());

        let owner = UserId::new();
        let notification = notification_for(owner);
        let notification_id = notification.id();
        assert!(repository.insert(notification).await.is_ok());

        let admin = Principal::new(UserId::new(), Role::Admin, "it");
        let denied = service.mark_read(&admin, notification_id).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));
        assert!(service.list(&admin).await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn missing_notification_is_not_found() {
        let service = NotificationService::new(Arc::new(FakeNotificationRepository::new()));
        let principal = Principal::new(UserId::new(), Role::Contributor, "quality");

        let missing = service.mark_read(&principal, NotificationId::new()).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }
}
