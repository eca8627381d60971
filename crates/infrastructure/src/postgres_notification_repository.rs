use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use approvia_application::NotificationRepository;
use approvia_core::{AppError, AppResult, UserId};
use approvia_domain::{Notification, NotificationId};

/// PostgreSQL-backed notification store.
#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    data: serde_json::Value,
}

impl NotificationRow {
    fn into_notification(self) -> AppResult<Notification> {
        serde_json::from_value(self.data).map_err(|error| {
            AppError::Internal(format!("failed to decode stored notification: {error}"))
        })
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn insert(&self, notification: Notification) -> AppResult<()> {
        let data = serde_json::to_value(&notification).map_err(|error| {
            AppError::Internal(format!(
                "failed to serialize notification '{}': {error}",
                notification.id()
            ))
        })?;

        sqlx::query(
            r#"
            INSERT INTO notifications (id, target_user_id, is_read, created_at, data)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(notification.id().as_uuid())
        .bind(notification.target_user_id().as_uuid())
        .bind(notification.is_read())
        .bind(notification.created_at())
        .bind(data)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Storage(format!(
                "failed to persist notification '{}': {error}",
                notification.id()
            ))
        })?;

        Ok(())
    }

    async fn find(&self, notification_id: NotificationId) -> AppResult<Option<Notification>> {
        let row =
            sqlx::query_as::<_, NotificationRow>("SELECT data FROM notifications WHERE id = $1")
                .bind(notification_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Storage(format!(
                        "failed to load notification '{notification_id}': {error}"
                    ))
                })?;

        row.map(NotificationRow::into_notification).transpose()
    }

    async fn mark_read(&self, notification_id: NotificationId) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE,
                data = jsonb_set(data, '{is_read}', 'true'::JSONB)
            WHERE id = $1
            "#,
        )
        .bind(notification_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Storage(format!(
                "failed to mark notification '{notification_id}' read: {error}"
            ))
        })?;

        Ok(())
    }

    async fn mark_all_read(&self, user_id: UserId) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE,
                data = jsonb_set(data, '{is_read}', 'true'::JSONB)
            WHERE target_user_id = $1
              AND is_read = FALSE
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Storage(format!(
                "failed to mark notifications read for user '{user_id}': {error}"
            ))
        })?;

        Ok(result.rows_affected())
    }

    async fn unread_count(&self, user_id: UserId) -> AppResult<u64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM notifications
            WHERE target_user_id = $1
              AND is_read = FALSE
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Storage(format!(
                "failed to count unread notifications for user '{user_id}': {error}"
            ))
        })?;

        Ok(count.max(0) as u64)
    }

    async fn list_for_user(&self, user_id: UserId) -> AppResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT data
            FROM notifications
            WHERE target_user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Storage(format!(
                "failed to list notifications for user '{user_id}': {error}"
            ))
        })?;

        rows.into_iter()
            .map(NotificationRow::into_notification)
            .collect()
    }
}
