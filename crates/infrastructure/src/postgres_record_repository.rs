use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use approvia_application::{
    AuditEvent, AuditTrailEntry, AuditTrailQuery, AuditTrailRepository, RecordRepository,
};
use approvia_core::{AppError, AppResult};
use approvia_domain::{Record, RecordCategory, RecordId};

/// PostgreSQL-backed record store.
///
/// Records live in a `records` table whose `data` column holds the full
/// serialized aggregate; the handful of extracted columns exist only for
/// listing and category pushdown. Every mutation writes its audit entry in
/// the same transaction.
#[derive(Clone)]
pub struct PostgresRecordRepository {
    pool: PgPool,
}

impl PostgresRecordRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Postgres>> {
        self.pool.begin().await.map_err(|error| {
            AppError::Storage(format!("failed to start record transaction: {error}"))
        })
    }

    async fn append_audit_entry(
        transaction: &mut Transaction<'_, Postgres>,
        event: &AuditEvent,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_entries (
                id,
                actor_id,
                action,
                entity_type,
                entity_id,
                detail,
                created_at
            )
            VALUES (gen_random_uuid(), $1, $2, $3, $4, $5, now())
            "#,
        )
        .bind(event.actor_id.as_uuid())
        .bind(event.action.as_str())
        .bind(event.entity_type.as_str())
        .bind(event.entity_id.as_str())
        .bind(event.detail.as_deref())
        .execute(&mut **transaction)
        .await
        .map_err(|error| AppError::Storage(format!("failed to append audit entry: {error}")))?;

        Ok(())
    }

    async fn upsert_record(
        transaction: &mut Transaction<'_, Postgres>,
        record: &Record,
    ) -> AppResult<()> {
        let data = serde_json::to_value(record).map_err(|error| {
            AppError::Internal(format!(
                "failed to serialize record '{}': {error}",
                record.id()
            ))
        })?;

        sqlx::query(
            r#"
            INSERT INTO records (id, category, status, created_at, updated_at, data)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id)
            DO UPDATE SET
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at,
                data = EXCLUDED.data
            "#,
        )
        .bind(record.id().as_uuid())
        .bind(record.category().as_str())
        .bind(record.status().as_str())
        .bind(record.created_at())
        .bind(record.updated_at())
        .bind(data)
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Storage(format!("failed to persist record '{}': {error}", record.id()))
        })?;

        Ok(())
    }

    async fn commit(transaction: Transaction<'_, Postgres>) -> AppResult<()> {
        transaction.commit().await.map_err(|error| {
            AppError::Storage(format!("failed to commit record transaction: {error}"))
        })
    }
}

#[derive(Debug, FromRow)]
struct RecordRow {
    data: serde_json::Value,
}

impl RecordRow {
    fn into_record(self) -> AppResult<Record> {
        serde_json::from_value(self.data)
            .map_err(|error| AppError::Internal(format!("failed to decode stored record: {error}")))
    }
}

#[async_trait]
impl RecordRepository for PostgresRecordRepository {
    async fn insert(&self, record: Record, event: AuditEvent) -> AppResult<()> {
        let mut transaction = self.begin().await?;
        Self::upsert_record(&mut transaction, &record).await?;
        Self::append_audit_entry(&mut transaction, &event).await?;
        Self::commit(transaction).await
    }

    async fn update(&self, record: Record, event: AuditEvent) -> AppResult<()> {
        let mut transaction = self.begin().await?;
        Self::upsert_record(&mut transaction, &record).await?;
        Self::append_audit_entry(&mut transaction, &event).await?;
        Self::commit(transaction).await
    }

    async fn delete(&self, record_id: RecordId, event: AuditEvent) -> AppResult<()> {
        let mut transaction = self.begin().await?;

        sqlx::query("DELETE FROM records WHERE id = $1")
            .bind(record_id.as_uuid())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Storage(format!("failed to delete record '{record_id}': {error}"))
            })?;

        Self::append_audit_entry(&mut transaction, &event).await?;
        Self::commit(transaction).await
    }

    async fn find(&self, record_id: RecordId) -> AppResult<Option<Record>> {
        let row = sqlx::query_as::<_, RecordRow>("SELECT data FROM records WHERE id = $1")
            .bind(record_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Storage(format!("failed to load record '{record_id}': {error}"))
            })?;

        row.map(RecordRow::into_record).transpose()
    }

    async fn list(&self, category: Option<RecordCategory>) -> AppResult<Vec<Record>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT data
            FROM records
            WHERE ($1::TEXT IS NULL OR category = $1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(category.map(|category| category.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to list records: {error}")))?;

        rows.into_iter().map(RecordRow::into_record).collect()
    }

    async fn allocate_issue_number(&self, year: i32) -> AppResult<u32> {
        let (value,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO issue_counters (year, value)
            VALUES ($1, 1)
            ON CONFLICT (year)
            DO UPDATE SET value = issue_counters.value + 1
            RETURNING value
            "#,
        )
        .bind(year)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Storage(format!(
                "failed to allocate issue number for year {year}: {error}"
            ))
        })?;

        u32::try_from(value).map_err(|error| {
            AppError::Internal(format!("issue counter for year {year} overflowed: {error}"))
        })
    }
}

/// PostgreSQL-backed repository for audit trail read models.
#[derive(Clone)]
pub struct PostgresAuditTrailRepository {
    pool: PgPool,
}

impl PostgresAuditTrailRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AuditTrailRow {
    event_id: uuid::Uuid,
    actor_id: uuid::Uuid,
    action: String,
    entity_type: String,
    entity_id: String,
    detail: Option<String>,
    created_at: String,
}

#[async_trait]
impl AuditTrailRepository for PostgresAuditTrailRepository {
    async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
        query: AuditTrailQuery,
    ) -> AppResult<Vec<AuditTrailEntry>> {
        let capped_limit = query.limit.clamp(1, 200) as i64;
        let capped_offset = query.offset.min(5_000) as i64;
        let rows = sqlx::query_as::<_, AuditTrailRow>(
            r#"
            SELECT
                id AS event_id,
                actor_id,
                action,
                entity_type,
                entity_id,
                detail,
                to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at
            FROM audit_entries
            WHERE entity_type = $1
              AND entity_id = $2
            ORDER BY created_at DESC, id DESC
            LIMIT $3
            OFFSET $4
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .bind(capped_limit)
        .bind(capped_offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Storage(format!("failed to list audit entries: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| AuditTrailEntry {
                event_id: row.event_id.to_string(),
                actor_id: row.actor_id.to_string(),
                action: row.action,
                entity_type: row.entity_type,
                entity_id: row.entity_id,
                detail: row.detail,
                created_at: row.created_at,
            })
            .collect())
    }
}
