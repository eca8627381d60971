use async_trait::async_trait;
use approvia_core::AppResult;
use approvia_domain::{Record, RecordCategory, RecordId};

use super::AuditEvent;

/// Port for persisting records together with their audit events.
///
/// Every mutating method takes the audit event describing it and must
/// apply both as one unit: a state change without its audit entry (or the
/// reverse) must be impossible to observe. A persistence failure surfaces
/// as [`approvia_core::AppError::Storage`] and aborts the whole command.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Persists a new record and its creation event.
    async fn insert(&self, record: Record, event: AuditEvent) -> AppResult<()>;

    /// Persists a mutated record and the event describing the mutation.
    async fn update(&self, record: Record, event: AuditEvent) -> AppResult<()>;

    /// Removes a record while keeping its audit history, deletion event
    /// included.
    async fn delete(&self, record_id: RecordId, event: AuditEvent) -> AppResult<()>;

    /// Finds a record by id.
    async fn find(&self, record_id: RecordId) -> AppResult<Option<Record>>;

    /// Lists records, optionally limited to one category.
    async fn list(&self, category: Option<RecordCategory>) -> AppResult<Vec<Record>>;

    /// Returns the next quality-issue sequence number for a year.
    ///
    /// Implementations must serialize allocation (a monotonic per-year
    /// counter), never derive the number from a count of existing rows;
    /// concurrent creations must not observe the same value.
    async fn allocate_issue_number(&self, year: i32) -> AppResult<u32>;
}
