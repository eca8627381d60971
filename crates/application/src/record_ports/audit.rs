use async_trait::async_trait;
use approvia_core::{AppResult, UserId};
use approvia_domain::AuditAction;

/// Immutable audit event payload emitted by workflow commands.
///
/// Persisted by [`super::RecordRepository`] atomically with the record
/// mutation it describes; exactly one event per mutating command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Acting user.
    pub actor_id: UserId,
    /// Stable audit action identifier.
    pub action: AuditAction,
    /// Entity type label, the record category storage value.
    pub entity_type: String,
    /// Entity identifier.
    pub entity_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
}

/// Audit trail read model row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrailEntry {
    /// Stable event id.
    pub event_id: String,
    /// Acting user id.
    pub actor_id: String,
    /// Stable audit action value.
    pub action: String,
    /// Entity type label.
    pub entity_type: String,
    /// Entity identifier.
    pub entity_id: String,
    /// Optional audit detail payload.
    pub detail: Option<String>,
    /// Event timestamp in RFC3339.
    pub created_at: String,
}

/// Paging parameters for audit trail reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrailQuery {
    /// Maximum rows returned, capped by the repository.
    pub limit: usize,
    /// Rows skipped before the first returned one.
    pub offset: usize,
}

impl Default for AuditTrailQuery {
    fn default() -> Self {
        Self {
            limit: 50,
            offset: 0,
        }
    }
}

/// Port for reading the append-only audit trail.
#[async_trait]
pub trait AuditTrailRepository: Send + Sync {
    /// Lists entries for one entity, newest first.
    async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
        query: AuditTrailQuery,
    ) -> AppResult<Vec<AuditTrailEntry>>;
}
