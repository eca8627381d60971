use approvia_application::AuditTrailEntry;
use serde::{Deserialize, Serialize};

/// Query-string parameters for the audit trail listing.
#[derive(Debug, Deserialize)]
pub struct AuditTrailParams {
    pub entity_type: String,
    pub entity_id: String,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// API representation of one audit trail entry.
#[derive(Debug, Serialize)]
pub struct AuditTrailEntryResponse {
    pub event_id: String,
    pub actor_id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

impl From<AuditTrailEntry> for AuditTrailEntryResponse {
    fn from(entry: AuditTrailEntry) -> Self {
        Self {
            event_id: entry.event_id,
            actor_id: entry.actor_id,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id,
            detail: entry.detail,
            created_at: entry.created_at,
        }
    }
}
