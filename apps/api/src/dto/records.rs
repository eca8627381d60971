use std::collections::BTreeMap;

use approvia_application::RecordStats;
use approvia_domain::{Record, effective_scope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Incoming payload for record creation.
///
/// Identifiers and timestamps are always server-assigned; any the client
/// sends are ignored.
#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub reviewer_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub visibility_scope: Option<String>,
    pub priority: Option<String>,
    pub severity: Option<u8>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Incoming payload for a partial record update.
#[derive(Debug, Deserialize)]
pub struct UpdateRecordRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub visibility_scope: Option<String>,
    pub priority: Option<String>,
    pub severity: Option<u8>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Incoming payload for a rejection decision.
#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub reason: String,
}

/// Incoming payload for an in-family status change.
#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
    pub resolution: Option<String>,
}

/// Incoming payload for a reassignment.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub assignee_id: Uuid,
}

/// Incoming payload for a comment.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub body: String,
    #[serde(default)]
    pub mentions: Vec<Uuid>,
}

/// Query-string filters for record listings and statistics.
///
/// Multi-value filters are comma-separated lists.
#[derive(Debug, Default, Deserialize)]
pub struct ListRecordsParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

/// API representation of a record.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub id: String,
    pub category: String,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub assignee_id: Option<String>,
    pub project_id: Option<String>,
    pub visibility_scope: Option<String>,
    pub effective_visibility: String,
    pub status: String,
    pub priority: Option<String>,
    pub severity: Option<u8>,
    pub due_date: Option<DateTime<Utc>>,
    pub issue_number: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<String>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub rejected_by: Option<String>,
    pub reject_reason: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub resolution: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Record> for RecordResponse {
    fn from(record: Record) -> Self {
        Self {
            id: record.id().to_string(),
            category: record.category().as_str().to_owned(),
            title: record.title().as_str().to_owned(),
            description: record.description().map(str::to_owned),
            owner_id: record.owner_id().to_string(),
            assignee_id: record.assignee_id().map(|user_id| user_id.to_string()),
            project_id: record.project_id().map(|project_id| project_id.to_string()),
            visibility_scope: record
                .visibility_scope()
                .map(|scope| scope.as_str().to_owned()),
            effective_visibility: effective_scope(&record).as_str().to_owned(),
            status: record.status().as_str().to_owned(),
            priority: record.priority().map(|priority| priority.as_str().to_owned()),
            severity: record.severity(),
            due_date: record.due_date(),
            issue_number: record.issue_number().map(str::to_owned),
            submitted_at: record.submitted_at(),
            approved_at: record.approved_at(),
            approved_by: record.approved_by().map(|user_id| user_id.to_string()),
            rejected_at: record.rejected_at(),
            rejected_by: record.rejected_by().map(|user_id| user_id.to_string()),
            reject_reason: record.reject_reason().map(str::to_owned),
            resolved_at: record.resolved_at(),
            resolved_by: record.resolved_by().map(|user_id| user_id.to_string()),
            resolution: record.resolution().map(str::to_owned),
            created_at: record.created_at(),
            updated_at: record.updated_at(),
        }
    }
}

/// Aggregate counts over the caller's visible records.
#[derive(Debug, Serialize)]
pub struct RecordStatsResponse {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_priority: BTreeMap<String, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub overdue: usize,
    pub resolved: usize,
    pub in_progress: usize,
}

impl From<RecordStats> for RecordStatsResponse {
    fn from(stats: RecordStats) -> Self {
        Self {
            total: stats.total,
            by_status: stats.by_status,
            by_priority: stats.by_priority,
            by_category: stats.by_category,
            overdue: stats.overdue,
            resolved: stats.resolved,
            in_progress: stats.in_progress,
        }
    }
}
