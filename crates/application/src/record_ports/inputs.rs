use approvia_core::UserId;
use approvia_domain::{Priority, ProjectId, VisibilityScope};
use chrono::{DateTime, Utc};

/// Caller-supplied fields for record creation.
///
/// Identifiers, timestamps, status, and the issue number are always
/// server-assigned; anything a client sends for those is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRecordInput {
    /// Record title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Optional user the record is assigned to.
    pub assignee_id: Option<UserId>,
    /// Optional user asked to review the record.
    pub reviewer_id: Option<UserId>,
    /// Optional project link.
    pub project_id: Option<ProjectId>,
    /// Optional declared audience tier.
    pub visibility_scope: Option<VisibilityScope>,
    /// Optional priority.
    pub priority: Option<Priority>,
    /// Optional numeric severity, 1 through 10.
    pub severity: Option<u8>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
}
