use std::fmt::{Display, Formatter};
use std::str::FromStr;

use approvia_core::{AppError, AppResult, NonEmptyString, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::RecordStatus;

/// Stable identifier for a reviewable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Creates a random record identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a record identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Stable identifier for a project grouping records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a random project identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a project identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ProjectId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Concrete category of a reviewable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory {
    /// Engineering change request (two-state approval family).
    ChangeRequest,
    /// Part-approval package (two-state approval family).
    ApprovalPackage,
    /// Design or process failure-mode entry (four-state review family).
    FailureMode,
    /// Quality issue (six-state problem-solving family).
    QualityIssue,
}

impl RecordCategory {
    /// Returns a stable storage value for this category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChangeRequest => "change_request",
            Self::ApprovalPackage => "approval_package",
            Self::FailureMode => "failure_mode",
            Self::QualityIssue => "quality_issue",
        }
    }

    /// Returns the family entry status assigned on creation.
    #[must_use]
    pub fn entry_status(&self) -> RecordStatus {
        match self {
            Self::ChangeRequest | Self::ApprovalPackage => RecordStatus::Pending,
            Self::FailureMode => RecordStatus::Draft,
            Self::QualityIssue => RecordStatus::New,
        }
    }

    /// Returns all known categories.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[RecordCategory] = &[
            RecordCategory::ChangeRequest,
            RecordCategory::ApprovalPackage,
            RecordCategory::FailureMode,
            RecordCategory::QualityIssue,
        ];

        ALL
    }
}

impl FromStr for RecordCategory {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "change_request" => Ok(Self::ChangeRequest),
            "approval_package" => Ok(Self::ApprovalPackage),
            "failure_mode" => Ok(Self::FailureMode),
            "quality_issue" => Ok(Self::QualityIssue),
            _ => Err(AppError::Validation(format!(
                "unknown record category '{value}'"
            ))),
        }
    }
}

/// Declared audience tier for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityScope {
    /// Owner and assignee only.
    Personal,
    /// Anyone in the owning department.
    Department,
    /// Members of the linked project.
    Project,
    /// Everyone.
    Public,
}

impl VisibilityScope {
    /// Returns a stable storage value for this scope.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Department => "department",
            Self::Project => "project",
            Self::Public => "public",
        }
    }
}

impl FromStr for VisibilityScope {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "personal" => Ok(Self::Personal),
            "department" => Ok(Self::Department),
            "project" => Ok(Self::Project),
            "public" => Ok(Self::Public),
            _ => Err(AppError::Validation(format!(
                "unknown visibility scope '{value}'"
            ))),
        }
    }
}

/// Record priority with a fixed sort rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Highest urgency.
    Critical,
    /// Above-normal urgency.
    High,
    /// Normal urgency.
    Medium,
    /// Lowest urgency.
    Low,
}

impl Priority {
    /// Returns a stable storage value for this priority.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Returns the fixed rank, critical highest.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 3,
            Self::High => 2,
            Self::Medium => 1,
            Self::Low => 0,
        }
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(AppError::Validation(format!("unknown priority '{value}'"))),
        }
    }
}

/// Input payload used to construct a validated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInput {
    /// Record category, fixes the lifecycle family.
    pub category: RecordCategory,
    /// Record title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Creating user, becomes the owner.
    pub owner_id: UserId,
    /// Optional user the record is assigned to.
    pub assignee_id: Option<UserId>,
    /// Optional project link.
    pub project_id: Option<ProjectId>,
    /// Optional declared audience tier; absence means a derived default.
    pub visibility_scope: Option<VisibilityScope>,
    /// Optional priority.
    pub priority: Option<Priority>,
    /// Optional numeric severity, 1 through 10.
    pub severity: Option<u8>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Pre-allocated issue number, quality issues only.
    pub issue_number: Option<String>,
}

/// Partial edit applied to a still-editable record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordEdit {
    /// New title when set.
    pub title: Option<String>,
    /// New description when set.
    pub description: Option<String>,
    /// New declared scope when set.
    pub visibility_scope: Option<VisibilityScope>,
    /// New priority when set.
    pub priority: Option<Priority>,
    /// New severity when set.
    pub severity: Option<u8>,
    /// New due date when set.
    pub due_date: Option<DateTime<Utc>>,
}

/// A reviewable business record moving through its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    category: RecordCategory,
    title: NonEmptyString,
    description: Option<String>,
    owner_id: UserId,
    assignee_id: Option<UserId>,
    project_id: Option<ProjectId>,
    visibility_scope: Option<VisibilityScope>,
    status: RecordStatus,
    priority: Option<Priority>,
    severity: Option<u8>,
    due_date: Option<DateTime<Utc>>,
    issue_number: Option<String>,
    submitted_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    approved_by: Option<UserId>,
    rejected_at: Option<DateTime<Utc>>,
    rejected_by: Option<UserId>,
    reject_reason: Option<String>,
    resolved_at: Option<DateTime<Utc>>,
    resolved_by: Option<UserId>,
    resolution: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Record {
    /// Creates a validated record in its family entry state.
    pub fn new(input: RecordInput, now: DateTime<Utc>) -> AppResult<Self> {
        let RecordInput {
            category,
            title,
            description,
            owner_id,
            assignee_id,
            project_id,
            visibility_scope,
            priority,
            severity,
            due_date,
            issue_number,
        } = input;

        if let Some(severity) = severity
            && !(1..=10).contains(&severity)
        {
            return Err(AppError::Validation(
                "severity must be between 1 and 10".to_owned(),
            ));
        }

        if issue_number.is_some() && category != RecordCategory::QualityIssue {
            return Err(AppError::Validation(
                "issue numbers apply to quality issues only".to_owned(),
            ));
        }

        let description = description.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            id: RecordId::new(),
            category,
            title: NonEmptyString::new(title)?,
            description,
            owner_id,
            assignee_id,
            project_id,
            visibility_scope,
            status: category.entry_status(),
            priority,
            severity,
            due_date,
            issue_number,
            submitted_at: now,
            approved_at: None,
            approved_by: None,
            rejected_at: None,
            rejected_by: None,
            reject_reason: None,
            resolved_at: None,
            resolved_by: None,
            resolution: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns the record identifier.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the record category.
    #[must_use]
    pub fn category(&self) -> RecordCategory {
        self.category
    }

    /// Returns the record title.
    #[must_use]
    pub fn title(&self) -> &NonEmptyString {
        &self.title
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the owning user.
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the assigned user, if any.
    #[must_use]
    pub fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the linked project, if any.
    #[must_use]
    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    /// Returns the declared scope; effective visibility is always derived.
    #[must_use]
    pub fn visibility_scope(&self) -> Option<VisibilityScope> {
        self.visibility_scope
    }

    /// Returns the current lifecycle status.
    #[must_use]
    pub fn status(&self) -> RecordStatus {
        self.status
    }

    /// Returns the optional priority.
    #[must_use]
    pub fn priority(&self) -> Option<Priority> {
        self.priority
    }

    /// Returns the optional numeric severity.
    #[must_use]
    pub fn severity(&self) -> Option<u8> {
        self.severity
    }

    /// Returns the optional due date.
    #[must_use]
    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the allocated issue number for quality issues.
    #[must_use]
    pub fn issue_number(&self) -> Option<&str> {
        self.issue_number.as_deref()
    }

    /// Returns the submission timestamp.
    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// Returns the approval timestamp, if approved.
    #[must_use]
    pub fn approved_at(&self) -> Option<DateTime<Utc>> {
        self.approved_at
    }

    /// Returns the approving user, if approved.
    #[must_use]
    pub fn approved_by(&self) -> Option<UserId> {
        self.approved_by
    }

    /// Returns the rejection timestamp, if rejected.
    #[must_use]
    pub fn rejected_at(&self) -> Option<DateTime<Utc>> {
        self.rejected_at
    }

    /// Returns the rejecting user, if rejected.
    #[must_use]
    pub fn rejected_by(&self) -> Option<UserId> {
        self.rejected_by
    }

    /// Returns the rejection reason, if rejected.
    #[must_use]
    pub fn reject_reason(&self) -> Option<&str> {
        self.reject_reason.as_deref()
    }

    /// Returns the resolution timestamp for resolved issues.
    #[must_use]
    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Returns the resolving user for resolved issues.
    #[must_use]
    pub fn resolved_by(&self) -> Option<UserId> {
        self.resolved_by
    }

    /// Returns the resolution summary for resolved issues.
    #[must_use]
    pub fn resolution(&self) -> Option<&str> {
        self.resolution.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last mutation timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the record sits in a terminal status.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal(self.category)
    }

    /// Returns whether the record is past due and not yet resolved.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due_date) => {
                due_date < now && !self.status.is_resolved_like() && !self.is_terminal()
            }
            None => false,
        }
    }

    /// Applies an approval decision.
    pub fn approve(&mut self, approver: UserId, now: DateTime<Utc>) -> AppResult<()> {
        if !self.status.is_decidable() {
            return Err(AppError::InvalidState(format!(
                "record '{}' cannot be approved from status '{}'",
                self.id,
                self.status.as_str()
            )));
        }

        self.status = RecordStatus::Approved;
        self.approved_at = Some(now);
        self.approved_by = Some(approver);
        self.updated_at = now;
        Ok(())
    }

    /// Applies a rejection decision; the reason is mandatory.
    pub fn reject(&mut self, approver: UserId, reason: &str, now: DateTime<Utc>) -> AppResult<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(
                "a rejection requires a non-empty reason".to_owned(),
            ));
        }

        if !self.status.is_decidable() {
            return Err(AppError::InvalidState(format!(
                "record '{}' cannot be rejected from status '{}'",
                self.id,
                self.status.as_str()
            )));
        }

        self.status = RecordStatus::Rejected;
        self.rejected_at = Some(now);
        self.rejected_by = Some(approver);
        self.reject_reason = Some(reason.to_owned());
        self.updated_at = now;
        Ok(())
    }

    /// Moves the record to another in-family status.
    ///
    /// Reaching `Resolved` or `Closed` records the resolution fields as a
    /// side effect of the same command.
    pub fn change_status(
        &mut self,
        target: RecordStatus,
        resolution: Option<String>,
        actor: UserId,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if !target.belongs_to(self.category) {
            return Err(AppError::Validation(format!(
                "status '{}' does not belong to category '{}'",
                target.as_str(),
                self.category.as_str()
            )));
        }

        if !self.status.allows_status_change_to(target, self.category) {
            return Err(AppError::InvalidState(format!(
                "record '{}' cannot move from '{}' to '{}'",
                self.id,
                self.status.as_str(),
                target.as_str()
            )));
        }

        self.status = target;
        if target.is_resolved_like() {
            self.resolved_at = Some(now);
            self.resolved_by = Some(actor);
            if let Some(resolution) = resolution {
                let trimmed = resolution.trim().to_owned();
                if !trimmed.is_empty() {
                    self.resolution = Some(trimmed);
                }
            }
        }
        self.updated_at = now;
        Ok(())
    }

    /// Reassigns the record to another user.
    pub fn assign(&mut self, assignee: UserId, now: DateTime<Utc>) -> AppResult<()> {
        if self.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "record '{}' is terminal and cannot be reassigned",
                self.id
            )));
        }

        self.assignee_id = Some(assignee);
        self.updated_at = now;
        Ok(())
    }

    /// Applies a partial edit to a still-editable record.
    pub fn apply_edit(&mut self, edit: RecordEdit, now: DateTime<Utc>) -> AppResult<()> {
        if self.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "record '{}' is terminal and cannot be edited",
                self.id
            )));
        }

        if let Some(severity) = edit.severity
            && !(1..=10).contains(&severity)
        {
            return Err(AppError::Validation(
                "severity must be between 1 and 10".to_owned(),
            ));
        }

        if let Some(title) = edit.title {
            self.title = NonEmptyString::new(title)?;
        }
        if let Some(description) = edit.description {
            let trimmed = description.trim().to_owned();
            self.description = (!trimmed.is_empty()).then_some(trimmed);
        }
        if let Some(scope) = edit.visibility_scope {
            self.visibility_scope = Some(scope);
        }
        if let Some(priority) = edit.priority {
            self.priority = Some(priority);
        }
        if let Some(severity) = edit.severity {
            self.severity = Some(severity);
        }
        if let Some(due_date) = edit.due_date {
            self.due_date = Some(due_date);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Returns whether the record may still be deleted.
    ///
    /// Deletion is permitted only from the family entry state.
    #[must_use]
    pub fn is_deletable(&self) -> bool {
        self.status == self.category.entry_status()
    }
}

/// Formats a quality-issue number as `QI-<year>-<nnn>`.
#[must_use]
pub fn format_issue_number(year: i32, sequence: u32) -> String {
    format!("QI-{year}-{sequence:03}")
}

#[cfg(test)]
mod tests {
    use approvia_core::UserId;
    use chrono::Utc;

    use super::{
        Priority, Record, RecordCategory, RecordEdit, RecordInput, RecordStatus,
        format_issue_number,
    };

    fn input(category: RecordCategory) -> RecordInput {
        RecordInput {
            category,
            title: "Replace fastener spec".to_owned(),
            description: None,
            owner_id: UserId::new(),
            assignee_id: None,
            project_id: None,
            visibility_scope: None,
            priority: Some(Priority::Medium),
            severity: None,
            due_date: None,
            issue_number: None,
        }
    }

    #[test]
    fn record_starts_in_family_entry_state() {
        let now = Utc::now();
        let change_request = Record::new(input(RecordCategory::ChangeRequest), now);
        assert!(change_request.is_ok());
        assert_eq!(
            change_request.map(|record| record.status()),
            Ok(RecordStatus::Pending)
        );

        let failure_mode = Record::new(input(RecordCategory::FailureMode), now);
        assert_eq!(
            failure_mode.map(|record| record.status()),
            Ok(RecordStatus::Draft)
        );
    }

    #[test]
    fn record_rejects_blank_title() {
        let now = Utc::now();
        let mut blank = input(RecordCategory::ChangeRequest);
        blank.title = "   ".to_owned();
        assert!(Record::new(blank, now).is_err());
    }

    #[test]
    fn issue_number_is_limited_to_quality_issues() {
        let now = Utc::now();
        let mut numbered = input(RecordCategory::ChangeRequest);
        numbered.issue_number = Some("QI-2026-001".to_owned());
        assert!(Record::new(numbered, now).is_err());
    }

    #[test]
    fn approve_sets_decision_fields() {
        let now = Utc::now();
        let record = Record::new(input(RecordCategory::ChangeRequest), now);
        assert!(record.is_ok());
        let Ok(mut record) = record else {
            return;
        };

        let approver = UserId::new();
        assert!(record.approve(approver, now).is_ok());
        assert_eq!(record.status(), RecordStatus::Approved);
        assert_eq!(record.approved_by(), Some(approver));
        assert!(record.approved_at().is_some());
    }

    #[test]
    fn approve_from_terminal_state_is_invalid() {
        let now = Utc::now();
        let Ok(mut record) = Record::new(input(RecordCategory::ChangeRequest), now) else {
            return;
        };

        assert!(record.approve(UserId::new(), now).is_ok());
        assert!(record.approve(UserId::new(), now).is_err());
    }

    #[test]
    fn reject_requires_reason() {
        let now = Utc::now();
        let Ok(mut record) = Record::new(input(RecordCategory::ChangeRequest), now) else {
            return;
        };

        assert!(record.reject(UserId::new(), "  ", now).is_err());
        assert_eq!(record.status(), RecordStatus::Pending);
        assert!(record.reject(UserId::new(), "missing test data", now).is_ok());
        assert_eq!(record.reject_reason(), Some("missing test data"));
    }

    #[test]
    fn reject_records_the_rejector_and_leaves_approval_fields_unset() {
        let now = Utc::now();
        let Ok(mut record) = Record::new(input(RecordCategory::ChangeRequest), now) else {
            return;
        };

        let approver = UserId::new();
        assert!(record.reject(approver, "missing test data", now).is_ok());
        assert_eq!(record.status(), RecordStatus::Rejected);
        assert_eq!(record.rejected_by(), Some(approver));
        assert!(record.rejected_at().is_some());
        assert_eq!(record.approved_by(), None);
        assert_eq!(record.approved_at(), None);
    }

    #[test]
    fn resolving_an_issue_records_resolution_fields() {
        let now = Utc::now();
        let Ok(mut record) = Record::new(input(RecordCategory::QualityIssue), now) else {
            return;
        };

        let actor = UserId::new();
        let changed = record.change_status(
            RecordStatus::Resolved,
            Some("tightened torque spec".to_owned()),
            actor,
            now,
        );
        assert!(changed.is_ok());
        assert_eq!(record.resolved_by(), Some(actor));
        assert_eq!(record.resolution(), Some("tightened torque spec"));
    }

    #[test]
    fn overdue_ignores_resolved_issues() {
        let now = Utc::now();
        let mut overdue = input(RecordCategory::QualityIssue);
        overdue.due_date = Some(now - chrono::Duration::days(1));
        let Ok(mut record) = Record::new(overdue, now) else {
            return;
        };

        let later = now + chrono::Duration::hours(1);
        assert!(record.is_overdue(later));
        assert!(
            record
                .change_status(RecordStatus::Resolved, None, UserId::new(), now)
                .is_ok()
        );
        assert!(!record.is_overdue(later));
    }

    #[test]
    fn edit_is_blocked_after_terminal_transition() {
        let now = Utc::now();
        let Ok(mut record) = Record::new(input(RecordCategory::ChangeRequest), now) else {
            return;
        };

        assert!(record.approve(UserId::new(), now).is_ok());
        let edit = RecordEdit {
            title: Some("Updated".to_owned()),
            ..RecordEdit::default()
        };
        assert!(record.apply_edit(edit, now).is_err());
    }

    #[test]
    fn issue_number_is_zero_padded() {
        assert_eq!(format_issue_number(2026, 1), "QI-2026-001");
        assert_eq!(format_issue_number(2026, 42), "QI-2026-042");
        assert_eq!(format_issue_number(2026, 1042), "QI-2026-1042");
    }
}
