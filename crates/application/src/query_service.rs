use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use approvia_core::{AppError, AppResult, Principal, UserId};
use approvia_domain::{Priority, ProjectId, Record, RecordCategory, RecordStatus};
use chrono::Utc;

use crate::access::AccessPolicy;
use crate::record_ports::RecordRepository;

/// Sortable record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Submission timestamp.
    SubmittedDate,
    /// Due date; records without one always sort last.
    DueDate,
    /// Priority rank, critical highest.
    Priority,
    /// Declared state order.
    Status,
    /// Numeric severity.
    Severity,
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "submitted_date" => Ok(Self::SubmittedDate),
            "due_date" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "status" => Ok(Self::Status),
            "severity" => Ok(Self::Severity),
            _ => Err(AppError::Validation(format!(
                "unknown sort field '{value}'"
            ))),
        }
    }
}

/// Sort order applied to a sort field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest value first.
    Ascending,
    /// Largest value first.
    Descending,
}

impl SortDirection {
    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            _ => Err(AppError::Validation(format!(
                "unknown sort direction '{value}'"
            ))),
        }
    }
}

/// Conjunctive filters applied after the visibility check.
#[derive(Debug, Clone, Default)]
pub struct RecordListFilter {
    /// Categories to include; empty means all.
    pub categories: Vec<RecordCategory>,
    /// Statuses to include; empty means all.
    pub statuses: Vec<RecordStatus>,
    /// Priorities to include; empty means all.
    pub priorities: Vec<Priority>,
    /// Required assignee.
    pub assignee_id: Option<UserId>,
    /// Required project.
    pub project_id: Option<ProjectId>,
    /// Case-insensitive free text over title, description, issue number.
    pub search: Option<String>,
    /// Optional sort applied after filtering.
    pub sort: Option<(SortField, SortDirection)>,
}

impl RecordListFilter {
    fn matches(&self, record: &Record) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&record.category()) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&record.status()) {
            return false;
        }
        if !self.priorities.is_empty() {
            match record.priority() {
                Some(priority) if self.priorities.contains(&priority) => {}
                _ => return false,
            }
        }
        if let Some(assignee_id) = self.assignee_id
            && record.assignee_id() != Some(assignee_id)
        {
            return false;
        }
        if let Some(project_id) = self.project_id
            && record.project_id() != Some(project_id)
        {
            return false;
        }
        if let Some(search) = &self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                let title_hit = record.title().as_str().to_lowercase().contains(&needle);
                let description_hit = record
                    .description()
                    .is_some_and(|value| value.to_lowercase().contains(&needle));
                let number_hit = record
                    .issue_number()
                    .is_some_and(|value| value.to_lowercase().contains(&needle));
                if !title_hit && !description_hit && !number_hit {
                    return false;
                }
            }
        }

        true
    }
}

/// Aggregate counts over a visible record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStats {
    /// Total visible records.
    pub total: usize,
    /// Count per status storage value.
    pub by_status: BTreeMap<String, usize>,
    /// Count per priority storage value.
    pub by_priority: BTreeMap<String, usize>,
    /// Count per category storage value.
    pub by_category: BTreeMap<String, usize>,
    /// Records past due and not yet resolved or closed.
    pub overdue: usize,
    /// Records in the resolved status.
    pub resolved: usize,
    /// Records in the in-progress status.
    pub in_progress: usize,
}

/// Sorts records in place by one field.
///
/// Records missing the sort value (unset due date, priority, or severity)
/// always sort last, in both directions.
pub fn sort_records(records: &mut [Record], field: SortField, direction: SortDirection) {
    records.sort_by(|left, right| match field {
        SortField::SubmittedDate => direction.apply(left.submitted_at().cmp(&right.submitted_at())),
        SortField::DueDate => compare_optional(left.due_date(), right.due_date(), direction),
        SortField::Priority => compare_optional(
            left.priority().map(|priority| priority.rank()),
            right.priority().map(|priority| priority.rank()),
            direction,
        ),
        SortField::Status => direction.apply(left.status().rank().cmp(&right.status().rank())),
        SortField::Severity => compare_optional(left.severity(), right.severity(), direction),
    });
}

fn compare_optional<T: Ord>(left: Option<T>, right: Option<T>, direction: SortDirection) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => direction.apply(left.cmp(&right)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Read-side service scoping every result through the visibility policy.
#[derive(Clone)]
pub struct QueryService {
    repository: Arc<dyn RecordRepository>,
    access: AccessPolicy,
}

impl QueryService {
    /// Creates a query service.
    #[must_use]
    pub fn new(repository: Arc<dyn RecordRepository>, access: AccessPolicy) -> Self {
        Self { repository, access }
    }

    /// Lists records the principal may read, filtered and sorted.
    ///
    /// The visibility check runs before any other filter; a record the
    /// principal cannot access is never returned, however permissive the
    /// filters are.
    pub async fn list(
        &self,
        principal: &Principal,
        filter: &RecordListFilter,
    ) -> AppResult<Vec<Record>> {
        let category = match filter.categories.as_slice() {
            [category] => Some(*category),
            _ => None,
        };
        let candidates = self.repository.list(category).await?;

        let mut visible = Vec::with_capacity(candidates.len());
        for record in candidates {
            if self.access.allows(principal, &record).await? && filter.matches(&record) {
                visible.push(record);
            }
        }

        if let Some((field, direction)) = filter.sort {
            sort_records(&mut visible, field, direction);
        }

        Ok(visible)
    }

    /// Computes aggregate counts over the principal's visible records.
    pub async fn stats(
        &self,
        principal: &Principal,
        filter: &RecordListFilter,
    ) -> AppResult<RecordStats> {
        let records = self.list(principal, filter).await?;
        let now = Utc::now();

        let mut stats = RecordStats {
            total: records.len(),
            ..RecordStats::default()
        };

        for record in &records {
            *stats
                .by_status
                .entry(record.status().as_str().to_owned())
                .or_default() += 1;
            *stats
                .by_category
                .entry(record.category().as_str().to_owned())
                .or_default() += 1;
            if let Some(priority) = record.priority() {
                *stats
                    .by_priority
                    .entry(priority.as_str().to_owned())
                    .or_default() += 1;
            }
            if record.is_overdue(now) {
                stats.overdue += 1;
            }
            if record.status() == RecordStatus::Resolved {
                stats.resolved += 1;
            }
            if record.status() == RecordStatus::InProgress {
                stats.in_progress += 1;
            }
        }

        Ok(stats)
    }
}
