use std::str::FromStr;

use approvia_core::AppError;
use serde::{Deserialize, Serialize};

use crate::record::RecordCategory;

/// Lifecycle status across all record families.
///
/// Three families share this enum: the two-state approval family
/// (`Pending` then `Approved`/`Rejected`), the four-state review family
/// (`Draft`, `InReview`, then `Approved`/`Rejected`), and the six-state
/// problem-solving family (`New` through `Closed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Awaiting an approval decision (two-state family entry state).
    Pending,
    /// Editable draft (four-state family entry state).
    Draft,
    /// Submitted for review, still editable by owner and assignee.
    InReview,
    /// Freshly reported issue (six-state family entry state).
    New,
    /// Issue under investigation.
    Investigating,
    /// Countermeasure being implemented.
    InProgress,
    /// Countermeasure effectiveness being verified.
    Verifying,
    /// Approval granted; terminal for edits and transitions.
    Approved,
    /// Approval denied; terminal for edits and transitions.
    Rejected,
    /// Issue resolved; may still be closed.
    Resolved,
    /// Issue closed; terminal.
    Closed,
}

impl RecordStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Draft => "draft",
            Self::InReview => "in_review",
            Self::New => "new",
            Self::Investigating => "investigating",
            Self::InProgress => "in_progress",
            Self::Verifying => "verifying",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Returns whether this status belongs to the category's family.
    #[must_use]
    pub fn belongs_to(&self, category: RecordCategory) -> bool {
        match category {
            RecordCategory::ChangeRequest | RecordCategory::ApprovalPackage => {
                matches!(self, Self::Pending | Self::Approved | Self::Rejected)
            }
            RecordCategory::FailureMode => matches!(
                self,
                Self::Draft | Self::InReview | Self::Approved | Self::Rejected
            ),
            RecordCategory::QualityIssue => matches!(
                self,
                Self::New
                    | Self::Investigating
                    | Self::InProgress
                    | Self::Verifying
                    | Self::Resolved
                    | Self::Closed
            ),
        }
    }

    /// Returns whether no further transition is defined from this status.
    #[must_use]
    pub fn is_terminal(&self, category: RecordCategory) -> bool {
        match category {
            RecordCategory::ChangeRequest
            | RecordCategory::ApprovalPackage
            | RecordCategory::FailureMode => matches!(self, Self::Approved | Self::Rejected),
            RecordCategory::QualityIssue => matches!(self, Self::Closed),
        }
    }

    /// Returns whether an approve/reject decision is accepted from here.
    #[must_use]
    pub fn is_decidable(&self) -> bool {
        matches!(self, Self::Pending | Self::InReview)
    }

    /// Returns whether the record is still before any approval decision.
    #[must_use]
    pub fn is_pre_approval(&self) -> bool {
        matches!(self, Self::Pending | Self::Draft | Self::InReview)
    }

    /// Returns whether the status counts as resolved for overdue checks.
    #[must_use]
    pub fn is_resolved_like(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }

    /// Returns the declared state order used for status sorting.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Draft => 1,
            Self::InReview => 2,
            Self::New => 3,
            Self::Investigating => 4,
            Self::InProgress => 5,
            Self::Verifying => 6,
            Self::Approved => 7,
            Self::Rejected => 8,
            Self::Resolved => 9,
            Self::Closed => 10,
        }
    }

    /// Returns whether a status-change command may move to `target`.
    ///
    /// The four-state family allows moving between `Draft` and `InReview`;
    /// decisions go through the approve/reject commands instead. The
    /// six-state family accepts any in-family target from any non-terminal
    /// state, transitions there are intentionally not strictly linear.
    #[must_use]
    pub fn allows_status_change_to(&self, target: Self, category: RecordCategory) -> bool {
        if !target.belongs_to(category) || self.is_terminal(category) || *self == target {
            return false;
        }

        match category {
            RecordCategory::ChangeRequest | RecordCategory::ApprovalPackage => false,
            RecordCategory::FailureMode => matches!(
                (self, target),
                (Self::Draft, Self::InReview) | (Self::InReview, Self::Draft)
            ),
            RecordCategory::QualityIssue => true,
        }
    }
}

impl FromStr for RecordStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "draft" => Ok(Self::Draft),
            "in_review" => Ok(Self::InReview),
            "new" => Ok(Self::New),
            "investigating" => Ok(Self::Investigating),
            "in_progress" => Ok(Self::InProgress),
            "verifying" => Ok(Self::Verifying),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(AppError::Validation(format!(
                "unknown record status '{value}'"
            ))),
        }
    }
}
