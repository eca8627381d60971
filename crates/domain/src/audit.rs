use std::str::FromStr;

use approvia_core::AppError;
use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by workflow commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a record is created.
    Created,
    /// Emitted when a record's fields are edited.
    Updated,
    /// Emitted when a record is deleted.
    Deleted,
    /// Emitted when an approval is granted.
    Approved,
    /// Emitted when an approval is denied.
    Rejected,
    /// Emitted when a record is reassigned.
    Assigned,
    /// Emitted when a record moves to another in-family status.
    StatusChanged,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "record.created",
            Self::Updated => "record.updated",
            Self::Deleted => "record.deleted",
            Self::Approved => "record.approved",
            Self::Rejected => "record.rejected",
            Self::Assigned => "record.assigned",
            Self::StatusChanged => "record.status_changed",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "record.created" => Ok(Self::Created),
            "record.updated" => Ok(Self::Updated),
            "record.deleted" => Ok(Self::Deleted),
            "record.approved" => Ok(Self::Approved),
            "record.rejected" => Ok(Self::Rejected),
            "record.assigned" => Ok(Self::Assigned),
            "record.status_changed" => Ok(Self::StatusChanged),
            _ => Err(AppError::Validation(format!(
                "unknown audit action '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::AuditAction;

    #[test]
    fn audit_action_roundtrip_storage_value() {
        let action = AuditAction::StatusChanged;
        let restored = AuditAction::from_str(action.as_str());
        assert!(restored.is_ok());
        assert_eq!(restored.unwrap_or(AuditAction::Created), action);
    }

    #[test]
    fn unknown_audit_action_is_rejected() {
        assert!(AuditAction::from_str("record.archived").is_err());
    }
}
