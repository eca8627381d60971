use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AppError, UserId};

/// Role assigned to an acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Bypasses visibility checks and may administer any record.
    Admin,
    /// May approve or reject records under review.
    Approver,
    /// May create and edit records but not decide approvals.
    Contributor,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Approver => "approver",
            Self::Contributor => "contributor",
        }
    }

    /// Returns whether the role may decide approvals.
    #[must_use]
    pub fn can_approve(&self) -> bool {
        matches!(self, Self::Admin | Self::Approver)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "approver" => Ok(Self::Approver),
            "contributor" => Ok(Self::Contributor),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// The acting user issuing a command or query.
///
/// Every service call takes a principal explicitly; there is no ambient
/// session state anywhere below the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    user_id: UserId,
    role: Role,
    department: String,
}

impl Principal {
    /// Creates a principal from authenticated gateway data.
    #[must_use]
    pub fn new(user_id: UserId, role: Role, department: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            department: department.into(),
        }
    }

    /// Returns the acting user's identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the acting user's role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the acting user's department.
    #[must_use]
    pub fn department(&self) -> &str {
        self.department.as_str()
    }

    /// Returns whether the principal is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::Role;

    #[test]
    fn role_roundtrip_storage_value() {
        let role = Role::Approver;
        let restored = Role::from_str(role.as_str());
        assert!(restored.is_ok());
        assert_eq!(restored.unwrap_or(Role::Contributor), role);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let parsed = Role::from_str("superuser");
        assert!(parsed.is_err());
    }

    #[test]
    fn only_admin_and_approver_decide_approvals() {
        assert!(Role::Admin.can_approve());
        assert!(Role::Approver.can_approve());
        assert!(!Role::Contributor.can_approve());
    }
}
