//! Read-access policy for records.
//!
//! Every read path goes through [`can_access`]; per-screen visibility
//! conditionals are not re-implemented anywhere else. The rule order below
//! is load-bearing: an approved record is department-visible even when it
//! was originally marked personal, because the approved-status rule is
//! evaluated after the personal tier fails for a non-owner.

use approvia_core::Principal;

use crate::record::{Record, VisibilityScope};
use crate::status::RecordStatus;

/// Decides read access for a principal and record pair.
///
/// `is_project_member` answers the project-membership question for the
/// record's project; it is resolved by the caller through the project
/// directory collaborator and consulted only by the project tier rule.
#[must_use]
pub fn can_access(principal: &Principal, record: &Record, is_project_member: bool) -> bool {
    // Rule 1: administrators bypass every check.
    if principal.is_admin() {
        return true;
    }

    let is_owner = record.owner_id() == principal.user_id();
    let is_assignee = record.assignee_id() == Some(principal.user_id());

    // Rule 2: personal tier. A record assigned to the principal in a
    // pre-approval status is implicitly personal even without a scope.
    if record.visibility_scope() == Some(VisibilityScope::Personal) && (is_owner || is_assignee) {
        return true;
    }
    if is_assignee && record.status().is_pre_approval() {
        return true;
    }
    if is_owner && record.visibility_scope().is_none() {
        return true;
    }

    // Rule 3: department tier. Approval promotes any record to
    // department-wide visibility regardless of its declared scope.
    if record.visibility_scope() == Some(VisibilityScope::Department) {
        return true;
    }
    if record.status() == RecordStatus::Approved {
        return true;
    }
    if record.assignee_id().is_none() && record.project_id().is_some() {
        return true;
    }
    if record.visibility_scope().is_none() && record.assignee_id().is_none() {
        return true;
    }

    // Rule 4: project tier, only reached when rules 1-3 did not grant.
    if (record.visibility_scope() == Some(VisibilityScope::Project)
        || (record.visibility_scope().is_none() && record.project_id().is_some()))
        && is_project_member
    {
        return true;
    }

    // Rule 5: public tier.
    record.visibility_scope() == Some(VisibilityScope::Public)
}

/// Derives the record's effective audience tier.
///
/// Never reads the declared scope alone: an unset scope and an approved
/// status both imply department visibility, and an assigned record in a
/// pre-approval status is personal to its assignee.
#[must_use]
pub fn effective_scope(record: &Record) -> VisibilityScope {
    if record.visibility_scope() == Some(VisibilityScope::Public) {
        return VisibilityScope::Public;
    }

    if record.status() == RecordStatus::Approved {
        return VisibilityScope::Department;
    }

    if record.assignee_id().is_some() && record.status().is_pre_approval() {
        return VisibilityScope::Personal;
    }

    match record.visibility_scope() {
        Some(scope) => scope,
        None => {
            if record.assignee_id().is_none() {
                VisibilityScope::Department
            } else if record.project_id().is_some() {
                VisibilityScope::Project
            } else {
                VisibilityScope::Personal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approvia_core::{Principal, Role, UserId};
    use chrono::Utc;
    use proptest::prelude::*;

    use super::{can_access, effective_scope};
    use crate::record::{ProjectId, Record, RecordCategory, RecordInput, VisibilityScope};
    use crate::status::RecordStatus;

    fn build_record(
        owner_id: UserId,
        assignee_id: Option<UserId>,
        project_id: Option<ProjectId>,
        visibility_scope: Option<VisibilityScope>,
    ) -> Record {
        Record::new(
            RecordInput {
                category: RecordCategory::ChangeRequest,
                title: "Gasket material change".to_owned(),
                description: None,
                owner_id,
                assignee_id,
                project_id,
                visibility_scope,
                priority: None,
                severity: None,
                due_date: None,
                issue_number: None,
            },
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    fn contributor() -> Principal {
        Principal::new(UserId::new(), Role::Contributor, "quality")
    }

    #[test]
    fn admin_bypasses_every_rule() {
        let admin = Principal::new(UserId::new(), Role::Admin, "quality");
        let record = build_record(
            UserId::new(),
            Some(UserId::new()),
            None,
            Some(VisibilityScope::Personal),
        );
        assert!(can_access(&admin, &record, false));
    }

    #[test]
    fn personal_record_is_hidden_from_strangers() {
        let stranger = contributor();
        let record = build_record(
            UserId::new(),
            Some(UserId::new()),
            None,
            Some(VisibilityScope::Personal),
        );
        assert!(!can_access(&stranger, &record, false));
    }

    #[test]
    fn owner_sees_personal_record() {
        let owner = contributor();
        let record = build_record(
            owner.user_id(),
            None,
            None,
            Some(VisibilityScope::Personal),
        );
        assert!(can_access(&owner, &record, false));
    }

    #[test]
    fn assignee_sees_unscoped_pre_approval_record() {
        let assignee = contributor();
        let record = build_record(UserId::new(), Some(assignee.user_id()), None, None);
        assert!(can_access(&assignee, &record, false));
    }

    #[test]
    fn approval_promotes_personal_record_to_department() {
        // Order-dependent case: the personal tier fails for a stranger, but
        // the approved-status rule in the department tier grants anyway.
        let stranger = contributor();
        let mut record = build_record(
            UserId::new(),
            Some(UserId::new()),
            None,
            Some(VisibilityScope::Personal),
        );
        assert!(!can_access(&stranger, &record, false));

        assert!(record.approve(UserId::new(), Utc::now()).is_ok());
        assert!(can_access(&stranger, &record, false));
        assert_eq!(effective_scope(&record), VisibilityScope::Department);
    }

    #[test]
    fn unassigned_project_record_is_department_visible() {
        let stranger = contributor();
        let record = build_record(UserId::new(), None, Some(ProjectId::new()), None);
        assert!(can_access(&stranger, &record, false));
    }

    #[test]
    fn unscoped_unassigned_record_is_department_visible() {
        let stranger = contributor();
        let record = build_record(UserId::new(), None, None, None);
        assert!(can_access(&stranger, &record, false));
    }

    #[test]
    fn project_tier_requires_membership() {
        let stranger = contributor();
        let record = build_record(
            UserId::new(),
            Some(UserId::new()),
            Some(ProjectId::new()),
            Some(VisibilityScope::Project),
        );
        assert!(!can_access(&stranger, &record, false));
        assert!(can_access(&stranger, &record, true));
    }

    #[test]
    fn public_record_is_visible_to_everyone() {
        let stranger = contributor();
        let record = build_record(
            UserId::new(),
            Some(UserId::new()),
            None,
            Some(VisibilityScope::Public),
        );
        assert!(can_access(&stranger, &record, false));
    }

    #[test]
    fn effective_scope_of_assigned_draft_is_personal() {
        let record = build_record(UserId::new(), Some(UserId::new()), None, None);
        assert_eq!(effective_scope(&record), VisibilityScope::Personal);
    }

    fn scope_strategy() -> impl Strategy<Value = Option<VisibilityScope>> {
        prop_oneof![
            Just(None),
            Just(Some(VisibilityScope::Personal)),
            Just(Some(VisibilityScope::Department)),
            Just(Some(VisibilityScope::Project)),
            Just(Some(VisibilityScope::Public)),
        ]
    }

    proptest! {
        #[test]
        fn approved_records_are_visible_to_any_principal(
            scope in scope_strategy(),
            has_assignee in any::<bool>(),
            has_project in any::<bool>(),
            is_member in any::<bool>(),
        ) {
            let mut record = build_record(
                UserId::new(),
                has_assignee.then(UserId::new),
                has_project.then(ProjectId::new),
                scope,
            );
            prop_assert!(record.approve(UserId::new(), Utc::now()).is_ok());
            prop_assert!(can_access(&contributor(), &record, is_member));
        }

        #[test]
        fn assigned_personal_records_stay_private_before_approval(
            is_member in any::<bool>(),
        ) {
            let record = build_record(
                UserId::new(),
                Some(UserId::new()),
                None,
                Some(VisibilityScope::Personal),
            );
            prop_assert_eq!(record.status(), RecordStatus::Pending);
            prop_assert!(!can_access(&contributor(), &record, is_member));
        }

        #[test]
        fn admin_grant_is_independent_of_record_shape(
            scope in scope_strategy(),
            has_assignee in any::<bool>(),
            has_project in any::<bool>(),
        ) {
            let record = build_record(
                UserId::new(),
                has_assignee.then(UserId::new),
                has_project.then(ProjectId::new),
                scope,
            );
            let admin = Principal::new(UserId::new(), Role::Admin, "engineering");
            prop_assert!(can_access(&admin, &record, false));
        }
    }
}
