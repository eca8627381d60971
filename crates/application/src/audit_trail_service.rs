use std::str::FromStr;
use std::sync::Arc;

use approvia_core::{AppError, AppResult, Principal};
use approvia_domain::{RecordCategory, RecordId};
use uuid::Uuid;

use crate::access::AccessPolicy;
use crate::record_ports::{AuditTrailEntry, AuditTrailQuery, AuditTrailRepository, RecordRepository};

/// Read access to the append-only audit trail.
///
/// Entries are only served for entities the principal can access; the
/// visibility policy runs before the trail is read.
#[derive(Clone)]
pub struct AuditTrailService {
    records: Arc<dyn RecordRepository>,
    trail: Arc<dyn AuditTrailRepository>,
    access: AccessPolicy,
}

impl AuditTrailService {
    /// Creates an audit trail service.
    #[must_use]
    pub fn new(
        records: Arc<dyn RecordRepository>,
        trail: Arc<dyn AuditTrailRepository>,
        access: AccessPolicy,
    ) -> Self {
        Self {
            records,
            trail,
            access,
        }
    }

    /// Lists audit entries for one entity the principal may read.
    pub async fn list_for_entity(
        &self,
        principal: &Principal,
        entity_type: &str,
        entity_id: &str,
        query: AuditTrailQuery,
    ) -> AppResult<Vec<AuditTrailEntry>> {
        let category = RecordCategory::from_str(entity_type)?;

        let record_id = Uuid::parse_str(entity_id)
            .map(RecordId::from_uuid)
            .map_err(|error| AppError::Validation(format!("invalid entity id: {error}")))?;

        let record = self
            .records
            .find(record_id)
            .await?
            .filter(|record| record.category() == category)
            .ok_or_else(|| AppError::NotFound(format!("record '{record_id}' does not exist")))?;
        self.access.require(principal, &record).await?;

        self.trail
            .list_for_entity(entity_type, entity_id, query)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use approvia_core::{AppError, AppResult, Principal, Role, UserId};
    use approvia_domain::{
        Record, RecordCategory, RecordId, RecordInput, VisibilityScope,
    };
    use chrono::Utc;
    use tokio::sync::Mutex;

    use crate::access::AccessPolicy;
    use crate::project_ports::ProjectDirectory;
    use crate::record_ports::{
        AuditEvent, AuditTrailEntry, AuditTrailQuery, AuditTrailRepository, RecordRepository,
    };

    use super::AuditTrailService;

    struct SingleRecordRepository {
        record: Record,
    }

    #[async_trait]
    impl RecordRepository for SingleRecordRepository {
        async fn insert(&self, _record: Record, _event: AuditEvent) -> AppResult<()> {
            Ok(())
        }

        async fn update(&self, _record: Record, _event: AuditEvent) -> AppResult<()> {
            Ok(())
        }

        async fn delete(&self, _record_id: RecordId, _event: AuditEvent) -> AppResult<()> {
            Ok(())
        }

        async fn find(&self, record_id: RecordId) -> AppResult<Option<Record>> {
            Ok((self.record.id() == record_id).then(|| self.record.clone()))
        }

        async fn list(&self, _category: Option<RecordCategory>) -> AppResult<Vec<Record>> {
            Ok(vec![self.record.clone()])
        }

        async fn allocate_issue_number(&self, _year: i32) -> AppResult<u32> {
            Ok(1)
        }
    }

    struct CannedTrail {
        entries: Vec<AuditTrailEntry>,
        reads: Mutex<usize>,
    }

    #[async_trait]
    impl AuditTrailRepository for CannedTrail {
        async fn list_for_entity(
            &self,
            _entity_type: &str,
            _entity_id: &str,
            _query: AuditTrailQuery,
        ) -> AppResult<Vec<AuditTrailEntry>> {
            *self.reads.lock().await += 1;
            Ok(self.entries.clone())
        }
    }

    struct NoProjects;

    #[async_trait]
    impl ProjectDirectory for NoProjects {
        async fn is_project_member(
            &self,
            _principal: &Principal,
            _project_id: approvia_domain::ProjectId,
        ) -> AppResult<bool> {
            Ok(false)
        }
    }

    fn personal_record(owner_id: UserId) -> Record {
        Record::new(
            RecordInput {
                category: RecordCategory::ChangeRequest,
                title: "Gasket material swap".to_owned(),
                description: None,
                owner_id,
                assignee_id: None,
                project_id: None,
                visibility_scope: Some(VisibilityScope::Personal),
                priority: None,
                severity: None,
                due_date: None,
                issue_number: None,
            },
            Utc::now(),
        )
        .unwrap_or_else(|_| unreachable!())
    }

    fn service(record: Record) -> (AuditTrailService, Arc<CannedTrail>) {
        let entry = AuditTrailEntry {
            event_id: "e1".to_owned(),
            actor_id: record.owner_id().to_string(),
            action: "record.created".to_owned(),
            entity_type: record.category().as_str().to_owned(),
            entity_id: record.id().to_string(),
            detail: None,
            created_at: "2026-01-05T09:00:00Z".to_owned(),
        };
        let trail = Arc::new(CannedTrail {
            entries: vec![entry],
            reads: Mutex::new(0),
        });
        let service = AuditTrailService::new(
            Arc::new(SingleRecordRepository { record }),
            trail.clone(),
            AccessPolicy::new(Arc::new(NoProjects)),
        );
        (service, trail)
    }

    #[tokio::test]
    async fn owner_reads_the_trail_of_their_record() {
        let owner = UserId::new();
        let record = personal_record(owner);
        let entity_id = record.id().to_string();
        let (service, _) = service(record);

        let principal = Principal::new(owner, Role::Contributor, "quality");
        let entries = service
            .list_for_entity(
                &principal,
                "change_request",
                entity_id.as_str(),
                AuditTrailQuery::default(),
            )
            .await;
        assert_eq!(entries.map(|entries| entries.len()), Ok(1));
    }

    #[tokio::test]
    async fn inaccessible_record_hides_its_trail() {
        let record = personal_record(UserId::new());
        let entity_id = record.id().to_string();
        let (service, trail) = service(record);

        let outsider = Principal::new(UserId::new(), Role::Contributor, "quality");
        let entries = service
            .list_for_entity(
                &outsider,
                "change_request",
                entity_id.as_str(),
                AuditTrailQuery::default(),
            )
            .await;
        assert!(matches!(entries, Err(AppError::Forbidden(_))));
        assert_eq!(*trail.reads.lock().await, 0);
    }

    #[tokio::test]
    async fn mismatched_entity_type_hides_the_trail() {
        let owner = UserId::new();
        let record = personal_record(owner);
        let entity_id = record.id().to_string();
        let (service, trail) = service(record);

        let principal = Principal::new(owner, Role::Contributor, "quality");
        let entries = service
            .list_for_entity(
                &principal,
                "quality_issue",
                entity_id.as_str(),
                AuditTrailQuery::default(),
            )
            .await;
        assert!(matches!(entries, Err(AppError::NotFound(_))));
        assert_eq!(*trail.reads.lock().await, 0);
    }

    #[tokio::test]
    async fn unknown_entity_type_is_rejected() {
        let owner = UserId::new();
        let record = personal_record(owner);
        let entity_id = record.id().to_string();
        let (service, _) = service(record);

        let principal = Principal::new(owner, Role::Admin, "quality");
        let entries = service
            .list_for_entity(
                &principal,
                "purchase_order",
                entity_id.as_str(),
                AuditTrailQuery::default(),
            )
            .await;
        assert!(matches!(entries, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn malformed_entity_id_is_rejected() {
        let owner = UserId::new();
        let (service, _) = service(personal_record(owner));

        let principal = Principal::new(owner, Role::Admin, "quality");
        let entries = service
            .list_for_entity(
                &principal,
                "change_request",
                "not-a-uuid",
                AuditTrailQuery::default(),
            )
            .await;
        assert!(matches!(entries, Err(AppError::Validation(_))));
    }
}
