use std::collections::HashMap;

use async_trait::async_trait;
use approvia_application::{
    AuditEvent, AuditTrailEntry, AuditTrailQuery, AuditTrailRepository, RecordRepository,
};
use approvia_core::AppResult;
use approvia_domain::{Record, RecordCategory, RecordId};
use chrono::{SecondsFormat, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredAuditEvent {
    event_id: Uuid,
    event: AuditEvent,
    created_at: String,
}

#[derive(Debug, Default)]
struct Store {
    records: HashMap<RecordId, Record>,
    events: Vec<StoredAuditEvent>,
}

impl Store {
    fn append_event(&mut self, event: AuditEvent) {
        self.events.push(StoredAuditEvent {
            event_id: Uuid::new_v4(),
            event,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        });
    }
}

/// In-memory record store with its embedded audit trail.
///
/// Records and the trail live behind one lock; a mutating call inserts
/// the record and appends its event under a single write guard, so no
/// reader can observe one without the other. The audit vector only ever
/// grows; deleting a record keeps its history.
#[derive(Debug, Default)]
pub struct InMemoryRecordRepository {
    store: RwLock<Store>,
    issue_counters: Mutex<HashMap<i32, u32>>,
}

impl InMemoryRecordRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
            issue_counters: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn insert(&self, record: Record, event: AuditEvent) -> AppResult<()> {
        let mut store = self.store.write().await;
        store.records.insert(record.id(), record);
        store.append_event(event);
        Ok(())
    }

    async fn update(&self, record: Record, event: AuditEvent) -> AppResult<()> {
        let mut store = self.store.write().await;
        store.records.insert(record.id(), record);
        store.append_event(event);
        Ok(())
    }

    async fn delete(&self, record_id: RecordId, event: AuditEvent) -> AppResult<()> {
        let mut store = self.store.write().await;
        store.records.remove(&record_id);
        store.append_event(event);
        Ok(())
    }

    async fn find(&self, record_id: RecordId) -> AppResult<Option<Record>> {
        Ok(self.store.read().await.records.get(&record_id).cloned())
    }

    async fn list(&self, category: Option<RecordCategory>) -> AppResult<Vec<Record>> {
        let store = self.store.read().await;
        let mut listed: Vec<Record> = store
            .records
            .values()
            .filter(|record| category.is_none_or(|category| record.category() == category))
            .cloned()
            .collect();
        listed.sort_by_key(|record| (record.created_at(), record.id().as_uuid()));
        Ok(listed)
    }

    async fn allocate_issue_number(&self, year: i32) -> AppResult<u32> {
        let mut counters = self.issue_counters.lock().await;
        let counter = counters.entry(year).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}

#[async_trait]
impl AuditTrailRepository for InMemoryRecordRepository {
    async fn list_for_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
        query: AuditTrailQuery,
    ) -> AppResult<Vec<AuditTrailEntry>> {
        let store = self.store.read().await;
        let mut matching: Vec<&StoredAuditEvent> = store
            .events
            .iter()
            .filter(|stored| {
                stored.event.entity_type == entity_type && stored.event.entity_id == entity_id
            })
            .collect();
        matching.reverse();

        Ok(matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit.clamp(1, 200))
            .map(|stored| AuditTrailEntry {
                event_id: stored.event_id.to_string(),
                actor_id: stored.event.actor_id.to_string(),
                action: stored.event.action.as_str().to_owned(),
                entity_type: stored.event.entity_type.clone(),
                entity_id: stored.event.entity_id.clone(),
                detail: stored.event.detail.clone(),
                created_at: stored.created_at.clone(),
            })
            .collect())
    }
}
