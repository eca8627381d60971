use std::sync::Arc;

use approvia_core::{AppError, AppResult, Principal};
use approvia_domain::{AuditAction, Notification, Record, RecordCategory, RecordId};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::warn;

use crate::access::AccessPolicy;
use crate::notification_ports::NotificationRepository;
use crate::record_ports::{AuditEvent, RecordRepository};

mod create;
mod decide;
mod transition;

/// Workflow engine validating and applying record lifecycle commands.
///
/// Commands are processed by a single logical writer: the command lock
/// serializes every mutation, and the repository persists the record
/// change together with its audit event, so a partially applied command
/// is never observable. Notifications are emitted after the commit and
/// never roll a command back.
#[derive(Clone)]
pub struct RecordService {
    repository: Arc<dyn RecordRepository>,
    notifications: Arc<dyn NotificationRepository>,
    access: AccessPolicy,
    command_lock: Arc<Mutex<()>>,
}

impl RecordService {
    /// Creates a record service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        notifications: Arc<dyn NotificationRepository>,
        access: AccessPolicy,
    ) -> Self {
        Self {
            repository,
            notifications,
            access,
            command_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns one record the principal may read.
    pub async fn get(
        &self,
        principal: &Principal,
        category: RecordCategory,
        record_id: RecordId,
    ) -> AppResult<Record> {
        let record = self.require_record(category, record_id).await?;
        self.access.require(principal, &record).await?;
        Ok(record)
    }

    /// Deletes a record still in its family entry state.
    pub async fn delete(
        &self,
        principal: &Principal,
        category: RecordCategory,
        record_id: RecordId,
    ) -> AppResult<()> {
        let _writer = self.command_lock.lock().await;

        let record = self.require_record(category, record_id).await?;
        if record.owner_id() != principal.user_id() && !principal.is_admin() {
            return Err(AppError::Forbidden(format!(
                "only the owner or an administrator may delete record '{record_id}'"
            )));
        }

        if !record.is_deletable() {
            return Err(AppError::InvalidState(format!(
                "record '{record_id}' left its entry state and can no longer be deleted"
            )));
        }

        let event = audit_event(principal, &record, AuditAction::Deleted, None);
        self.repository.delete(record_id, event).await
    }

    /// Loads a record, treating a category mismatch as absence.
    ///
    /// The addressed category is checked before any command logic runs, so
    /// a record reached through the wrong category path is a plain
    /// `NotFound` with nothing mutated, audited, or notified.
    pub(crate) async fn require_record(
        &self,
        category: RecordCategory,
        record_id: RecordId,
    ) -> AppResult<Record> {
        self.repository
            .find(record_id)
            .await?
            .filter(|record| record.category() == category)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "record '{record_id}' does not exist in category '{}'",
                    category.as_str()
                ))
            })
    }

    /// Emits a notification, logging instead of failing the command.
    pub(crate) async fn emit(&self, notification: Notification) {
        let target = notification.target_user_id();
        if let Err(error) = self.notifications.insert(notification).await {
            warn!(%target, %error, "notification delivery failed; command already committed");
        }
    }

    pub(crate) fn now() -> chrono::DateTime<Utc> {
        Utc::now()
    }
}

/// Returns whether the principal may edit the record's fields.
pub(crate) fn can_steward(principal: &Principal, record: &Record) -> bool {
    principal.is_admin()
        || record.owner_id() == principal.user_id()
        || record.assignee_id() == Some(principal.user_id())
}

/// Builds the single audit event for one mutating command.
pub(crate) fn audit_event(
    principal: &Principal,
    record: &Record,
    action: AuditAction,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        actor_id: principal.user_id(),
        action,
        entity_type: record.category().as_str().to_owned(),
        entity_id: record.id().to_string(),
        detail,
    }
}
