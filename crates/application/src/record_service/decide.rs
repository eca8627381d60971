use approvia_core::{AppError, AppResult, Principal};
use approvia_domain::{
    AuditAction, Notification, NotificationType, Record, RecordCategory, RecordId,
};

use super::{RecordService, audit_event};

impl RecordService {
    /// Grants the approval on a record awaiting a decision.
    pub async fn approve(
        &self,
        principal: &Principal,
        category: RecordCategory,
        record_id: RecordId,
    ) -> AppResult<Record> {
        self.decide(principal, category, record_id, None).await
    }

    /// Denies the approval on a record awaiting a decision.
    ///
    /// Fails with a validation error when the reason is missing or blank;
    /// nothing is mutated, audited, or notified in that case.
    pub async fn reject(
        &self,
        principal: &Principal,
        category: RecordCategory,
        record_id: RecordId,
        reason: &str,
    ) -> AppResult<Record> {
        self.decide(principal, category, record_id, Some(reason))
            .await
    }

    async fn decide(
        &self,
        principal: &Principal,
        category: RecordCategory,
        record_id: RecordId,
        reject_reason: Option<&str>,
    ) -> AppResult<Record> {
        if !principal.role().can_approve() {
            return Err(AppError::Forbidden(format!(
                "role '{}' may not decide approvals",
                principal.role().as_str()
            )));
        }

        let _writer = self.command_lock.lock().await;

        let mut record = self.require_record(category, record_id).await?;
        self.access.require(principal, &record).await?;

        let now = Self::now();
        let (action, outcome) = match reject_reason {
            None => {
                record.approve(principal.user_id(), now)?;
                (AuditAction::Approved, "approved")
            }
            Some(reason) => {
                record.reject(principal.user_id(), reason, now)?;
                (AuditAction::Rejected, "rejected")
            }
        };

        let detail = reject_reason.map(|reason| format!("reason: {}", reason.trim()));
        let event = audit_event(principal, &record, action, detail);
        self.repository.update(record.clone(), event).await?;

        if record.owner_id() != principal.user_id() {
            self.emit(Notification::new(
                record.owner_id(),
                NotificationType::ApprovalResult,
                record.category().as_str(),
                record.id().to_string(),
                format!("Record {outcome}"),
                format!("'{}' was {outcome}.", record.title().as_str()),
                now,
            ))
            .await;
        }

        Ok(record)
    }
}
