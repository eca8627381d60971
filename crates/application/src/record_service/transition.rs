use approvia_core::{AppError, AppResult, Principal, UserId};
use approvia_domain::{
    AuditAction, Notification, NotificationType, Record, RecordCategory, RecordEdit, RecordId,
    RecordStatus,
};

use super::{RecordService, audit_event, can_steward};

impl RecordService {
    /// Moves a record to another in-family status.
    ///
    /// Reaching `Resolved` or `Closed` records the resolution fields in
    /// the same command.
    pub async fn change_status(
        &self,
        principal: &Principal,
        category: RecordCategory,
        record_id: RecordId,
        target: RecordStatus,
        resolution: Option<String>,
    ) -> AppResult<Record> {
        let _writer = self.command_lock.lock().await;

        let mut record = self.require_record(category, record_id).await?;
        if !can_steward(principal, &record) && !principal.role().can_approve() {
            return Err(AppError::Forbidden(format!(
                "user '{}' may not change the status of record '{record_id}'",
                principal.user_id()
            )));
        }

        let now = Self::now();
        let previous = record.status();
        record.change_status(target, resolution, principal.user_id(), now)?;

        let detail = format!("{} -> {}", previous.as_str(), target.as_str());
        let event = audit_event(principal, &record, AuditAction::StatusChanged, Some(detail));
        self.repository.update(record.clone(), event).await?;

        Ok(record)
    }

    /// Reassigns a non-terminal record to another user.
    pub async fn assign(
        &self,
        principal: &Principal,
        category: RecordCategory,
        record_id: RecordId,
        assignee: UserId,
    ) -> AppResult<Record> {
        let _writer = self.command_lock.lock().await;

        let mut record = self.require_record(category, record_id).await?;
        if !can_steward(principal, &record) && !principal.role().can_approve() {
            return Err(AppError::Forbidden(format!(
                "user '{}' may not reassign record '{record_id}'",
                principal.user_id()
            )));
        }

        let now = Self::now();
        record.assign(assignee, now)?;

        let detail = format!("assigned to '{assignee}'");
        let event = audit_event(principal, &record, AuditAction::Assigned, Some(detail));
        self.repository.update(record.clone(), event).await?;

        if assignee != principal.user_id() {
            let notification_type = if record.category() == RecordCategory::QualityIssue {
                NotificationType::IssueAssigned
            } else {
                NotificationType::Assignment
            };
            self.emit(Notification::new(
                assignee,
                notification_type,
                record.category().as_str(),
                record.id().to_string(),
                "Record assigned to you",
                format!("'{}' was assigned to you.", record.title().as_str()),
                now,
            ))
            .await;
        }

        Ok(record)
    }

    /// Edits the fields of a still-editable record.
    pub async fn update(
        &self,
        principal: &Principal,
        category: RecordCategory,
        record_id: RecordId,
        edit: RecordEdit,
    ) -> AppResult<Record> {
        let _writer = self.command_lock.lock().await;

        let mut record = self.require_record(category, record_id).await?;
        if !can_steward(principal, &record) {
            return Err(AppError::Forbidden(format!(
                "user '{}' may not edit record '{record_id}'",
                principal.user_id()
            )));
        }

        let now = Self::now();
        record.apply_edit(edit, now)?;

        let event = audit_event(principal, &record, AuditAction::Updated, None);
        self.repository.update(record.clone(), event).await?;

        Ok(record)
    }

    /// Records a comment event and notifies the record's audience.
    ///
    /// Comment threads themselves live in an external collaborator; the
    /// engine keeps the audit entry and derives the notifications.
    pub async fn comment(
        &self,
        principal: &Principal,
        category: RecordCategory,
        record_id: RecordId,
        body: &str,
        mentions: &[UserId],
    ) -> AppResult<()> {
        let body = body.trim();
        if body.is_empty() {
            return Err(AppError::Validation(
                "a comment requires a non-empty body".to_owned(),
            ));
        }

        let _writer = self.command_lock.lock().await;

        let record = self.require_record(category, record_id).await?;
        self.access.require(principal, &record).await?;

        let now = Self::now();
        let event = audit_event(
            principal,
            &record,
            AuditAction::Updated,
            Some("comment added".to_owned()),
        );
        self.repository.update(record.clone(), event).await?;

        let mut notified: Vec<UserId> = Vec::new();
        for follower in [Some(record.owner_id()), record.assignee_id()]
            .into_iter()
            .flatten()
        {
            if follower == principal.user_id() || notified.contains(&follower) {
                continue;
            }
            notified.push(follower);
            self.emit(Notification::new(
                follower,
                NotificationType::Comment,
                record.category().as_str(),
                record.id().to_string(),
                "New comment",
                format!("'{}' received a comment.", record.title().as_str()),
                now,
            ))
            .await;
        }

        for mention in mentions {
            if *mention == principal.user_id() || notified.contains(mention) {
                continue;
            }
            notified.push(*mention);
            self.emit(Notification::new(
                *mention,
                NotificationType::Mention,
                record.category().as_str(),
                record.id().to_string(),
                "You were mentioned",
                format!("You were mentioned on '{}'.", record.title().as_str()),
                now,
            ))
            .await;
        }

        Ok(())
    }
}
