use approvia_core::{AppResult, Principal};
use approvia_domain::{
    AuditAction, Notification, NotificationType, Record, RecordCategory, RecordInput,
    format_issue_number,
};
use chrono::Datelike;

use super::{RecordService, audit_event};
use crate::record_ports::CreateRecordInput;

impl RecordService {
    /// Creates a record in its family entry state.
    ///
    /// The submitting principal becomes the owner. Quality issues receive
    /// a `QI-<year>-<nnn>` number from the serialized per-year allocator
    /// before the insert, so concurrent creations never share a number.
    pub async fn create(
        &self,
        principal: &Principal,
        category: RecordCategory,
        input: CreateRecordInput,
    ) -> AppResult<Record> {
        let _writer = self.command_lock.lock().await;

        let now = Self::now();
        let issue_number = if category == RecordCategory::QualityIssue {
            let year = now.year();
            let sequence = self.repository.allocate_issue_number(year).await?;
            Some(format_issue_number(year, sequence))
        } else {
            None
        };

        let record = Record::new(
            RecordInput {
                category,
                title: input.title,
                description: input.description,
                owner_id: principal.user_id(),
                assignee_id: input.assignee_id,
                project_id: input.project_id,
                visibility_scope: input.visibility_scope,
                priority: input.priority,
                severity: input.severity,
                due_date: input.due_date,
                issue_number,
            },
            now,
        )?;

        let event = audit_event(principal, &record, AuditAction::Created, None);
        self.repository.insert(record.clone(), event).await?;

        if let Some(assignee) = input.assignee_id
            && assignee != principal.user_id()
        {
            let notification_type = if category == RecordCategory::QualityIssue {
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

        if let Some(reviewer) = input.reviewer_id
            && reviewer != principal.user_id()
        {
            self.emit(Notification::new(
                reviewer,
                NotificationType::ApprovalRequest,
                record.category().as_str(),
                record.id().to_string(),
                "Approval requested",
                format!("'{}' awaits your review.", record.title().as_str()),
                now,
            ))
            .await;
        }

        Ok(record)
    }
}
