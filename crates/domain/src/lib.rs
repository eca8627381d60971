//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod audit;
mod notification;
mod record;
mod status;
mod visibility;

pub use audit::AuditAction;
pub use notification::{Notification, NotificationId, NotificationType};
pub use record::{
    Priority, ProjectId, Record, RecordCategory, RecordEdit, RecordId, RecordInput,
    VisibilityScope, format_issue_number,
};
pub use status::RecordStatus;
pub use visibility::{can_access, effective_scope};
