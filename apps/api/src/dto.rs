mod audit;
mod common;
mod notifications;
mod records;

pub use audit::{AuditTrailEntryResponse, AuditTrailParams};
pub use common::HealthResponse;
pub use notifications::{MarkAllReadResponse, NotificationResponse, UnreadCountResponse};
pub use records::{
    AssignRequest, ChangeStatusRequest, CommentRequest, CreateRecordRequest, ListRecordsParams,
    RecordResponse, RecordStatsResponse, RejectRequest, UpdateRecordRequest,
};
