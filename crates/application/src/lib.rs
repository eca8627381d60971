//! Application services and ports.

#![forbid(unsafe_code)]

mod access;
mod audit_trail_service;
mod notification_ports;
mod notification_service;
mod project_ports;
mod query_service;
mod record_ports;
mod record_service;

pub use access::AccessPolicy;
pub use audit_trail_service::AuditTrailService;
pub use notification_ports::NotificationRepository;
pub use notification_service::NotificationService;
pub use project_ports::ProjectDirectory;
pub use query_service::{
    QueryService, RecordListFilter, RecordStats, SortDirection, SortField, sort_records,
};
pub use record_ports::{
    AuditEvent, AuditTrailEntry, AuditTrailQuery, AuditTrailRepository, CreateRecordInput,
    RecordRepository,
};
pub use record_service::RecordService;
