mod audit;
mod inputs;
mod repository;

pub use audit::{AuditEvent, AuditTrailEntry, AuditTrailQuery, AuditTrailRepository};
pub use inputs::CreateRecordInput;
pub use repository::RecordRepository;
