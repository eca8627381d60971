//! Repository implementations backing the application ports.

#![forbid(unsafe_code)]

mod allow_all_project_directory;
mod in_memory_notification_repository;
mod in_memory_record_repository;
mod postgres_notification_repository;
mod postgres_record_repository;

pub use allow_all_project_directory::AllowAllProjectDirectory;
pub use in_memory_notification_repository::InMemoryNotificationRepository;
pub use in_memory_record_repository::InMemoryRecordRepository;
pub use postgres_notification_repository::PostgresNotificationRepository;
pub use postgres_record_repository::{PostgresAuditTrailRepository, PostgresRecordRepository};
