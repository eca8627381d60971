use approvia_application::{AuditTrailService, NotificationService, QueryService, RecordService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub record_service: RecordService,
    pub query_service: QueryService,
    pub notification_service: NotificationService,
    pub audit_trail_service: AuditTrailService,
}
