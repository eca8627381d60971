//! Approvia API composition root.

#![forbid(unsafe_code)]

mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::from_fn;
use axum::routing::{get, patch, post};
use approvia_application::{
    AccessPolicy, AuditTrailRepository, AuditTrailService, NotificationRepository,
    NotificationService, QueryService, RecordRepository, RecordService,
};
use approvia_core::AppError;
use approvia_infrastructure::{
    AllowAllProjectDirectory, InMemoryNotificationRepository, InMemoryRecordRepository,
    PostgresAuditTrailRepository, PostgresNotificationRepository, PostgresRecordRepository,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
    let repository = env::var("REPOSITORY").unwrap_or_else(|_| "postgres".to_owned());

    let (records, trail, notifications) = build_repositories(repository.as_str()).await?;

    let access = AccessPolicy::new(Arc::new(AllowAllProjectDirectory::new()));
    let app_state = AppState {
        record_service: RecordService::new(
            records.clone(),
            notifications.clone(),
            access.clone(),
        ),
        query_service: QueryService::new(records.clone(), access.clone()),
        notification_service: NotificationService::new(notifications),
        audit_trail_service: AuditTrailService::new(records, trail, access),
    };

    let cors = CorsLayer::new()
        .allow_origin(frontend_url.parse::<HeaderValue>().map_err(|error| {
            AppError::Validation(format!("invalid FRONTEND_URL '{frontend_url}': {error}"))
        })?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-user-role"),
            HeaderName::from_static("x-user-department"),
        ]);

    let protected_routes = Router::new()
        .route(
            "/api/records/{category}",
            get(handlers::records::list_records_handler)
                .post(handlers::records::create_record_handler),
        )
        .route(
            "/api/records/{category}/stats",
            get(handlers::records::record_stats_handler),
        )
        .route(
            "/api/records/{category}/{record_id}",
            get(handlers::records::get_record_handler)
                .put(handlers::records::update_record_handler)
                .delete(handlers::records::delete_record_handler),
        )
        .route(
            "/api/records/{category}/{record_id}/approve",
            post(handlers::records::approve_record_handler),
        )
        .route(
            "/api/records/{category}/{record_id}/reject",
            post(handlers::records::reject_record_handler),
        )
        .route(
            "/api/records/{category}/{record_id}/status",
            patch(handlers::records::change_status_handler),
        )
        .route(
            "/api/records/{category}/{record_id}/assign",
            post(handlers::records::assign_record_handler),
        )
        .route(
            "/api/records/{category}/{record_id}/comments",
            post(handlers::records::comment_record_handler),
        )
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications_handler),
        )
        .route(
            "/api/notifications/unread-count",
            get(handlers::notifications::unread_count_handler),
        )
        .route(
            "/api/notifications/{notification_id}/read",
            post(handlers::notifications::mark_read_handler),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::notifications::mark_all_read_handler),
        )
        .route("/api/audit-trail", get(handlers::audit::audit_trail_handler))
        .layer(from_fn(middleware::require_principal))
        .with_state(app_state);

    let app = Router::new()
        .route("/api/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let host = IpAddr::from_str(api_host.as_str())
        .map_err(|error| AppError::Validation(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::new(host, api_port);

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, %repository, "approvia api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server terminated: {error}")))?;

    Ok(())
}

type Repositories = (
    Arc<dyn RecordRepository>,
    Arc<dyn AuditTrailRepository>,
    Arc<dyn NotificationRepository>,
);

async fn build_repositories(repository: &str) -> Result<Repositories, AppError> {
    match repository {
        "postgres" => {
            let database_url = env::var("DATABASE_URL").map_err(|_| {
                AppError::Validation("DATABASE_URL must be set for REPOSITORY=postgres".to_owned())
            })?;

            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url.as_str())
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to connect to database: {error}"))
                })?;

            sqlx::migrate!("../../crates/infrastructure/migrations")
                .run(&pool)
                .await
                .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

            Ok((
                Arc::new(PostgresRecordRepository::new(pool.clone())),
                Arc::new(PostgresAuditTrailRepository::new(pool.clone())),
                Arc::new(PostgresNotificationRepository::new(pool)),
            ))
        }
        "memory" => {
            let records = Arc::new(InMemoryRecordRepository::new());
            Ok((
                records.clone(),
                records,
                Arc::new(InMemoryNotificationRepository::new()),
            ))
        }
        _ => Err(AppError::Validation(format!(
            "REPOSITORY must be either 'postgres' or 'memory', got '{repository}'"
        ))),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
