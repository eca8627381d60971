use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use approvia_core::Principal;
use approvia_domain::NotificationId;
use uuid::Uuid;

use crate::dto::{MarkAllReadResponse, NotificationResponse, UnreadCountResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<NotificationResponse>>> {
    let notifications = state
        .notification_service
        .list(&principal)
        .await?
        .into_iter()
        .map(NotificationResponse::from)
        .collect();

    Ok(Json(notifications))
}

pub async fn unread_count_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<UnreadCountResponse>> {
    let unread = state.notification_service.unread_count(&principal).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

pub async fn mark_read_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(notification_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .notification_service
        .mark_read(&principal, NotificationId::from_uuid(notification_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_all_read_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<MarkAllReadResponse>> {
    let updated = state.notification_service.mark_all_read(&principal).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
