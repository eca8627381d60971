use axum::Json;
use axum::extract::{Extension, Query, State};
use approvia_application::AuditTrailQuery;
use approvia_core::Principal;

use crate::dto::{AuditTrailEntryResponse, AuditTrailParams};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn audit_trail_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<AuditTrailParams>,
) -> ApiResult<Json<Vec<AuditTrailEntryResponse>>> {
    let defaults = AuditTrailQuery::default();
    let query = AuditTrailQuery {
        limit: params.limit.unwrap_or(defaults.limit),
        offset: params.offset.unwrap_or(defaults.offset),
    };

    let entries = state
        .audit_trail_service
        .list_for_entity(
            &principal,
            params.entity_type.as_str(),
            params.entity_id.as_str(),
            query,
        )
        .await?
        .into_iter()
        .map(AuditTrailEntryResponse::from)
        .collect();

    Ok(Json(entries))
}
