use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use approvia_application::{CreateRecordInput, RecordListFilter, SortDirection, SortField};
use approvia_core::{AppError, Principal, UserId};
use approvia_domain::{
    Priority, ProjectId, RecordCategory, RecordEdit, RecordId, RecordStatus, VisibilityScope,
};
use uuid::Uuid;

use crate::dto::{
    AssignRequest, ChangeStatusRequest, CommentRequest, CreateRecordRequest, ListRecordsParams,
    RecordResponse, RecordStatsResponse, RejectRequest, UpdateRecordRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn create_record_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(category): Path<String>,
    Json(payload): Json<CreateRecordRequest>,
) -> ApiResult<(StatusCode, Json<RecordResponse>)> {
    let category = RecordCategory::from_str(category.as_str())?;
    let input = CreateRecordInput {
        title: payload.title,
        description: payload.description,
        assignee_id: payload.assignee_id.map(UserId::from_uuid),
        reviewer_id: payload.reviewer_id.map(UserId::from_uuid),
        project_id: payload.project_id.map(ProjectId::from_uuid),
        visibility_scope: parse_optional::<VisibilityScope>(payload.visibility_scope)?,
        priority: parse_optional::<Priority>(payload.priority)?,
        severity: payload.severity,
        due_date: payload.due_date,
    };

    let record = state.record_service.create(&principal, category, input).await?;
    Ok((StatusCode::CREATED, Json(RecordResponse::from(record))))
}

pub async fn list_records_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(category): Path<String>,
    Query(params): Query<ListRecordsParams>,
) -> ApiResult<Json<Vec<RecordResponse>>> {
    let category = RecordCategory::from_str(category.as_str())?;
    let filter = list_filter(category, params)?;

    let records = state
        .query_service
        .list(&principal, &filter)
        .await?
        .into_iter()
        .map(RecordResponse::from)
        .collect();

    Ok(Json(records))
}

pub async fn record_stats_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(category): Path<String>,
    Query(params): Query<ListRecordsParams>,
) -> ApiResult<Json<RecordStatsResponse>> {
    let category = RecordCategory::from_str(category.as_str())?;
    let filter = list_filter(category, params)?;

    let stats = state.query_service.stats(&principal, &filter).await?;
    Ok(Json(RecordStatsResponse::from(stats)))
}

pub async fn get_record_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((category, record_id)): Path<(String, Uuid)>,
) -> ApiResult<Json<RecordResponse>> {
    let category = RecordCategory::from_str(category.as_str())?;
    let record = state
        .record_service
        .get(&principal, category, RecordId::from_uuid(record_id))
        .await?;

    Ok(Json(RecordResponse::from(record)))
}

pub async fn update_record_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((category, record_id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateRecordRequest>,
) -> ApiResult<Json<RecordResponse>> {
    let category = RecordCategory::from_str(category.as_str())?;
    let edit = RecordEdit {
        title: payload.title,
        description: payload.description,
        visibility_scope: parse_optional::<VisibilityScope>(payload.visibility_scope)?,
        priority: parse_optional::<Priority>(payload.priority)?,
        severity: payload.severity,
        due_date: payload.due_date,
    };

    let record = state
        .record_service
        .update(&principal, category, RecordId::from_uuid(record_id), edit)
        .await?;

    Ok(Json(RecordResponse::from(record)))
}

pub async fn delete_record_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((category, record_id)): Path<(String, Uuid)>,
) -> ApiResult<StatusCode> {
    let category = RecordCategory::from_str(category.as_str())?;
    state
        .record_service
        .delete(&principal, category, RecordId::from_uuid(record_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn approve_record_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((category, record_id)): Path<(String, Uuid)>,
) -> ApiResult<Json<RecordResponse>> {
    let category = RecordCategory::from_str(category.as_str())?;
    let record = state
        .record_service
        .approve(&principal, category, RecordId::from_uuid(record_id))
        .await?;

    Ok(Json(RecordResponse::from(record)))
}

pub async fn reject_record_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((category, record_id)): Path<(String, Uuid)>,
    Json(payload): Json<RejectRequest>,
) -> ApiResult<Json<RecordResponse>> {
    let category = RecordCategory::from_str(category.as_str())?;
    let record = state
        .record_service
        .reject(
            &principal,
            category,
            RecordId::from_uuid(record_id),
            payload.reason.as_str(),
        )
        .await?;

    Ok(Json(RecordResponse::from(record)))
}

pub async fn change_status_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((category, record_id)): Path<(String, Uuid)>,
    Json(payload): Json<ChangeStatusRequest>,
) -> ApiResult<Json<RecordResponse>> {
    let category = RecordCategory::from_str(category.as_str())?;
    let target = RecordStatus::from_str(payload.status.as_str())?;

    let record = state
        .record_service
        .change_status(
            &principal,
            category,
            RecordId::from_uuid(record_id),
            target,
            payload.resolution,
        )
        .await?;

    Ok(Json(RecordResponse::from(record)))
}

pub async fn assign_record_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((category, record_id)): Path<(String, Uuid)>,
    Json(payload): Json<AssignRequest>,
) -> ApiResult<Json<RecordResponse>> {
    let category = RecordCategory::from_str(category.as_str())?;
    let record = state
        .record_service
        .assign(
            &principal,
            category,
            RecordId::from_uuid(record_id),
            UserId::from_uuid(payload.assignee_id),
        )
        .await?;

    Ok(Json(RecordResponse::from(record)))
}

pub async fn comment_record_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((category, record_id)): Path<(String, Uuid)>,
    Json(payload): Json<CommentRequest>,
) -> ApiResult<StatusCode> {
    let category = RecordCategory::from_str(category.as_str())?;
    let mentions: Vec<UserId> = payload
        .mentions
        .into_iter()
        .map(UserId::from_uuid)
        .collect();

    state
        .record_service
        .comment(
            &principal,
            category,
            RecordId::from_uuid(record_id),
            payload.body.as_str(),
            mentions.as_slice(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

fn list_filter(category: RecordCategory, params: ListRecordsParams) -> Result<RecordListFilter, AppError> {
    let sort = match (params.sort_by, params.sort_dir) {
        (None, _) => None,
        (Some(field), direction) => {
            let field = SortField::from_str(field.as_str())?;
            let direction = match direction {
                Some(direction) => SortDirection::from_str(direction.as_str())?,
                None => SortDirection::Ascending,
            };
            Some((field, direction))
        }
    };

    Ok(RecordListFilter {
        categories: vec![category],
        statuses: parse_list::<RecordStatus>(params.status)?,
        priorities: parse_list::<Priority>(params.priority)?,
        assignee_id: params.assignee_id.map(UserId::from_uuid),
        project_id: params.project_id.map(ProjectId::from_uuid),
        search: params.search,
        sort,
    })
}

fn parse_optional<T: FromStr<Err = AppError>>(value: Option<String>) -> Result<Option<T>, AppError> {
    value.map(|value| T::from_str(value.as_str())).transpose()
}

fn parse_list<T: FromStr<Err = AppError>>(value: Option<String>) -> Result<Vec<T>, AppError> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(T::from_str)
        .collect()
}
