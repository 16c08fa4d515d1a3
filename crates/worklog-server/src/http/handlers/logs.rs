//! Log CRUD and listing handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use worklog_core::api::{
    DeleteManyResponse, LogEnvelope, LogListItem, LogListResponse, MessageResponse,
};
use worklog_core::{LogId, LogUpdate, NewLog};

use crate::http::error::ApiError;
use crate::http::responses::{DeleteLogsParams, ListLogsParams};
use crate::service::LogService;
use crate::state::AppState;

/// List logs with optional search, sorting and pagination.
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListLogsParams>,
) -> Result<Json<LogListResponse>, ApiError> {
    let query = params.into_query()?;
    let page = LogService::new(state).list(&query).await;

    let total_pages = page.total_pages;
    let logs = page
        .logs
        .into_iter()
        .map(|log| LogListItem { log, total_pages })
        .collect();
    Ok(Json(LogListResponse { logs }))
}

/// Fetch one log.
pub async fn get_log(
    State(state): State<Arc<AppState>>,
    Path(log_id): Path<String>,
) -> Result<Json<LogEnvelope>, ApiError> {
    let log = LogService::new(state).get(&LogId::new(log_id)).await?;
    Ok(Json(LogEnvelope {
        message: "Ok".to_string(),
        log,
    }))
}

/// Create a log.
pub async fn create_log(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewLog>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let log = LogService::new(state).create(body).await?;
    Ok((
        StatusCode::CREATED,
        Json(LogEnvelope {
            message: "Log created successfully".to_string(),
            log,
        }),
    ))
}

/// Update a log. The id travels in the body.
pub async fn update_log(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LogUpdate>, JsonRejection>,
) -> Result<Json<LogEnvelope>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let log = LogService::new(state).update(body).await?;
    Ok(Json(LogEnvelope {
        message: "Log updated successfully".to_string(),
        log,
    }))
}

/// Delete one log.
pub async fn delete_log(
    State(state): State<Arc<AppState>>,
    Path(log_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    LogService::new(state).delete(&LogId::new(log_id)).await?;
    Ok(Json(MessageResponse::new("Successfully deleted the log")))
}

/// Delete several logs given as `?logIds=["a","b"]`.
pub async fn delete_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DeleteLogsParams>,
) -> Result<Json<DeleteManyResponse>, ApiError> {
    let ids = params.into_ids()?;
    let row_count = LogService::new(state).delete_many(&ids).await;
    info!(row_count, "Bulk delete finished");
    Ok(Json(DeleteManyResponse {
        message: "Logs deleted successfully".to_string(),
        row_count,
    }))
}
