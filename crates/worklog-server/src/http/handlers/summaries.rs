//! Summary and report handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use worklog_core::api::{
    CompletedCountResponse, DailyTasksResponse, StatusSummaryResponse, TypeSummaryResponse,
};
use worklog_core::TaskSummary;

use crate::http::error::ApiError;
use crate::http::responses::CompletedCountParams;
use crate::service::LogService;
use crate::state::AppState;

/// Count and share of logs per status.
pub async fn status_summary(State(state): State<Arc<AppState>>) -> Json<StatusSummaryResponse> {
    Json(StatusSummaryResponse {
        status_summary: LogService::new(state).status_summary().await,
    })
}

/// Count and share of logs per type.
pub async fn type_summary(State(state): State<Arc<AppState>>) -> Json<TypeSummaryResponse> {
    Json(TypeSummaryResponse {
        type_summary: LogService::new(state).type_summary().await,
    })
}

/// Logs created per day.
pub async fn daily_task_count(State(state): State<Arc<AppState>>) -> Json<DailyTasksResponse> {
    Json(DailyTasksResponse {
        daily_tasks: LogService::new(state).daily_task_counts().await,
    })
}

/// Completed logs per week or month, `?v=week|month&d=<lookback>`.
pub async fn completed_task_count(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CompletedCountParams>,
) -> Result<Json<CompletedCountResponse>, ApiError> {
    let (view, lookback) = params.parse()?;
    let completed_count = LogService::new(state)
        .completed_task_counts(view, lookback, Utc::now())
        .await?;
    Ok(Json(CompletedCountResponse {
        message: "ok".to_string(),
        completed_count,
    }))
}

/// Headline totals.
pub async fn task_summary(State(state): State<Arc<AppState>>) -> Json<TaskSummary> {
    Json(LogService::new(state).task_summary().await)
}
