//! Mapping of domain errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::warn;

use worklog_core::api::MessageResponse;
use worklog_core::CoreError;

/// Errors a handler can return. Rendered as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Domain validation or lookup failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Malformed request (bad JSON, unparsable parameter encoding).
    #[error("{0}")]
    BadRequest(String),

    /// Well-formed request with an unusable value.
    #[error("{0}")]
    Unprocessable(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(err) => match err {
                CoreError::LogNotFound(_) => StatusCode::NOT_FOUND,
                CoreError::DuplicateTaskName(_) => StatusCode::CONFLICT,
                CoreError::NoFieldsToUpdate => StatusCode::BAD_REQUEST,
                CoreError::TaskNameRequired
                | CoreError::LogIdRequired
                | CoreError::InvalidTaskType(_)
                | CoreError::InvalidTaskStatus(_)
                | CoreError::InvalidPriority(_)
                | CoreError::CompletedBeforeStarted { .. }
                | CoreError::InvalidSortField(_)
                | CoreError::InvalidSortOrder(_)
                | CoreError::InvalidView(_)
                | CoreError::InvalidLookback(_) => StatusCode::UNPROCESSABLE_ENTITY,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(status = status.as_u16(), error = %self, "Request rejected");
        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}
