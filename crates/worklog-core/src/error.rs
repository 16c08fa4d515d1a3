//! Core domain errors.

use thiserror::Error;

/// Core domain errors for Worklog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Log not found.
    #[error("No records found with log id: {0}")]
    LogNotFound(String),

    /// Another log already uses this task name.
    #[error("Task name already exists: {0}")]
    DuplicateTaskName(String),

    /// Task name missing or blank.
    #[error("Task name is required")]
    TaskNameRequired,

    /// Log id missing from an update.
    #[error("Log id is required")]
    LogIdRequired,

    /// Task type outside `task | bug | story`.
    #[error("Invalid task type: {0}")]
    InvalidTaskType(String),

    /// Task status outside the workflow stages.
    #[error("Invalid task status: {0}")]
    InvalidTaskStatus(String),

    /// Priority outside `{1, 5, 7, 10}`.
    #[error("Invalid priority value: {0}")]
    InvalidPriority(i64),

    /// `completedAt` earlier than `startedAt`.
    #[error("Completed at ({completed_at}) precedes started at ({started_at})")]
    CompletedBeforeStarted {
        started_at: String,
        completed_at: String,
    },

    /// An update carried nothing to change.
    #[error("No valid fields to update")]
    NoFieldsToUpdate,

    /// Unknown column in `sortBy`.
    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    /// `sortOrder` other than asc/desc.
    #[error("Invalid sort order: {0}")]
    InvalidSortOrder(String),

    /// Completed-count view other than week/month.
    #[error("Invalid view: {0}")]
    InvalidView(String),

    /// Lookback text that does not parse as `<n> <unit>`.
    #[error("Invalid duration: {0}")]
    InvalidLookback(String),
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
