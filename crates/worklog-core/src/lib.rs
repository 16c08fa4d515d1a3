//! Worklog Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Database
//! - Runtime specifics
//!
//! All types here represent the worklog contract shared by the server,
//! the client library and the CLI.

pub mod api;
pub mod draft;
pub mod error;
pub mod ids;
pub mod log;
pub mod query;
pub mod status;
pub mod summary;
pub mod window;

// Re-export commonly used types
pub use draft::{LogChanges, LogUpdate, NewLog};
pub use error::{CoreError, Result};
pub use ids::LogId;
pub use log::Log;
pub use query::{LogPage, LogQuery, SortField, SortOrder};
pub use status::{Priority, TaskStatus, TaskType};
pub use summary::{
    CompletedTaskCount, DailyTaskCount, TaskStatusSummary, TaskSummary, TaskTypeSummary,
};
pub use window::{CompletionView, Lookback, LookbackUnit};
