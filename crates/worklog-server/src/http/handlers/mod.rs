//! HTTP request handlers.

mod health;
mod logs;
mod summaries;

pub use health::{health_check, metrics_handler, ping};
pub use logs::{create_log, delete_log, delete_logs, get_log, list_logs, update_log};
pub use summaries::{
    completed_task_count, daily_task_count, status_summary, task_summary, type_summary,
};
