//! Prometheus metrics collection and formatting.
//!
//! This module provides metrics in Prometheus text exposition format.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use worklog_core::{Priority, TaskStatus, TaskType};

use crate::state::AppState;

/// Collect all metrics from AppState and format as Prometheus text.
pub async fn collect_metrics(state: &Arc<AppState>) -> String {
    let logs = state.logs.read().await;

    let mut by_status: HashMap<TaskStatus, u64> = HashMap::new();
    let mut by_type: HashMap<TaskType, u64> = HashMap::new();
    let mut by_priority: HashMap<Priority, u64> = HashMap::new();
    let mut completed = 0u64;

    for log in logs.values() {
        *by_status.entry(log.task_status).or_default() += 1;
        *by_type.entry(log.task_type).or_default() += 1;
        *by_priority.entry(log.priority).or_default() += 1;
        if log.is_completed() {
            completed += 1;
        }
    }
    drop(logs);

    let mut output = String::new();

    writeln!(
        output,
        "# HELP worklog_logs_total Number of logs by workflow status"
    )
    .ok();
    writeln!(output, "# TYPE worklog_logs_total gauge").ok();
    for status in TaskStatus::ALL {
        let count = by_status.get(&status).copied().unwrap_or(0);
        writeln!(output, "worklog_logs_total{{status=\"{status}\"}} {count}").ok();
    }

    writeln!(output).ok();
    writeln!(output, "# HELP worklog_logs_by_type Number of logs by type").ok();
    writeln!(output, "# TYPE worklog_logs_by_type gauge").ok();
    for task_type in TaskType::ALL {
        let count = by_type.get(&task_type).copied().unwrap_or(0);
        writeln!(output, "worklog_logs_by_type{{type=\"{task_type}\"}} {count}").ok();
    }

    writeln!(output).ok();
    writeln!(
        output,
        "# HELP worklog_logs_by_priority Number of logs by priority"
    )
    .ok();
    writeln!(output, "# TYPE worklog_logs_by_priority gauge").ok();
    for priority in Priority::ALL {
        let count = by_priority.get(&priority).copied().unwrap_or(0);
        writeln!(
            output,
            "worklog_logs_by_priority{{priority=\"{priority}\"}} {count}"
        )
        .ok();
    }

    writeln!(output).ok();
    writeln!(
        output,
        "# HELP worklog_logs_completed Number of logs with a completion time"
    )
    .ok();
    writeln!(output, "# TYPE worklog_logs_completed gauge").ok();
    writeln!(output, "worklog_logs_completed {completed}").ok();

    output
}
