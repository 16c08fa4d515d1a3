//! Aggregated reports over a population of logs.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::window::{CompletionView, Lookback};
use crate::{Log, Priority, TaskStatus, TaskType};

/// Count and share of logs in one status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusSummary {
    pub task_status: TaskStatus,
    pub status_count: u64,
    /// Share of the population, 0 to 100.
    pub percentage: f64,
}

/// Count and share of logs of one type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTypeSummary {
    pub task_type: TaskType,
    /// Serialized as `statusCount`, the name existing consumers read.
    #[serde(rename = "statusCount")]
    pub type_count: u64,
    /// Share of the population, 0 to 100.
    pub percentage: f64,
}

/// Headline totals for a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub total_tasks: u64,
    pub total_bugs: u64,
    pub total_progress_tasks: u64,
    pub highest_priority_tasks: u64,
}

/// Number of logs created on one UTC date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTaskCount {
    pub created_date: NaiveDate,
    /// Date as `DD Mon YYYY`.
    pub formatted_date: String,
    pub task_count: u64,
}

/// Number of logs completed within one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTaskCount {
    /// Start of the bucket.
    pub completed_at: DateTime<Utc>,
    pub task_count: u64,
}

/// Count logs per status.
///
/// Rows appear in workflow order and only for statuses that occur.
pub fn status_summary<'a>(logs: impl IntoIterator<Item = &'a Log>) -> Vec<TaskStatusSummary> {
    let (counts, total) = count_by(logs, |log| log.task_status);
    TaskStatus::ALL
        .into_iter()
        .filter_map(|status| {
            let count = counts.get(&status).copied()?;
            Some(TaskStatusSummary {
                task_status: status,
                status_count: count,
                percentage: percentage(count, total),
            })
        })
        .collect()
}

/// Count logs per type.
///
/// Rows appear in declaration order and only for types that occur.
pub fn type_summary<'a>(logs: impl IntoIterator<Item = &'a Log>) -> Vec<TaskTypeSummary> {
    let (counts, total) = count_by(logs, |log| log.task_type);
    TaskType::ALL
        .into_iter()
        .filter_map(|task_type| {
            let count = counts.get(&task_type).copied()?;
            Some(TaskTypeSummary {
                task_type,
                type_count: count,
                percentage: percentage(count, total),
            })
        })
        .collect()
}

/// Headline totals.
pub fn task_summary<'a>(logs: impl IntoIterator<Item = &'a Log>) -> TaskSummary {
    logs.into_iter().fold(TaskSummary::default(), |mut acc, log| {
        acc.total_tasks += 1;
        if log.task_type == TaskType::Bug {
            acc.total_bugs += 1;
        }
        if log.task_status == TaskStatus::Progress {
            acc.total_progress_tasks += 1;
        }
        if log.priority == Priority::Critical {
            acc.highest_priority_tasks += 1;
        }
        acc
    })
}

/// Logs created per UTC date, oldest first. Dates without logs are skipped.
pub fn daily_task_counts<'a>(logs: impl IntoIterator<Item = &'a Log>) -> Vec<DailyTaskCount> {
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for log in logs {
        *per_day.entry(log.created_at.date_naive()).or_default() += 1;
    }

    per_day
        .into_iter()
        .map(|(date, count)| DailyTaskCount {
            created_date: date,
            formatted_date: date.format("%d %b %Y").to_string(),
            task_count: count,
        })
        .collect()
}

/// Completed logs per bucket, from the bucket holding `now - lookback`
/// through the bucket holding `now`. Empty buckets are included with a
/// zero count.
pub fn completed_task_counts<'a>(
    logs: impl IntoIterator<Item = &'a Log>,
    view: CompletionView,
    lookback: Lookback,
    now: DateTime<Utc>,
) -> Result<Vec<CompletedTaskCount>> {
    let first = view.truncate(lookback.before(now)?);

    let mut per_bucket: HashMap<DateTime<Utc>, u64> = HashMap::new();
    for completed_at in logs.into_iter().filter_map(|log| log.completed_at) {
        *per_bucket.entry(view.truncate(completed_at)).or_default() += 1;
    }

    let last = view.truncate(now);
    let mut bucket = first;
    let mut series = Vec::new();
    while bucket <= last {
        series.push(CompletedTaskCount {
            completed_at: bucket,
            task_count: per_bucket.get(&bucket).copied().unwrap_or(0),
        });
        let next = view.step(bucket);
        if next <= bucket {
            break;
        }
        bucket = next;
    }
    Ok(series)
}

fn count_by<'a, K, F>(logs: impl IntoIterator<Item = &'a Log>, key: F) -> (HashMap<K, u64>, u64)
where
    K: std::hash::Hash + Eq,
    F: Fn(&Log) -> K,
{
    let mut counts = HashMap::new();
    let mut total = 0;
    for log in logs {
        *counts.entry(key(log)).or_default() += 1;
        total += 1;
    }
    (counts, total)
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}
