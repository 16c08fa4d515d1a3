//! JSON envelopes exchanged over the HTTP API.

use serde::{Deserialize, Serialize};

use crate::summary::{CompletedTaskCount, DailyTaskCount, TaskStatusSummary, TaskTypeSummary};
use crate::Log;

/// Plain acknowledgement or error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single log with a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEnvelope {
    pub message: String,
    pub log: Log,
}

/// A listing row: the log plus the page count of the listing it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogListItem {
    #[serde(flatten)]
    pub log: Log,
    pub total_pages: u64,
}

/// Body of `GET /logs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogListResponse {
    pub logs: Vec<LogListItem>,
}

impl LogListResponse {
    /// Page count of the listing, zero when empty.
    pub fn total_pages(&self) -> u64 {
        self.logs.first().map(|l| l.total_pages).unwrap_or(0)
    }
}

/// Body of `DELETE /logs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteManyResponse {
    pub message: String,
    pub row_count: u64,
}

/// Body of `GET /status-summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummaryResponse {
    pub status_summary: Vec<TaskStatusSummary>,
}

/// Body of `GET /type-summary`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSummaryResponse {
    pub type_summary: Vec<TaskTypeSummary>,
}

/// Body of `GET /daily-task-count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTasksResponse {
    pub daily_tasks: Vec<DailyTaskCount>,
}

/// Body of `GET /completed-task-count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedCountResponse {
    pub message: String,
    pub completed_count: Vec<CompletedTaskCount>,
}
