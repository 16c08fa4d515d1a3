//! LogService: validated reads and writes against the in-memory store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use worklog_core::summary::{self, CompletedTaskCount, DailyTaskCount, TaskSummary};
use worklog_core::{
    CompletionView, CoreError, Log, LogId, LogPage, LogQuery, LogUpdate, Lookback, NewLog,
    TaskStatusSummary, TaskTypeSummary,
};

use crate::state::AppState;

/// Log operations over shared state.
#[derive(Clone)]
pub struct LogService {
    state: Arc<AppState>,
}

impl LogService {
    /// Create a new LogService.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Validate and store a new log.
    pub async fn create(&self, body: NewLog) -> Result<Log, CoreError> {
        let log = body.validate()?;

        // Hold the write lock across the duplicate check and the insert.
        let mut logs = self.state.logs.write().await;
        if name_taken(&logs, &log.task_name, None) {
            warn!(task_name = %log.task_name, "Rejected duplicate task name");
            return Err(CoreError::DuplicateTaskName(log.task_name));
        }

        info!(
            log_id = %log.log_id,
            task_type = %log.task_type,
            task_status = %log.task_status,
            priority = %log.priority,
            "Creating log"
        );
        logs.insert(log.log_id.clone(), log.clone());
        Ok(log)
    }

    /// Fetch a log by id.
    pub async fn get(&self, log_id: &LogId) -> Result<Log, CoreError> {
        self.state
            .logs
            .read()
            .await
            .get(log_id)
            .cloned()
            .ok_or_else(|| CoreError::LogNotFound(log_id.to_string()))
    }

    /// Apply an update and return the updated log.
    ///
    /// An unknown id is reported before any field is validated.
    pub async fn update(&self, body: LogUpdate) -> Result<Log, CoreError> {
        if body.log_id.trim().is_empty() {
            return Err(CoreError::LogIdRequired);
        }

        let mut logs = self.state.logs.write().await;
        let target = LogId::new(body.log_id.clone());
        if !logs.contains_key(&target) {
            return Err(CoreError::LogNotFound(target.into_inner()));
        }

        let (log_id, changes) = body.validate()?;
        if let Some(name) = &changes.task_name {
            if name_taken(&logs, name, Some(&log_id)) {
                warn!(log_id = %log_id, task_name = %name, "Rejected rename to duplicate task name");
                return Err(CoreError::DuplicateTaskName(name.clone()));
            }
        }

        let log = logs
            .get_mut(&log_id)
            .ok_or_else(|| CoreError::LogNotFound(log_id.to_string()))?;
        log.apply(changes)?;

        info!(log_id = %log_id, task_status = %log.task_status, "Log updated");
        Ok(log.clone())
    }

    /// Remove a log and return it.
    pub async fn delete(&self, log_id: &LogId) -> Result<Log, CoreError> {
        let removed = self.state.logs.write().await.remove(log_id);
        match removed {
            Some(log) => {
                info!(log_id = %log_id, "Log deleted");
                Ok(log)
            }
            None => Err(CoreError::LogNotFound(log_id.to_string())),
        }
    }

    /// Remove every listed log. Unknown ids are skipped; returns how many
    /// logs were removed.
    pub async fn delete_many(&self, log_ids: &[LogId]) -> u64 {
        let mut logs = self.state.logs.write().await;
        let removed = log_ids
            .iter()
            .filter(|id| logs.remove(*id).is_some())
            .count() as u64;

        info!(requested = log_ids.len(), removed, "Logs deleted");
        removed
    }

    /// Run a listing query.
    pub async fn list(&self, query: &LogQuery) -> LogPage {
        let logs = self.state.logs.read().await;
        let page = query.run(logs.values());
        debug!(
            search = ?query.search,
            sort_by = %query.sort_by,
            sort_order = %query.sort_order,
            returned = page.logs.len(),
            total_pages = page.total_pages,
            "Listed logs"
        );
        page
    }

    /// Breakdown by status.
    pub async fn status_summary(&self) -> Vec<TaskStatusSummary> {
        summary::status_summary(self.state.logs.read().await.values())
    }

    /// Breakdown by type.
    pub async fn type_summary(&self) -> Vec<TaskTypeSummary> {
        summary::type_summary(self.state.logs.read().await.values())
    }

    /// Headline totals.
    pub async fn task_summary(&self) -> TaskSummary {
        summary::task_summary(self.state.logs.read().await.values())
    }

    /// Logs created per day.
    pub async fn daily_task_counts(&self) -> Vec<DailyTaskCount> {
        summary::daily_task_counts(self.state.logs.read().await.values())
    }

    /// Completed logs per bucket, ending at `now`.
    pub async fn completed_task_counts(
        &self,
        view: CompletionView,
        lookback: Lookback,
        now: DateTime<Utc>,
    ) -> Result<Vec<CompletedTaskCount>, CoreError> {
        summary::completed_task_counts(self.state.logs.read().await.values(), view, lookback, now)
    }
}

fn name_taken(logs: &HashMap<LogId, Log>, name: &str, except: Option<&LogId>) -> bool {
    logs.values()
        .any(|log| log.task_name == name && Some(&log.log_id) != except)
}
