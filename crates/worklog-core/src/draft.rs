//! Request bodies for creating and updating logs, and their validation.
//!
//! Bodies arrive with loosely typed fields so that each bad field maps to
//! its own error instead of a generic deserialization failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::log::{check_order, non_blank};
use crate::{Log, LogId, Priority, TaskStatus, TaskType};

/// Body of a create request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewLog {
    pub task_name: String,
    pub task_type: String,
    pub task_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl NewLog {
    /// Create a body from typed values.
    pub fn new(task_name: impl Into<String>, task_type: TaskType, task_status: TaskStatus) -> Self {
        Self {
            task_name: task_name.into(),
            task_type: task_type.to_string(),
            task_status: task_status.to_string(),
            ..Default::default()
        }
    }

    /// Builder method to set priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority.value());
        self
    }

    /// Builder method to set notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Validate the body and build a fresh [`Log`].
    ///
    /// Checks run in order: name, status, type, priority, timestamps.
    /// A missing priority defaults to [`Priority::Low`].
    pub fn validate(self) -> Result<Log> {
        if self.task_name.trim().is_empty() {
            return Err(CoreError::TaskNameRequired);
        }
        let task_status: TaskStatus = self.task_status.parse()?;
        let task_type: TaskType = self.task_type.parse()?;
        let priority = match self.priority {
            Some(value) => Priority::try_from(value)?,
            None => Priority::default(),
        };

        let mut log = Log::new(self.task_name, task_type, task_status, priority)?;
        log.notes = self.notes.and_then(non_blank);
        log.started_at = self.started_at;
        log.completed_at = self.completed_at;
        log.validate()?;
        Ok(log)
    }
}

/// Body of an update request. Absent or blank fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogUpdate {
    pub log_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl LogUpdate {
    /// Create an empty update for the given log.
    pub fn new(log_id: impl Into<String>) -> Self {
        Self {
            log_id: log_id.into(),
            ..Default::default()
        }
    }

    /// Validate the body into the target id and typed changes.
    pub fn validate(self) -> Result<(LogId, LogChanges)> {
        if self.log_id.trim().is_empty() {
            return Err(CoreError::LogIdRequired);
        }

        let task_type = self
            .task_type
            .and_then(non_blank)
            .map(|s| s.parse::<TaskType>())
            .transpose()?;
        let task_status = self
            .task_status
            .and_then(non_blank)
            .map(|s| s.parse::<TaskStatus>())
            .transpose()?;
        let priority = self.priority.map(Priority::try_from).transpose()?;
        check_order(self.started_at, self.completed_at)?;

        let changes = LogChanges {
            task_name: self.task_name.and_then(non_blank),
            task_type,
            task_status,
            priority,
            notes: self.notes.and_then(non_blank),
            started_at: self.started_at,
            completed_at: self.completed_at,
        };

        if changes.is_empty() {
            return Err(CoreError::NoFieldsToUpdate);
        }

        Ok((LogId::new(self.log_id), changes))
    }
}

/// Validated, typed changes to an existing log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogChanges {
    pub task_name: Option<String>,
    pub task_type: Option<TaskType>,
    pub task_status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LogChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.task_name.is_none()
            && self.task_type.is_none()
            && self.task_status.is_none()
            && self.priority.is_none()
            && self.notes.is_none()
            && self.started_at.is_none()
            && self.completed_at.is_none()
    }
}
