//! The worklog entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::LogChanges;
use crate::error::{CoreError, Result};
use crate::{LogId, Priority, TaskStatus, TaskType};

/// A single worklog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    /// Unique log identifier, assigned on creation.
    pub log_id: LogId,

    /// Free-text label, unique within a store.
    pub task_name: String,

    /// Kind of work.
    pub task_type: TaskType,

    /// Current workflow stage.
    pub task_status: TaskStatus,

    /// Urgency level.
    pub priority: Priority,

    /// Optional annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// When work started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// When work finished.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// When the log was created.
    pub created_at: DateTime<Utc>,

    /// When the log was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Log {
    /// Create a new Log with a fresh id.
    pub fn new(
        task_name: impl Into<String>,
        task_type: TaskType,
        task_status: TaskStatus,
        priority: Priority,
    ) -> Result<Self> {
        let task_name = task_name.into();
        if task_name.trim().is_empty() {
            return Err(CoreError::TaskNameRequired);
        }

        let now = Utc::now();
        Ok(Self {
            log_id: LogId::generate(),
            task_name,
            task_type,
            task_status,
            priority,
            notes: None,
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Builder method to set notes. Blank notes count as none.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_blank(notes.into());
        self
    }

    /// Builder method to set the start time.
    pub fn with_started_at(mut self, at: DateTime<Utc>) -> Self {
        self.started_at = Some(at);
        self
    }

    /// Builder method to set the completion time.
    pub fn with_completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.completed_at = Some(at);
        self
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: LogId) -> Self {
        self.log_id = id;
        self
    }

    /// Builder method to backdate creation (useful for testing).
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }

    /// Check the invariants a constructed log must hold.
    pub fn validate(&self) -> Result<()> {
        if self.task_name.trim().is_empty() {
            return Err(CoreError::TaskNameRequired);
        }
        check_order(self.started_at, self.completed_at)
    }

    /// Apply validated changes and bump `updated_at`.
    ///
    /// The log is left untouched when the result would break timestamp
    /// ordering.
    pub fn apply(&mut self, changes: LogChanges) -> Result<()> {
        check_order(
            changes.started_at.or(self.started_at),
            changes.completed_at.or(self.completed_at),
        )?;

        if let Some(name) = changes.task_name {
            self.task_name = name;
        }
        if let Some(task_type) = changes.task_type {
            self.task_type = task_type;
        }
        if let Some(status) = changes.task_status {
            self.task_status = status;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(notes) = changes.notes {
            self.notes = Some(notes);
        }
        if let Some(at) = changes.started_at {
            self.started_at = Some(at);
        }
        if let Some(at) = changes.completed_at {
            self.completed_at = Some(at);
        }

        // Keep updated_at monotonic even if the clock reads behind created_at.
        self.updated_at = Utc::now().max(self.created_at);
        Ok(())
    }

    /// Whether the log has a completion time.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

pub(crate) fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

pub(crate) fn check_order(
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
) -> Result<()> {
    match (started_at, completed_at) {
        (Some(start), Some(end)) if end < start => Err(CoreError::CompletedBeforeStarted {
            started_at: start.to_rfc3339(),
            completed_at: end.to_rfc3339(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Log {
        Log::new("Fix login redirect", TaskType::Bug, TaskStatus::Progress, Priority::High).unwrap()
    }

    #[test]
    fn test_new_log_minimal_is_valid() {
        let log = sample();
        assert!(log.notes.is_none());
        assert!(log.started_at.is_none());
        assert!(log.completed_at.is_none());
        assert_eq!(log.created_at, log.updated_at);
        assert!(log.validate().is_ok());
    }

    #[test]
    fn test_new_log_rejects_blank_name() {
        let err = Log::new("   ", TaskType::Task, TaskStatus::Backlog, Priority::Low).unwrap_err();
        assert_eq!(err, CoreError::TaskNameRequired);
    }

    #[test]
    fn test_serialization_uses_contract_field_names() {
        let log = sample().with_id(LogId::new("log-1"));
        let value = serde_json::to_value(&log).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj["logId"], "log-1");
        assert_eq!(obj["taskName"], "Fix login redirect");
        assert_eq!(obj["taskType"], "bug");
        assert_eq!(obj["taskStatus"], "progress");
        assert_eq!(obj["priority"], 7);
        assert!(obj.contains_key("createdAt"));
        assert!(obj.contains_key("updatedAt"));
        assert!(!obj.contains_key("notes"));
        assert!(!obj.contains_key("startedAt"));
        assert!(!obj.contains_key("completedAt"));
    }

    #[test]
    fn test_round_trip_preserves_optional_fields() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 2, 17, 30, 0).unwrap();
        let full = sample()
            .with_notes("needs QA")
            .with_started_at(start)
            .with_completed_at(end);
        let bare = sample();

        for log in [full, bare] {
            let json = serde_json::to_string(&log).unwrap();
            let back: Log = serde_json::from_str(&json).unwrap();
            assert_eq!(back, log);
        }
    }

    #[test]
    fn test_deserialize_rejects_out_of_scale_priority() {
        let json = r#"{
            "logId": "x", "taskName": "t", "taskType": "task", "taskStatus": "pending",
            "priority": 3, "createdAt": "2025-01-01T00:00:00Z", "updatedAt": "2025-01-01T00:00:00Z"
        }"#;
        assert!(serde_json::from_str::<Log>(json).is_err());
    }

    #[test]
    fn test_validate_rejects_completion_before_start() {
        let start = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let log = sample().with_started_at(start).with_completed_at(end);
        assert!(matches!(log.validate(), Err(CoreError::CompletedBeforeStarted { .. })));
    }

    #[test]
    fn test_apply_bumps_updated_at() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut log = sample().with_created_at(created);
        let changes = LogChanges {
            task_status: Some(TaskStatus::Staging),
            notes: Some("shipped".to_string()),
            ..Default::default()
        };

        log.apply(changes).unwrap();
        assert_eq!(log.task_status, TaskStatus::Staging);
        assert_eq!(log.notes.as_deref(), Some("shipped"));
        assert!(log.updated_at > created);
        assert_eq!(log.created_at, created);
    }

    #[test]
    fn test_apply_rejects_completion_before_existing_start() {
        let start = Utc.with_ymd_and_hms(2025, 5, 10, 0, 0, 0).unwrap();
        let mut log = sample().with_started_at(start);
        let before = log.clone();
        let changes = LogChanges {
            completed_at: Some(Utc.with_ymd_and_hms(2025, 5, 9, 0, 0, 0).unwrap()),
            ..Default::default()
        };

        assert!(log.apply(changes).is_err());
        assert_eq!(log, before);
    }
}
