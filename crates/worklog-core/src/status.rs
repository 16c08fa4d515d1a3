//! Closed enumerations for task type, task status and priority.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Classification of a work item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Regular piece of work.
    #[default]
    Task,
    /// Defect fix.
    Bug,
    /// User story.
    Story,
}

impl TaskType {
    /// Every task type, in declaration order.
    pub const ALL: [TaskType; 3] = [Self::Task, Self::Bug, Self::Story];

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Story => "story",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::InvalidTaskType(s.to_string()))
    }
}

/// Workflow stage of a log entry.
///
/// Variants are declared in workflow order, so the derived `Ord` reads
/// backlog < pending < progress < pr < staging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not yet scheduled.
    #[default]
    Backlog,
    /// Scheduled, waiting to start.
    Pending,
    /// Being worked on.
    Progress,
    /// Under review in a pull request.
    Pr,
    /// Deployed to staging.
    Staging,
}

impl TaskStatus {
    /// Every status, in workflow order.
    pub const ALL: [TaskStatus; 5] = [
        Self::Backlog,
        Self::Pending,
        Self::Progress,
        Self::Pr,
        Self::Staging,
    ];

    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Pending => "pending",
            Self::Progress => "progress",
            Self::Pr => "pr",
            Self::Staging => "staging",
        }
    }

    /// Zero-based index in the workflow.
    pub fn position(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| CoreError::InvalidTaskStatus(s.to_string()))
    }
}

/// Urgency on the fixed scale `{1, 5, 7, 10}`.
///
/// Serialized as the bare number. The scale is not contiguous; values in the
/// gaps are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Priority {
    #[default]
    Low = 1,
    Medium = 5,
    High = 7,
    Critical = 10,
}

impl Priority {
    /// Every level, lowest first.
    pub const ALL: [Priority; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Numeric level.
    pub fn value(&self) -> i64 {
        *self as i64
    }
}

impl TryFrom<i64> for Priority {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|p| p.value() == value)
            .ok_or(CoreError::InvalidPriority(value))
    }
}

impl From<Priority> for i64 {
    fn from(p: Priority) -> Self {
        p.value()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
