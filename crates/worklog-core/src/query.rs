//! Listing logs: search, sort and pagination.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::Log;

/// Page size used when none (or zero) is requested.
pub const DEFAULT_LIMIT: u32 = 10;

/// Column a listing can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    TaskName,
    TaskType,
    TaskStatus,
    Priority,
    StartedAt,
    CompletedAt,
    CreatedAt,
    #[default]
    UpdatedAt,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        Self::TaskName,
        Self::TaskType,
        Self::TaskStatus,
        Self::Priority,
        Self::StartedAt,
        Self::CompletedAt,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    /// camelCase name, as used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskName => "taskName",
            Self::TaskType => "taskType",
            Self::TaskStatus => "taskStatus",
            Self::Priority => "priority",
            Self::StartedAt => "startedAt",
            Self::CompletedAt => "completedAt",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }

    /// snake_case column name.
    pub fn column(&self) -> &'static str {
        match self {
            Self::TaskName => "task_name",
            Self::TaskType => "task_type",
            Self::TaskStatus => "task_status",
            Self::Priority => "priority",
            Self::StartedAt => "started_at",
            Self::CompletedAt => "completed_at",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    /// Ascending comparison. Missing timestamps sort after present ones.
    fn compare(&self, a: &Log, b: &Log) -> Ordering {
        match self {
            Self::TaskName => a.task_name.cmp(&b.task_name),
            Self::TaskType => a.task_type.as_str().cmp(b.task_type.as_str()),
            Self::TaskStatus => a.task_status.as_str().cmp(b.task_status.as_str()),
            Self::Priority => a.priority.cmp(&b.priority),
            Self::StartedAt => nulls_last(a.started_at, b.started_at),
            Self::CompletedAt => nulls_last(a.completed_at, b.completed_at),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }
}

fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    /// Accepts camelCase (`taskName`) or snake_case (`task_name`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s || f.column() == s)
            .ok_or_else(|| CoreError::InvalidSortField(s.to_string()))
    }
}

/// Direction of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(CoreError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Parameters of a log listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    /// Free-text search over task name and notes.
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// Page size; zero means [`DEFAULT_LIMIT`].
    pub limit: u32,
    /// Zero-based page number.
    pub page: u32,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            search: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            limit: DEFAULT_LIMIT,
            page: 0,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct LogPage {
    pub logs: Vec<Log>,
    /// Pages available at the current page size.
    pub total_pages: u64,
}

impl LogQuery {
    /// Builder method to set the search text.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Builder method to set ordering.
    pub fn sorted(mut self, sort_by: SortField, sort_order: SortOrder) -> Self {
        self.sort_by = sort_by;
        self.sort_order = sort_order;
        self
    }

    /// Builder method to set pagination.
    pub fn paged(mut self, limit: u32, page: u32) -> Self {
        self.limit = limit;
        self.page = page;
        self
    }

    /// Effective page size.
    pub fn page_size(&self) -> u32 {
        if self.limit == 0 {
            DEFAULT_LIMIT
        } else {
            self.limit
        }
    }

    /// Search terms, lowercased. Empty when there is no search.
    fn terms(&self) -> Vec<String> {
        self.search
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default()
    }

    /// Run the query over a population and return the requested page.
    ///
    /// With search terms, a log matches when every term occurs in its task
    /// name or notes (case-insensitive). Matches are ranked by total term
    /// occurrences, then most recently updated; `sort_by` is ignored.
    pub fn run<'a>(&self, logs: impl IntoIterator<Item = &'a Log>) -> LogPage {
        let terms = self.terms();

        let mut matched: Vec<&Log> = if terms.is_empty() {
            let mut all: Vec<&Log> = logs.into_iter().collect();
            all.sort_by(|a, b| {
                let ord = self.sort_by.compare(a, b);
                let ord = match self.sort_order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                };
                ord.then_with(|| a.log_id.cmp(&b.log_id))
            });
            all
        } else {
            let mut scored: Vec<(usize, &Log)> = logs
                .into_iter()
                .filter_map(|log| relevance(log, &terms).map(|score| (score, log)))
                .collect();
            scored.sort_by(|(sa, a), (sb, b)| {
                sb.cmp(sa)
                    .then_with(|| b.updated_at.cmp(&a.updated_at))
                    .then_with(|| a.log_id.cmp(&b.log_id))
            });
            scored.into_iter().map(|(_, log)| log).collect()
        };

        let limit = self.page_size() as usize;
        let total = matched.len();
        let total_pages = total.div_ceil(limit) as u64;
        let offset = (self.page as usize).saturating_mul(limit);

        let logs = if offset >= total {
            Vec::new()
        } else {
            matched.drain(offset..).take(limit).cloned().collect()
        };

        LogPage { logs, total_pages }
    }
}

/// Occurrences of all terms in name and notes, or `None` if any term is
/// missing.
fn relevance(log: &Log, terms: &[String]) -> Option<usize> {
    let haystack = match &log.notes {
        Some(notes) => format!("{} {}", log.task_name, notes).to_lowercase(),
        None => log.task_name.to_lowercase(),
    };

    terms.iter().try_fold(0, |score, term| {
        let hits = haystack.matches(term.as_str()).count();
        (hits > 0).then_some(score + hits)
    })
}
