//! HTTP query parameter types.
//!
//! Response bodies live in `worklog_core::api` so the client can share them.

use serde::Deserialize;

use worklog_core::{CompletionView, LogId, LogQuery, Lookback, SortField, SortOrder};

use crate::http::error::ApiError;

// ============================================================================
// Listing
// ============================================================================

/// Query string of `GET /logs`. Values stay raw so each one can be
/// reported on its own.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLogsParams {
    /// Search text.
    pub s: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<String>,
    pub page: Option<String>,
}

impl ListLogsParams {
    /// Build a query, falling back to defaults for absent or empty values.
    pub fn into_query(self) -> Result<LogQuery, ApiError> {
        let mut query = LogQuery::default();

        if let Some(s) = present(self.s) {
            query.search = Some(s);
        }
        if let Some(sort_by) = present(self.sort_by) {
            query.sort_by = sort_by.parse::<SortField>()?;
        }
        if let Some(order) = present(self.sort_order) {
            query.sort_order = order.parse::<SortOrder>()?;
        }
        if let Some(limit) = present(self.limit) {
            query.limit = limit
                .trim()
                .parse()
                .map_err(|_| ApiError::Unprocessable("Invalid limit value".to_string()))?;
        }
        if let Some(page) = present(self.page) {
            query.page = page
                .trim()
                .parse()
                .map_err(|_| ApiError::Unprocessable("Invalid page value".to_string()))?;
        }

        Ok(query)
    }
}

// ============================================================================
// Bulk delete
// ============================================================================

/// Query string of `DELETE /logs`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteLogsParams {
    /// JSON array of ids, e.g. `["a","b"]`.
    pub log_ids: Option<String>,
}

impl DeleteLogsParams {
    pub fn into_ids(self) -> Result<Vec<LogId>, ApiError> {
        let raw = present(self.log_ids)
            .ok_or_else(|| ApiError::Unprocessable("At least 1 log id is required.".to_string()))?;
        let ids: Vec<String> = serde_json::from_str(&raw)
            .map_err(|_| ApiError::BadRequest("Invalid logIds format".to_string()))?;
        if ids.is_empty() {
            return Err(ApiError::Unprocessable(
                "At least 1 log id is required.".to_string(),
            ));
        }
        Ok(ids.into_iter().map(LogId::from).collect())
    }
}

// ============================================================================
// Completed counts
// ============================================================================

/// Query string of `GET /completed-task-count`.
#[derive(Debug, Default, Deserialize)]
pub struct CompletedCountParams {
    /// View: `week` or `month`.
    pub v: Option<String>,
    /// Lookback, e.g. `3 months`.
    pub d: Option<String>,
}

impl CompletedCountParams {
    pub fn parse(self) -> Result<(CompletionView, Lookback), ApiError> {
        let view = match present(self.v) {
            Some(v) => v.parse::<CompletionView>()?,
            None => CompletionView::default(),
        };
        let lookback = match present(self.d) {
            Some(d) => d.parse::<Lookback>()?,
            None => Lookback::default(),
        };
        Ok((view, lookback))
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use worklog_core::LookbackUnit;

    #[test]
    fn test_list_params_defaults() {
        let query = ListLogsParams::default().into_query().unwrap();
        assert_eq!(query, LogQuery::default());
    }

    #[test]
    fn test_list_params_parse() {
        let params = ListLogsParams {
            s: Some("login".into()),
            sort_by: Some("task_name".into()),
            sort_order: Some("asc".into()),
            limit: Some("25".into()),
            page: Some("2".into()),
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.search.as_deref(), Some("login"));
        assert_eq!(query.sort_by, SortField::TaskName);
        assert_eq!(query.sort_order, SortOrder::Asc);
        assert_eq!((query.limit, query.page), (25, 2));
    }

    #[test]
    fn test_list_params_reject_garbage() {
        let params = ListLogsParams {
            limit: Some("ten".into()),
            ..Default::default()
        };
        assert!(matches!(params.into_query(), Err(ApiError::Unprocessable(_))));

        let params = ListLogsParams {
            sort_by: Some("ts".into()),
            ..Default::default()
        };
        assert!(matches!(params.into_query(), Err(ApiError::Core(_))));
    }

    #[test]
    fn test_delete_params() {
        let ids = DeleteLogsParams {
            log_ids: Some(r#"["a","b"]"#.into()),
        }
        .into_ids()
        .unwrap();
        assert_eq!(ids, vec![LogId::new("a"), LogId::new("b")]);

        assert!(matches!(
            DeleteLogsParams::default().into_ids(),
            Err(ApiError::Unprocessable(_))
        ));
        assert!(matches!(
            DeleteLogsParams {
                log_ids: Some("a,b".into())
            }
            .into_ids(),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_completed_params() {
        let (view, lookback) = CompletedCountParams::default().parse().unwrap();
        assert_eq!(view, CompletionView::Week);
        assert_eq!(lookback, Lookback::new(1, LookbackUnit::Month));

        let (view, lookback) = CompletedCountParams {
            v: Some("month".into()),
            d: Some("6 months".into()),
        }
        .parse()
        .unwrap();
        assert_eq!(view, CompletionView::Month);
        assert_eq!(lookback.amount, 6);
    }
}
