//! HTTP client for the worklog REST endpoints.

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use worklog_core::api::{
    CompletedCountResponse, DailyTasksResponse, DeleteManyResponse, LogEnvelope, LogListResponse,
    MessageResponse, StatusSummaryResponse, TypeSummaryResponse,
};
use worklog_core::{
    CompletedTaskCount, CompletionView, DailyTaskCount, Log, LogId, LogQuery, LogUpdate,
    Lookback, NewLog, TaskStatusSummary, TaskSummary, TaskTypeSummary,
};

use crate::error::ClientError;

/// Client for the worklog service.
#[derive(Debug, Clone)]
pub struct WorklogClient {
    inner: reqwest::Client,
    base_url: String,
}

impl WorklogClient {
    /// Create a new client for the service at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /ping`, true when the service answers `pong`.
    pub async fn ping(&self) -> Result<bool, ClientError> {
        let response = self.request(Method::GET, "/ping").send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }
        Ok(response.text().await?.trim() == "pong")
    }

    /// Check if the service is healthy.
    pub async fn health(&self) -> Result<bool, ClientError> {
        let response = self.request(Method::GET, "/health").send().await?;
        Ok(response.status().is_success())
    }

    /// List logs. Returns the page of logs and the total page count.
    pub async fn list(&self, query: &LogQuery) -> Result<(Vec<Log>, u64), ClientError> {
        let mut params: Vec<(&str, String)> = vec![
            ("sortBy", query.sort_by.to_string()),
            ("sortOrder", query.sort_order.to_string()),
            ("limit", query.page_size().to_string()),
            ("page", query.page.to_string()),
        ];
        if let Some(search) = &query.search {
            params.push(("s", search.clone()));
        }

        let body: LogListResponse = self
            .execute(self.request(Method::GET, "/logs").query(&params))
            .await?;
        let total_pages = body.total_pages();
        Ok((body.logs.into_iter().map(|item| item.log).collect(), total_pages))
    }

    /// Fetch one log.
    pub async fn get(&self, log_id: &LogId) -> Result<Log, ClientError> {
        let path = format!("/log/{log_id}");
        let body: LogEnvelope = self.execute(self.request(Method::GET, &path)).await?;
        Ok(body.log)
    }

    /// Create a log.
    pub async fn create(&self, new_log: &NewLog) -> Result<Log, ClientError> {
        let body: LogEnvelope = self
            .execute(self.request(Method::POST, "/log").json(new_log))
            .await?;
        Ok(body.log)
    }

    /// Update a log.
    pub async fn update(&self, update: &LogUpdate) -> Result<Log, ClientError> {
        let body: LogEnvelope = self
            .execute(self.request(Method::PUT, "/log").json(update))
            .await?;
        Ok(body.log)
    }

    /// Delete one log.
    pub async fn delete(&self, log_id: &LogId) -> Result<(), ClientError> {
        let path = format!("/log/{log_id}");
        let _: MessageResponse = self.execute(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    /// Delete several logs, returning how many existed.
    pub async fn delete_many(&self, log_ids: &[LogId]) -> Result<u64, ClientError> {
        let ids = serde_json::to_string(log_ids)
            .map_err(|e| ClientError::Serialization(e.to_string()))?;
        let body: DeleteManyResponse = self
            .execute(
                self.request(Method::DELETE, "/logs")
                    .query(&[("logIds", ids)]),
            )
            .await?;
        Ok(body.row_count)
    }

    pub async fn status_summary(&self) -> Result<Vec<TaskStatusSummary>, ClientError> {
        let body: StatusSummaryResponse = self
            .execute(self.request(Method::GET, "/status-summary"))
            .await?;
        Ok(body.status_summary)
    }

    pub async fn type_summary(&self) -> Result<Vec<TaskTypeSummary>, ClientError> {
        let body: TypeSummaryResponse = self
            .execute(self.request(Method::GET, "/type-summary"))
            .await?;
        Ok(body.type_summary)
    }

    pub async fn daily_task_count(&self) -> Result<Vec<DailyTaskCount>, ClientError> {
        let body: DailyTasksResponse = self
            .execute(self.request(Method::GET, "/daily-task-count"))
            .await?;
        Ok(body.daily_tasks)
    }

    /// Completed logs per bucket over the lookback window.
    pub async fn completed_task_count(
        &self,
        view: CompletionView,
        lookback: Lookback,
    ) -> Result<Vec<CompletedTaskCount>, ClientError> {
        let params = [("v", view.to_string()), ("d", lookback.to_string())];
        let body: CompletedCountResponse = self
            .execute(
                self.request(Method::GET, "/completed-task-count")
                    .query(&params),
            )
            .await?;
        Ok(body.completed_count)
    }

    pub async fn task_summary(&self) -> Result<TaskSummary, ClientError> {
        self.execute(self.request(Method::GET, "/task-summary"))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Sending request");
        self.inner.request(method, url)
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Serialization(e.to_string()))
    }
}

/// Turn a non-success response into [`ClientError::Api`], using the
/// `message` field of the body when there is one.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<MessageResponse>(&text)
        .map(|m| m.message)
        .unwrap_or(text);
    debug!(status = status.as_u16(), message = %message, "Request failed");

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}
