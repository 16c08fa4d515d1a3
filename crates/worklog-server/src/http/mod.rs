//! HTTP server for the worklog service.
//!
//! Provides endpoints for:
//! - Log CRUD (`/log`, `/log/:log_id`)
//! - Listing and bulk delete (`/logs`)
//! - Reports (`/status-summary`, `/type-summary`, `/daily-task-count`,
//!   `/completed-task-count`, `/task-summary`)
//! - Liveness (`/ping`, `/health`)
//! - Prometheus metrics (`/metrics`)

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

pub mod error;
mod handlers;
pub mod responses;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    Router::new()
        // Log routes
        .route("/log", post(handlers::create_log).put(handlers::update_log))
        .route(
            "/log/:log_id",
            get(handlers::get_log).delete(handlers::delete_log),
        )
        .route(
            "/logs",
            get(handlers::list_logs).delete(handlers::delete_logs),
        )
        // Report routes
        .route("/status-summary", get(handlers::status_summary))
        .route("/type-summary", get(handlers::type_summary))
        .route("/daily-task-count", get(handlers::daily_task_count))
        .route("/completed-task-count", get(handlers::completed_task_count))
        .route("/task-summary", get(handlers::task_summary))
        // Observability routes
        .route("/ping", get(handlers::ping))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS restricted to the configured origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use worklog_core::api::{LogEnvelope, LogListResponse};

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn create(router: &Router, name: &str, status: &str) -> LogEnvelope {
        let (code, body) = send(
            router,
            json_request(
                Method::POST,
                "/log",
                json!({ "taskName": name, "taskType": "task", "taskStatus": status }),
            ),
        )
        .await;
        assert_eq!(code, StatusCode::CREATED);
        serde_json::from_value(body).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let router = create_router(AppState::new());
        let response = router.oneshot(get_request("/ping")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"pong");
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let router = create_router(AppState::new());
        let created = create(&router, "Draft RFC", "backlog").await;

        let uri = format!("/log/{}", created.log.log_id);
        let (code, body) = send(&router, get_request(&uri)).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["message"], "Ok");
        assert_eq!(body["log"]["taskName"], "Draft RFC");
        assert_eq!(body["log"]["priority"], 1);
        assert!(body["log"].get("notes").is_none());
    }

    #[tokio::test]
    async fn test_create_validation_errors() {
        let router = create_router(AppState::new());

        let (code, body) = send(
            &router,
            json_request(
                Method::POST,
                "/log",
                json!({ "taskName": "x", "taskType": "task", "taskStatus": "backlog", "priority": 3 }),
            ),
        )
        .await;
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Invalid priority value: 3");

        let (code, _) = send(
            &router,
            json_request(
                Method::POST,
                "/log",
                json!({ "taskName": "", "taskType": "task", "taskStatus": "backlog" }),
            ),
        )
        .await;
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);

        create(&router, "Only once", "backlog").await;
        let (code, _) = send(
            &router,
            json_request(
                Method::POST,
                "/log",
                json!({ "taskName": "Only once", "taskType": "bug", "taskStatus": "pending" }),
            ),
        )
        .await;
        assert_eq!(code, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let router = create_router(AppState::new());
        let req = Request::builder()
            .method(Method::POST)
            .uri("/log")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (code, body) = send(&router, req).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_update_flow() {
        let router = create_router(AppState::new());
        let created = create(&router, "Migrate CI", "pending").await;

        let (code, body) = send(
            &router,
            json_request(
                Method::PUT,
                "/log",
                json!({ "logId": created.log.log_id, "taskStatus": "pr", "notes": "almost" }),
            ),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["message"], "Log updated successfully");
        assert_eq!(body["log"]["taskStatus"], "pr");
        assert_eq!(body["log"]["notes"], "almost");

        let (code, _) = send(
            &router,
            json_request(Method::PUT, "/log", json!({ "logId": "nope", "taskStatus": "pr" })),
        )
        .await;
        assert_eq!(code, StatusCode::NOT_FOUND);

        let (code, _) = send(
            &router,
            json_request(Method::PUT, "/log", json!({ "logId": created.log.log_id })),
        )
        .await;
        assert_eq!(code, StatusCode::BAD_REQUEST);

        let (code, body) = send(
            &router,
            json_request(
                Method::PUT,
                "/log",
                json!({ "logId": created.log.log_id, "priority": 3 }),
            ),
        )
        .await;
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["message"], "Invalid priority value: 3");

        let (code, _) = send(
            &router,
            json_request(Method::PUT, "/log", json!({ "taskStatus": "pr" })),
        )
        .await;
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let router = create_router(AppState::new());
        for i in 0..5 {
            create(&router, &format!("task {i}"), "backlog").await;
        }

        let (code, body) = send(&router, get_request("/logs?limit=2&page=0")).await;
        assert_eq!(code, StatusCode::OK);
        let listing: LogListResponse = serde_json::from_value(body).unwrap();
        assert_eq!(listing.logs.len(), 2);
        assert_eq!(listing.total_pages(), 3);

        let (_, body) = send(&router, get_request("/logs?limit=2&page=2")).await;
        assert_eq!(body["logs"].as_array().unwrap().len(), 1);

        let (code, _) = send(&router, get_request("/logs?limit=abc")).await;
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);

        let (code, _) = send(&router, get_request("/logs?sortBy=password")).await;
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let router = create_router(AppState::new());
        let (code, body) = send(&router, get_request("/logs")).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body, json!({ "logs": [] }));
    }

    #[tokio::test]
    async fn test_delete_routes() {
        let router = create_router(AppState::new());
        let a = create(&router, "a", "backlog").await;
        let b = create(&router, "b", "backlog").await;
        let c = create(&router, "c", "backlog").await;

        let uri = format!("/log/{}", a.log.log_id);
        let delete = |uri: &str| {
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        };
        let (code, _) = send(&router, delete(&uri)).await;
        assert_eq!(code, StatusCode::OK);
        let (code, _) = send(&router, delete(&uri)).await;
        assert_eq!(code, StatusCode::NOT_FOUND);

        // logIds=["<b>","<c>"], percent-encoded
        let uri = format!(
            "/logs?logIds=%5B%22{}%22%2C%22{}%22%5D",
            b.log.log_id, c.log.log_id
        );
        let (code, body) = send(&router, delete(&uri)).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["rowCount"], 2);

        let (code, _) = send(&router, delete("/logs")).await;
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
        let (code, _) = send(&router, delete("/logs?logIds=a,b")).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_summary_routes() {
        let router = create_router(AppState::new());
        for i in 0..4 {
            create(&router, &format!("backlog {i}"), "backlog").await;
        }
        for i in 0..6 {
            create(&router, &format!("progress {i}"), "progress").await;
        }

        let (code, body) = send(&router, get_request("/status-summary")).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "statusSummary": [
                { "taskStatus": "backlog", "statusCount": 4, "percentage": 40.0 },
                { "taskStatus": "progress", "statusCount": 6, "percentage": 60.0 },
            ]})
        );

        let (_, body) = send(&router, get_request("/type-summary")).await;
        assert_eq!(
            body,
            json!({ "typeSummary": [
                { "taskType": "task", "statusCount": 10, "percentage": 100.0 },
            ]})
        );

        let (_, body) = send(&router, get_request("/task-summary")).await;
        assert_eq!(body["totalTasks"], 10);
        assert_eq!(body["totalProgressTasks"], 6);

        let (_, body) = send(&router, get_request("/daily-task-count")).await;
        assert_eq!(body["dailyTasks"][0]["taskCount"], 10);

        let (code, body) = send(&router, get_request("/completed-task-count?v=month&d=2%20months")).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["message"], "ok");
        assert_eq!(body["completedCount"].as_array().unwrap().len(), 3);

        let (code, _) = send(&router, get_request("/completed-task-count?v=day")).await;
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_completed_count_rejects_oversized_lookback() {
        let router = create_router(AppState::new());
        create(&router, "something", "staging").await;

        for uri in [
            "/completed-task-count?v=week&d=4294967295%20days",
            "/completed-task-count?v=week&d=999999%20years",
            "/completed-task-count?v=month&d=100000%20years",
        ] {
            let (code, body) = send(&router, get_request(uri)).await;
            assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
            assert!(body["message"].as_str().unwrap().starts_with("Invalid duration"));
        }

        let (code, _) = send(&router, get_request("/completed-task-count?d=100%20years")).await;
        assert_eq!(code, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_inverted_timestamps_are_unprocessable() {
        let router = create_router(AppState::new());

        let (code, body) = send(
            &router,
            json_request(
                Method::POST,
                "/log",
                json!({
                    "taskName": "Backwards",
                    "taskType": "task",
                    "taskStatus": "staging",
                    "startedAt": "2025-03-10T09:00:00Z",
                    "completedAt": "2025-03-09T09:00:00Z",
                }),
            ),
        )
        .await;
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["message"].as_str().unwrap().contains("precedes"));

        let created = create(&router, "Forwards", "progress").await;
        let (code, _) = send(
            &router,
            json_request(
                Method::PUT,
                "/log",
                json!({
                    "logId": created.log.log_id,
                    "startedAt": "2025-03-10T09:00:00Z",
                    "completedAt": "2025-03-09T09:00:00Z",
                }),
            ),
        )
        .await;
        assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin_only() {
        let router = create_router(AppState::new());

        let req = Request::builder()
            .uri("/ping")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(req).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );

        let req = Request::builder()
            .uri("/ping")
            .header(header::ORIGIN, "http://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(req).await.unwrap();
        assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
