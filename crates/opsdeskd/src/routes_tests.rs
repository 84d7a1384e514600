//! Route-level tests driving the full router without a socket.

use crate::routes::{KnowledgeBaseResponse, TicketDetailResponse};
use crate::server::{self, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use opsdesk_common::{DataDir, ResolutionStore};
use std::sync::Arc;
use tower::ServiceExt;

const TICKETS_JSON: &str = r#"[
    {"id": "ticket_001", "title": "Login failures after deploy"},
    {"id": "ticket_002", "title": "Dashboard timeouts"}
]"#;

const LOGS: &str = "\
2024-01-10 14:28:45 INFO [Auth] Service started
2024-01-10 14:29:02 ERROR [Auth] Login failed for user 42
not a log line
2024-01-10 14:30:00 WARN [Auth] Retry storm detected";

const METRICS_JSON: &str = r#"{
    "authentication_service": {"error_rate_percent": 12.0, "avg_response_time_ms": 120.0},
    "redis_connection": {"timeout_count": 2, "avg_response_time_ms": 40.0}
}"#;

fn fixture() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tickets.json"), TICKETS_JSON).unwrap();
    std::fs::create_dir_all(dir.path().join("ticket_001")).unwrap();
    std::fs::write(dir.path().join("ticket_001/logs.txt"), LOGS).unwrap();
    std::fs::write(dir.path().join("ticket_001/metrics.json"), METRICS_JSON).unwrap();

    let store = ResolutionStore::open(&dir.path().join("resolutions.db")).unwrap();
    let data = DataDir::new(dir.path());
    let app = server::app(Arc::new(AppState::new(store, data)));
    (app, dir)
}

async fn get_json<T: serde::de::DeserializeOwned>(app: &Router, uri: &str) -> (StatusCode, Option<T>) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).ok())
}

async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> StatusCode {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    response.status()
}

#[tokio::test]
async fn test_ticket_detail_composes_triage_view() {
    let (app, _dir) = fixture();
    let (status, detail) = get_json::<TicketDetailResponse>(&app, "/v1/tickets/ticket_001").await;
    let detail = detail.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail.ticket.title, "Login failures after deploy");
    // malformed line dropped
    assert_eq!(detail.logs.len(), 3);
    assert!(detail.current_filter.is_none());
    assert_eq!(detail.available_levels, vec!["INFO", "ERROR", "WARN"]);
    // auth error rate (high), redis timeouts (critical); slow-response
    // rules stay quiet
    assert_eq!(detail.issues.len(), 2);
    assert_eq!(detail.issues[0].metric, "error_rate_percent");
    assert_eq!(detail.issues[1].metric, "timeout_count");
    assert!(detail.resolutions.is_empty());
}

#[tokio::test]
async fn test_ticket_detail_level_filter() {
    let (app, _dir) = fixture();
    let (_, detail) =
        get_json::<TicketDetailResponse>(&app, "/v1/tickets/ticket_001?level=ERROR").await;
    let detail = detail.unwrap();

    assert_eq!(detail.current_filter.as_deref(), Some("ERROR"));
    assert_eq!(detail.logs.len(), 1);
    assert_eq!(detail.logs[0].level, "ERROR");
    // unfiltered levels still offered
    assert_eq!(detail.available_levels.len(), 3);
}

#[tokio::test]
async fn test_unknown_ticket_is_404() {
    let (app, _dir) = fixture();
    let (status, _) = get_json::<TicketDetailResponse>(&app, "/v1/tickets/ticket_404").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ticket_without_sources_yields_empty_sections() {
    let (app, _dir) = fixture();
    // ticket_002 exists in the collection but has no logs or metrics
    let (status, detail) = get_json::<TicketDetailResponse>(&app, "/v1/tickets/ticket_002").await;
    let detail = detail.unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(detail.logs.is_empty());
    assert!(detail.metrics.is_empty());
    assert!(detail.issues.is_empty());
}

#[tokio::test]
async fn test_submit_resolution_then_listed() {
    let (app, _dir) = fixture();
    let status = post_json(
        &app,
        "/v1/tickets/ticket_001/resolutions",
        serde_json::json!({
            "root_cause": "Stale config pushed to auth pods",
            "solution": "Rolled back config map",
            "prevention": "Add config validation to CI",
            "resolved_by": "alice"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, detail) = get_json::<TicketDetailResponse>(&app, "/v1/tickets/ticket_001").await;
    let detail = detail.unwrap();
    assert_eq!(detail.resolutions.len(), 1);
    assert_eq!(detail.resolutions[0].resolved_by, "alice");
    assert!(detail.resolutions[0].id > 0);
}

#[tokio::test]
async fn test_blank_required_fields_rejected_as_422() {
    let (app, _dir) = fixture();
    let status = post_json(
        &app,
        "/v1/tickets/ticket_001/resolutions",
        serde_json::json!({
            "root_cause": "   ",
            "solution": "fix",
            "resolved_by": ""
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // nothing was persisted
    let (_, detail) = get_json::<TicketDetailResponse>(&app, "/v1/tickets/ticket_001").await;
    assert!(detail.unwrap().resolutions.is_empty());
}

#[tokio::test]
async fn test_submit_for_unknown_ticket_is_404() {
    let (app, _dir) = fixture();
    let status = post_json(
        &app,
        "/v1/tickets/ticket_404/resolutions",
        serde_json::json!({
            "root_cause": "c",
            "solution": "s",
            "resolved_by": "r"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_kb_search_filters_and_counts() {
    let (app, _dir) = fixture();
    for (ticket, cause) in [
        ("ticket_001", "Redis pool exhausted"),
        ("ticket_002", "Slow dashboard queries"),
    ] {
        let status = post_json(
            &app,
            &format!("/v1/tickets/{}/resolutions", ticket),
            serde_json::json!({
                "root_cause": cause,
                "solution": "fixed",
                "resolved_by": "bob"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, kb) = get_json::<KnowledgeBaseResponse>(&app, "/v1/kb").await;
    let kb = kb.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kb.total_count, 2);
    // most recent first, joined with titles
    assert_eq!(kb.resolutions[0].ticket_title, "Dashboard timeouts");

    let (_, kb) = get_json::<KnowledgeBaseResponse>(&app, "/v1/kb?q=REDIS").await;
    let kb = kb.unwrap();
    assert_eq!(kb.total_count, 1);
    assert_eq!(kb.search_query, "redis");
    assert_eq!(kb.resolutions[0].resolution.ticket_id, "ticket_001");

    // title text matches too
    let (_, kb) = get_json::<KnowledgeBaseResponse>(&app, "/v1/kb?q=timeouts").await;
    assert_eq!(kb.unwrap().total_count, 1);
}

#[tokio::test]
async fn test_health_reports_version() {
    let (app, _dir) = fixture();
    let (status, health) =
        get_json::<crate::routes::HealthResponse>(&app, "/v1/health").await;
    let health = health.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}
