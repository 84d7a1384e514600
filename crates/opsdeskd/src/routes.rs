//! API routes for opsdeskd
//!
//! Ticket routes compose the triage view: parsed logs, threshold
//! findings, and stored resolutions for one ticket. The knowledge-base
//! route searches resolutions across all tickets.

use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use opsdesk_common::{
    log_parser, metrics, Issue, KbEntry, LogEntry, MetricSnapshot, Resolution, Ticket,
    ValidationFailure,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

type AppStateArc = Arc<AppState>;

// ============================================================================
// Ticket Routes
// ============================================================================

pub fn ticket_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/tickets", get(list_tickets))
        .route("/v1/tickets/:ticket_id", get(ticket_detail))
        .route("/v1/tickets/:ticket_id/resolutions", post(submit_resolution))
}

async fn list_tickets(State(state): State<AppStateArc>) -> Json<Vec<Ticket>> {
    Json(state.data.tickets())
}

/// Query string for the detail view: optional severity filter.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketDetailQuery {
    pub level: Option<String>,
}

/// The composed triage payload for one ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketDetailResponse {
    pub ticket: Ticket,
    pub logs: Vec<LogEntry>,
    pub current_filter: Option<String>,
    /// Severity tokens seen in the unfiltered logs, for filter links.
    pub available_levels: Vec<String>,
    pub metrics: MetricSnapshot,
    pub issues: Vec<Issue>,
    pub resolutions: Vec<Resolution>,
}

async fn ticket_detail(
    State(state): State<AppStateArc>,
    Path(ticket_id): Path<String>,
    Query(query): Query<TicketDetailQuery>,
) -> Result<Json<TicketDetailResponse>, (StatusCode, String)> {
    let ticket = state.data.ticket(&ticket_id).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            format!("Ticket '{}' not found", ticket_id),
        )
    })?;

    let current_filter = query.level.filter(|l| !l.is_empty());

    // Logs and metrics are independent; either may be empty without
    // affecting the other.
    let logs = log_parser::load_logs(&state.data, &ticket_id, current_filter.as_deref());
    let available_levels =
        log_parser::distinct_levels(&log_parser::load_logs(&state.data, &ticket_id, None));
    let snapshot = state.data.metrics(&ticket_id);
    let issues = metrics::analyze(&snapshot);
    let resolutions = state.store.list_by_ticket(&ticket_id);

    Ok(Json(TicketDetailResponse {
        ticket,
        logs,
        current_filter,
        available_levels,
        metrics: snapshot,
        issues,
        resolutions,
    }))
}

/// Resolution submission body. `prevention` is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResolutionRequest {
    pub root_cause: String,
    pub solution: String,
    #[serde(default)]
    pub prevention: String,
    pub resolved_by: String,
}

async fn submit_resolution(
    State(state): State<AppStateArc>,
    Path(ticket_id): Path<String>,
    Json(req): Json<SubmitResolutionRequest>,
) -> Result<(StatusCode, Json<Vec<Resolution>>), (StatusCode, String)> {
    if state.data.ticket(&ticket_id).is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            format!("Ticket '{}' not found", ticket_id),
        ));
    }

    // Blank required fields are an explicit failure, not a silent drop
    ValidationFailure::check(&req.root_cause, &req.solution, &req.resolved_by)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    let saved = state.store.save(
        &ticket_id,
        req.root_cause.trim(),
        req.solution.trim(),
        req.prevention.trim(),
        req.resolved_by.trim(),
    );
    if !saved {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save resolution".to_string(),
        ));
    }

    info!("Resolution recorded for {}", ticket_id);
    Ok((StatusCode::CREATED, Json(state.store.list_by_ticket(&ticket_id))))
}

// ============================================================================
// Knowledge Base Routes
// ============================================================================

pub fn kb_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/kb", get(knowledge_base))
}

#[derive(Debug, Clone, Deserialize)]
pub struct KbQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseResponse {
    pub resolutions: Vec<KbEntry>,
    pub search_query: String,
    pub total_count: usize,
}

async fn knowledge_base(
    State(state): State<AppStateArc>,
    Query(query): Query<KbQuery>,
) -> Json<KnowledgeBaseResponse> {
    let search_query = query.q.unwrap_or_default().trim().to_lowercase();
    let resolutions = state.store.search(&search_query, &state.data.tickets());

    Json(KnowledgeBaseResponse {
        total_count: resolutions.len(),
        resolutions,
        search_query,
    })
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
