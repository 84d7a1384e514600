//! HTTP server for opsdeskd

use crate::routes;
use anyhow::Result;
use axum::Router;
use opsdesk_common::{DataDir, ResolutionStore};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
///
/// The store is the only shared mutable resource; everything else is
/// re-read from disk per request.
pub struct AppState {
    pub store: ResolutionStore,
    pub data: DataDir,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: ResolutionStore, data: DataDir) -> Self {
        Self {
            store,
            data,
            start_time: Instant::now(),
        }
    }
}

/// Build the full router. Split out so tests can drive it without a
/// listening socket.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::ticket_routes())
        .merge(routes::kb_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server.
pub async fn run(state: AppState, listen_addr: &str) -> Result<()> {
    let state = Arc::new(state);
    let router = app(state);

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    info!("  Listening on http://{}", listen_addr);

    axum::serve(listener, router).await?;
    Ok(())
}
