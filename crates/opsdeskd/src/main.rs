//! Opsdesk Daemon - incident triage and knowledge base API
//!
//! Serves structured log evidence, metric threshold findings, and the
//! searchable resolution knowledge base over a local HTTP API.

use anyhow::Result;
use opsdesk_common::{DataDir, ResolutionStore};
use opsdeskd::{config::OpsdeskConfig, server};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Opsdesk Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = OpsdeskConfig::load()?;
    info!("Data directory: {:?}", config.data_dir);

    // Schema is created on open if absent
    let store = ResolutionStore::open(&config.db_path)?;
    info!("Resolution store ready at {:?}", store.path());

    let data = DataDir::new(&config.data_dir);
    let state = server::AppState::new(store, data);

    server::run(state, &config.listen_addr).await
}
