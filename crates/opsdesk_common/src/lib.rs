//! Opsdesk Common - Shared types and engine logic for the opsdesk daemon.
//!
//! Contains the diagnostics core: log parsing, metric threshold
//! analysis, and the SQLite-backed resolution knowledge base.

pub mod error;
pub mod log_parser;
pub mod metrics;
pub mod resolution_store;
pub mod sources;
pub mod types;

pub use error::ValidationFailure;
pub use resolution_store::ResolutionStore;
pub use sources::DataDir;
pub use types::*;
