//! Read-through accessors for the on-disk incident data.
//!
//! Layout under the data root:
//! - tickets.json                 ticket collection
//! - <ticket_id>/logs.txt         raw per-ticket log text
//! - <ticket_id>/metrics.json     per-ticket metric snapshot
//!
//! Every accessor re-reads its file; there is no cache, so results
//! are never stale. Missing files are a valid empty state, malformed
//! files degrade to empty with a logged warning. Nothing here raises
//! to the request path.

use crate::types::{MetricSnapshot, Ticket};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Accessor over the data root directory. Cheap to clone; holds only
/// the path.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load the ticket collection. Missing or malformed tickets.json
    /// degrades to an empty list with a warning.
    pub fn tickets(&self) -> Vec<Ticket> {
        let path = self.root.join("tickets.json");
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Ticket collection not found: {:?}", path);
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to read ticket collection {:?}: {}", path, e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(tickets) => tickets,
            Err(e) => {
                warn!("Invalid JSON in {:?}: {}", path, e);
                Vec::new()
            }
        }
    }

    /// Look up one ticket by id.
    pub fn ticket(&self, ticket_id: &str) -> Option<Ticket> {
        self.tickets().into_iter().find(|t| t.id == ticket_id)
    }

    /// Raw log text for a ticket. None when the file does not exist
    /// (a valid "no logs yet" state) or cannot be read (warned).
    pub fn read_log_text(&self, ticket_id: &str) -> Option<String> {
        let path = self.root.join(ticket_id).join("logs.txt");
        match std::fs::read_to_string(&path) {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read logs for {}: {}", ticket_id, e);
                None
            }
        }
    }

    /// Metric snapshot for a ticket. Missing file means no data;
    /// malformed JSON degrades to an empty snapshot with a warning.
    pub fn metrics(&self, ticket_id: &str) -> MetricSnapshot {
        let path = self.root.join(ticket_id).join("metrics.json");
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return MetricSnapshot::new(),
            Err(e) => {
                warn!("Failed to read metrics for {}: {}", ticket_id, e);
                return MetricSnapshot::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Invalid JSON in {:?}: {}", path, e);
                MetricSnapshot::new()
            }
        }
    }
}
