//! Core data model shared between the engine and the daemon.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An incident ticket, owned by the external ticket collection.
/// Extra fields in tickets.json are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub title: String,
}

/// One structured log line. Built per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Date and time tokens rejoined with a single space,
    /// e.g. "2024-01-10 14:28:45".
    pub timestamp: String,
    /// Free-form severity token (ERROR, WARN, INFO, ...).
    pub level: String,
    /// Remainder of the line, internal whitespace preserved.
    pub message: String,
}

/// Qualitative severity attached to a detected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// A diagnostic finding produced by one triggered threshold rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    /// Display name of the affected component.
    pub component: String,
    /// Human-readable description embedding the value and threshold.
    pub issue: String,
    /// Metric field that triggered the rule.
    pub metric: String,
}

/// Per-ticket metric snapshot: component name -> metric name -> value.
/// Any component or metric may be absent.
pub type MetricSnapshot = HashMap<String, HashMap<String, f64>>;

/// A human-authored resolution record. Append-only; id and
/// resolved_at are assigned by the store, never by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    pub id: i64,
    pub ticket_id: String,
    pub root_cause: String,
    pub solution: String,
    pub prevention: String,
    pub resolved_by: String,
    pub resolved_at: DateTime<Utc>,
}

/// A resolution joined with its ticket title for the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KbEntry {
    #[serde(flatten)]
    pub resolution: Resolution,
    pub ticket_title: String,
}
