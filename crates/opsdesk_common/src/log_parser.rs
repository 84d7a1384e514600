//! Log line parser with optional severity filtering.
//!
//! Source format, one record per line:
//! "2024-01-10 14:28:45 INFO [Service] Message text"
//!
//! Lines that do not yield at least four whitespace-delimited tokens
//! are skipped silently; tolerance of malformed lines is part of the
//! contract, not an error path.

use crate::sources::DataDir;
use crate::types::LogEntry;

/// Split off the next whitespace-delimited token, returning it and the
/// unconsumed remainder.
fn next_token(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    match s.find(char::is_whitespace) {
        Some(i) => Some((&s[..i], &s[i..])),
        None => Some((s, "")),
    }
}

/// Parse a single trimmed log line into an entry.
///
/// Greedy 4-way split: date, time, level, then everything else as the
/// message (internal whitespace preserved). Fewer than four tokens
/// means the line is malformed and yields None.
fn parse_line(line: &str) -> Option<LogEntry> {
    let (date, rest) = next_token(line)?;
    let (time, rest) = next_token(rest)?;
    let (level, rest) = next_token(rest)?;
    let message = rest.trim_start();
    if message.is_empty() {
        return None;
    }

    Some(LogEntry {
        timestamp: format!("{} {}", date, time),
        level: level.to_string(),
        message: message.to_string(),
    })
}

/// Parse raw log text into structured entries, in input order.
///
/// `level_filter`, when non-empty, keeps only entries whose level
/// matches exactly (case-sensitive).
pub fn parse_log_text(raw: &str, level_filter: Option<&str>) -> Vec<LogEntry> {
    let filter = level_filter.filter(|f| !f.is_empty());

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_line)
        .filter(|entry| match filter {
            Some(level) => entry.level == level,
            None => true,
        })
        .collect()
}

/// Load and parse the logs for a ticket.
///
/// A missing log source is a valid "no logs yet" state and yields an
/// empty list; so does a read fault, after a logged warning. This
/// never raises to the caller.
pub fn load_logs(data: &DataDir, ticket_id: &str, level_filter: Option<&str>) -> Vec<LogEntry> {
    match data.read_log_text(ticket_id) {
        Some(raw) => parse_log_text(&raw, level_filter),
        None => {
            // read_log_text already warned if this was a fault rather
            // than a missing file
            Vec::new()
        }
    }
}

/// Distinct severity levels present in a set of entries, in first-seen
/// order. Used by the daemon to offer filter choices.
pub fn distinct_levels(entries: &[LogEntry]) -> Vec<String> {
    let mut levels: Vec<String> = Vec::new();
    for entry in entries {
        if !levels.iter().any(|l| l == &entry.level) {
            levels.push(entry.level.clone());
        }
    }
    levels
}
