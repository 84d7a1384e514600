//! Resolution store
//!
//! SQLite-backed append-only log of incident resolutions. The store
//! owns record identity and timestamps; callers never supply them.
//! Storage faults are absorbed at this boundary: writes report a
//! boolean, reads report an empty list, and either case leaves an
//! operator-visible log line. Nothing here propagates to the request
//! path.

use crate::types::{KbEntry, Resolution, Ticket};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::error;

/// Title shown for resolutions whose ticket is no longer in the
/// ticket collection.
const UNKNOWN_TICKET_TITLE: &str = "Unknown Ticket";

/// Resolution store backed by SQLite.
///
/// One connection behind a mutex: every operation is a single
/// statement, so the engine's own isolation is all the concurrency
/// control needed.
pub struct ResolutionStore {
    conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
}

impl ResolutionStore {
    /// Open or create the store at a specific path.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {:?}", path))?;

        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: path.to_path_buf(),
        };

        store.init_schema()?;
        Ok(store)
    }

    /// Create the schema if absent. The table never changes shape, so
    /// this is the only migration.
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS resolutions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticket_id TEXT NOT NULL,
                root_cause TEXT NOT NULL,
                solution TEXT NOT NULL,
                prevention TEXT,
                resolved_by TEXT,
                resolved_at TEXT NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_resolutions_ticket ON resolutions(ticket_id)",
            [],
        )?;

        Ok(())
    }

    /// Persist a resolution for a ticket. The store assigns the id and
    /// stamps `resolved_at` with its own clock.
    ///
    /// Field validation is the caller's responsibility; whatever is
    /// given is persisted. Returns false on a storage fault, with the
    /// fault logged.
    pub fn save(
        &self,
        ticket_id: &str,
        root_cause: &str,
        solution: &str,
        prevention: &str,
        resolved_by: &str,
    ) -> bool {
        match self.try_save(ticket_id, root_cause, solution, prevention, resolved_by) {
            Ok(_) => true,
            Err(e) => {
                error!("Failed to save resolution for {}: {:#}", ticket_id, e);
                false
            }
        }
    }

    fn try_save(
        &self,
        ticket_id: &str,
        root_cause: &str,
        solution: &str,
        prevention: &str,
        resolved_by: &str,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            r#"
            INSERT INTO resolutions (ticket_id, root_cause, solution, prevention, resolved_by, resolved_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                ticket_id,
                root_cause,
                solution,
                prevention,
                resolved_by,
                Utc::now().to_rfc3339()
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// All resolutions for one ticket, most recent first. A storage
    /// fault yields an empty list, logged.
    pub fn list_by_ticket(&self, ticket_id: &str) -> Vec<Resolution> {
        match self.try_list(Some(ticket_id)) {
            Ok(rows) => rows,
            Err(e) => {
                error!("Failed to load resolutions for {}: {:#}", ticket_id, e);
                Vec::new()
            }
        }
    }

    /// All resolutions across every ticket, most recent first. A
    /// storage fault yields an empty list, logged.
    pub fn list_all(&self) -> Vec<Resolution> {
        match self.try_list(None) {
            Ok(rows) => rows,
            Err(e) => {
                error!("Failed to load resolutions: {:#}", e);
                Vec::new()
            }
        }
    }

    fn try_list(&self, ticket_id: Option<&str>) -> Result<Vec<Resolution>> {
        let conn = self.conn.lock().unwrap();

        let sql_all = r#"
            SELECT id, ticket_id, root_cause, solution, prevention, resolved_by, resolved_at
            FROM resolutions
            ORDER BY resolved_at DESC, id DESC
            "#;
        let sql_ticket = r#"
            SELECT id, ticket_id, root_cause, solution, prevention, resolved_by, resolved_at
            FROM resolutions
            WHERE ticket_id = ?
            ORDER BY resolved_at DESC, id DESC
            "#;

        let mut resolutions = Vec::new();
        match ticket_id {
            Some(id) => {
                let mut stmt = conn.prepare(sql_ticket)?;
                let rows = stmt.query_map(params![id], row_to_resolution)?;
                for row in rows {
                    resolutions.push(row?);
                }
            }
            None => {
                let mut stmt = conn.prepare(sql_all)?;
                let rows = stmt.query_map([], row_to_resolution)?;
                for row in rows {
                    resolutions.push(row?);
                }
            }
        }
        Ok(resolutions)
    }

    /// Knowledge-base search: every resolution joined with its ticket
    /// title, optionally filtered by a case-insensitive substring
    /// query over root cause, solution, prevention and title.
    ///
    /// An empty (after trim) query passes everything. Filtering never
    /// reorders; the `list_all` ordering is preserved.
    pub fn search(&self, query: &str, tickets: &[Ticket]) -> Vec<KbEntry> {
        let needle = query.trim().to_lowercase();

        self.list_all()
            .into_iter()
            .map(|resolution| {
                let ticket_title = tickets
                    .iter()
                    .find(|t| t.id == resolution.ticket_id)
                    .map(|t| t.title.clone())
                    .unwrap_or_else(|| UNKNOWN_TICKET_TITLE.to_string());
                KbEntry {
                    resolution,
                    ticket_title,
                }
            })
            .filter(|entry| {
                if needle.is_empty() {
                    return true;
                }
                let haystack = format!(
                    "{} {} {} {}",
                    entry.resolution.root_cause.to_lowercase(),
                    entry.resolution.solution.to_lowercase(),
                    entry.resolution.prevention.to_lowercase(),
                    entry.ticket_title.to_lowercase()
                );
                haystack.contains(&needle)
            })
            .collect()
    }

    /// Database path backing this store.
    pub fn path(&self) -> &Path {
        &self.db_path
    }
}

fn row_to_resolution(row: &rusqlite::Row<'_>) -> rusqlite::Result<Resolution> {
    Ok(Resolution {
        id: row.get(0)?,
        ticket_id: row.get(1)?,
        root_cause: row.get(2)?,
        solution: row.get(3)?,
        prevention: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        resolved_by: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        resolved_at: DateTime::parse_from_rfc3339(&row.get::<_, String>(6)?)
            .unwrap_or_else(|_| Utc::now().into())
            .with_timezone(&Utc),
    })
}
