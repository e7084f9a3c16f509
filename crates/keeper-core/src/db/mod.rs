//! SQLite persistence for the registry.
//!
//! Runtime defaults are intentionally conservative:
//! - `journal_mode = WAL` to allow concurrent readers while a writer runs
//! - `busy_timeout = 5s` to reduce transient lock failures under contention
//! - `synchronous = NORMAL`, safe in WAL mode
//!
//! Persistence is a full resync: [`ListStore::patch`] upserts every item
//! keyed by id inside one transaction, no per-field diffing. Timestamps
//! are stored as RFC 3339 text and must carry a timezone offset; a naive
//! value in the database fails loudly on load instead of being guessed at.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Connection, params};
use std::{path::Path, str::FromStr, time::Duration};

use crate::error::StoreError;
use crate::model::{Item, ItemId, Priority, Project, ProjectKind};
use crate::registry::Registry;

/// Busy timeout used for store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS items (
        id            BLOB PRIMARY KEY,
        description   TEXT NOT NULL,
        project_name  TEXT NOT NULL,
        project_kind  INTEGER NOT NULL,
        priority      TEXT,
        created_at    TEXT NOT NULL,
        completed_at  TEXT,
        archived_at   TEXT,
        recurring     INTEGER NOT NULL
    )
";

/// Handle on the on-disk item table.
pub struct ListStore {
    conn: Connection,
}

impl ListStore {
    /// Open (or create) the store at `path`, apply runtime pragmas, and
    /// ensure the schema exists.
    ///
    /// # Errors
    ///
    /// Returns an error if opening or configuring the database fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests.
    ///
    /// # Errors
    ///
    /// Returns an error if sqlite fails to initialize.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        let _journal_mode: String =
            conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
        conn.execute(SCHEMA, [])?;
        Ok(Self { conn })
    }

    /// Upsert every item in `reg`, keyed by id, in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails; nothing is written in
    /// that case.
    pub fn patch(&mut self, reg: &Registry) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO items (
                    id, description, project_name, project_kind,
                    priority, created_at, completed_at, archived_at, recurring
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT (id) DO UPDATE SET
                    description = excluded.description,
                    project_name = excluded.project_name,
                    project_kind = excluded.project_kind,
                    priority = excluded.priority,
                    created_at = excluded.created_at,
                    completed_at = excluded.completed_at,
                    archived_at = excluded.archived_at,
                    recurring = excluded.recurring",
            )?;
            for item in reg.iter() {
                stmt.execute(params![
                    item.id().as_bytes().as_slice(),
                    item.description(),
                    item.project().name(),
                    item.project().kind().code(),
                    item.priority().map(|p| p.letter().to_string()),
                    item.created_at().to_rfc3339(),
                    item.completed_at().map(|ts| ts.to_rfc3339()),
                    item.archived_at().map(|ts| ts.to_rfc3339()),
                    i64::from(item.recurring()),
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!(items = reg.len(), "patched registry to store");
        Ok(())
    }

    /// Reconstruct a registry from the stored rows.
    ///
    /// # Errors
    ///
    /// Returns an error on sqlite failure, on a corrupt row, or on a
    /// stored timestamp without timezone information.
    pub fn load(&self) -> Result<Registry, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, project_name, project_kind,
                    priority, created_at, completed_at, archived_at, recurring
             FROM items",
        )?;

        let mut reg = Registry::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let id_bytes: Vec<u8> = row.get(0)?;
            let id = decode_id(&id_bytes)?;
            let description: String = row.get(1)?;
            let project_name: String = row.get(2)?;
            let kind_code: i64 = row.get(3)?;
            let kind =
                ProjectKind::from_code(kind_code).ok_or_else(|| StoreError::CorruptRow {
                    column: "project_kind",
                    message: format!("unknown kind code {kind_code}"),
                })?;
            let priority: Option<String> = row.get(4)?;
            let priority = priority
                .map(|p| {
                    Priority::from_str(&p).map_err(|err| StoreError::CorruptRow {
                        column: "priority",
                        message: err.to_string(),
                    })
                })
                .transpose()?;
            let created_at = decode_timestamp("created_at", &row.get::<_, String>(5)?)?;
            let completed_at = row
                .get::<_, Option<String>>(6)?
                .map(|ts| decode_timestamp("completed_at", &ts))
                .transpose()?;
            let archived_at = row
                .get::<_, Option<String>>(7)?
                .map(|ts| decode_timestamp("archived_at", &ts))
                .transpose()?;
            let recurring: i64 = row.get(8)?;

            reg.add(Item::from_parts(
                id,
                description,
                priority,
                created_at,
                completed_at,
                archived_at,
                Project::new(project_name, kind),
                recurring != 0,
            ));
        }

        tracing::debug!(items = reg.len(), "loaded registry from store");
        Ok(reg)
    }

    /// Close the underlying connection.
    ///
    /// # Errors
    ///
    /// Returns the sqlite error if the connection fails to close cleanly.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_conn, err)| err.into())
    }
}

fn decode_id(bytes: &[u8]) -> Result<ItemId, StoreError> {
    let bytes: [u8; 16] = bytes.try_into().map_err(|_| StoreError::CorruptRow {
        column: "id",
        message: format!("expected 16 id bytes, got {}", bytes.len()),
    })?;
    Ok(ItemId::from_bytes(bytes))
}

/// Parse a stored RFC 3339 timestamp, rejecting naive values loudly.
fn decode_timestamp(column: &'static str, value: &str) -> Result<DateTime<Utc>, StoreError> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(_) => {
            // Distinguish "valid instant, missing offset" from garbage.
            if NaiveDateTime::from_str(value).is_ok() {
                Err(StoreError::NaiveTimestamp {
                    column,
                    value: value.to_string(),
                })
            } else {
                Err(StoreError::CorruptRow {
                    column,
                    message: format!("unparseable timestamp '{value}'"),
                })
            }
        }
    }
}
