use crate::error::{HushError, Result};
use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};

pub mod types;
pub use types::{DashboardSnapshot, NewSnapshot, SEED_SNAPSHOTS};

const SELECT_COLUMNS: &str = "SELECT id, timestamp, avg_text_importance, avg_typing_importance, avg_voice_importance
    FROM dashboard_data_point";

/// Append-only SQLite store of dashboard snapshots
///
/// Every operation opens its own connection and drops it before
/// returning, so a handle is scoped to a single call on every exit path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    db_path: PathBuf,
}

impl SnapshotStore {
    /// Create a store backed by the given database file
    ///
    /// Creates the parent directory when needed and ensures the schema
    /// exists. Calling this on an existing database is a no-op for the
    /// schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use hush::storage::SnapshotStore;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = SnapshotStore::new_with_path(dir.path().join("hush.db")).unwrap();
    /// assert_eq!(store.count().unwrap(), 0);
    /// ```
    pub fn new_with_path<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create parent directory for database")
                    .map_err(|e| HushError::Storage(e.to_string()))?;
            }
        }

        let store = Self { db_path };
        store.init()?;
        Ok(store)
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)
            .context("Failed to open database")
            .map_err(|e| HushError::Storage(e.to_string()))?;
        Ok(conn)
    }

    fn init(&self) -> Result<()> {
        let conn = self.open()?;

        tracing::debug!(db = %self.db_path.display(), "ensuring dashboard_data_point schema");
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS dashboard_data_point (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                avg_text_importance REAL NOT NULL,
                avg_typing_importance REAL NOT NULL,
                avg_voice_importance REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS ix_dashboard_data_point_timestamp
                ON dashboard_data_point (timestamp);",
        )
        .context("Failed to create tables")
        .map_err(|e| HushError::Storage(e.to_string()))?;

        Ok(())
    }

    /// Insert the seed snapshots if the table is empty
    ///
    /// Returns the number of rows inserted: 3 on an empty store, 0 otherwise.
    pub fn seed_if_empty(&self) -> Result<usize> {
        let mut conn = self.open()?;

        let tx = conn
            .transaction()
            .context("Failed to start transaction")
            .map_err(|e| HushError::Storage(e.to_string()))?;

        let existing: Option<i64> = tx
            .query_row("SELECT id FROM dashboard_data_point LIMIT 1", [], |r| {
                r.get(0)
            })
            .optional()
            .context("Failed to check for existing rows")
            .map_err(|e| HushError::Storage(e.to_string()))?;

        if existing.is_some() {
            return Ok(0);
        }

        for (timestamp, text, typing, voice) in SEED_SNAPSHOTS {
            tracing::debug!(timestamp, "inserting seed snapshot");
            tx.execute(
                "INSERT INTO dashboard_data_point
                    (timestamp, avg_text_importance, avg_typing_importance, avg_voice_importance)
                VALUES (?, ?, ?, ?)",
                params![timestamp, text, typing, voice],
            )
            .context("Failed to insert seed snapshot")
            .map_err(|e| HushError::Storage(e.to_string()))?;
        }

        tx.commit()
            .context("Failed to commit transaction")
            .map_err(|e| HushError::Storage(e.to_string()))?;

        Ok(SEED_SNAPSHOTS.len())
    }

    /// Append a snapshot and return it with its assigned id
    pub fn insert(&self, snapshot: &NewSnapshot) -> Result<DashboardSnapshot> {
        let conn = self.open()?;

        tracing::debug!(timestamp = %snapshot.timestamp, "inserting snapshot");
        conn.execute(
            "INSERT INTO dashboard_data_point
                (timestamp, avg_text_importance, avg_typing_importance, avg_voice_importance)
            VALUES (?, ?, ?, ?)",
            params![
                snapshot.timestamp,
                snapshot.avg_text_importance,
                snapshot.avg_typing_importance,
                snapshot.avg_voice_importance
            ],
        )
        .context("Failed to insert snapshot")
        .map_err(|e| HushError::Storage(e.to_string()))?;

        let id = conn.last_insert_rowid();
        Ok(snapshot.clone().with_id(id))
    }

    /// All snapshots, ascending by timestamp
    ///
    /// Timestamps compare as strings; rows with equal timestamps keep
    /// insertion order.
    pub fn list(&self) -> Result<Vec<DashboardSnapshot>> {
        let conn = self.open()?;

        let mut stmt = conn
            .prepare(&format!("{SELECT_COLUMNS} ORDER BY timestamp ASC, id ASC"))
            .context("Failed to prepare statement")
            .map_err(|e| HushError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map([], snapshot_from_row)
            .context("Failed to query snapshots")
            .map_err(|e| HushError::Storage(e.to_string()))?;

        let snapshots = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read snapshot row")
            .map_err(|e| HushError::Storage(e.to_string()))?;

        Ok(snapshots)
    }

    /// Most recent snapshot by timestamp, if any
    pub fn latest(&self) -> Result<Option<DashboardSnapshot>> {
        let conn = self.open()?;

        let snapshot = conn
            .query_row(
                &format!("{SELECT_COLUMNS} ORDER BY timestamp DESC, id DESC LIMIT 1"),
                [],
                snapshot_from_row,
            )
            .optional()
            .context("Failed to query latest snapshot")
            .map_err(|e| HushError::Storage(e.to_string()))?;

        Ok(snapshot)
    }

    /// Number of stored snapshots
    pub fn count(&self) -> Result<usize> {
        let conn = self.open()?;

        let count: i64 = conn
            .query_row("SELECT count(*) FROM dashboard_data_point", [], |r| r.get(0))
            .context("Failed to count snapshots")
            .map_err(|e| HushError::Storage(e.to_string()))?;

        Ok(count as usize)
    }
}

fn snapshot_from_row(row: &Row<'_>) -> rusqlite::Result<DashboardSnapshot> {
    Ok(DashboardSnapshot {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        avg_text_importance: row.get(2)?,
        avg_typing_importance: row.get(3)?,
        avg_voice_importance: row.get(4)?,
    })
}
