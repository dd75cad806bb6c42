//! SQLite storage implementation
//!
//! This module provides a SQLite-backed dataset sink and key-value store.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{DatasetSink, KeyValueStore, StorageError, StorageResult};
use crate::storage::{Record, RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
///
/// The connection sits behind a mutex so the store can be shared between
/// concurrent page handlers.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`
    ///
    /// Missing parent directories are created.
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Database("connection lock poisoned".to_string()))
    }

    // ===== Run Management =====

    /// Records the start of a run and returns its ID
    pub fn begin_run(&self) -> StorageResult<i64> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO runs (started_at, status) VALUES (?1, ?2)",
            params![now, RunStatus::Running.to_db_string()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Marks a run as finished with its final counters
    pub fn finish_run(
        &self,
        run_id: i64,
        status: RunStatus,
        requests_finished: u64,
        requests_failed: u64,
        records_pushed: u64,
    ) -> StorageResult<()> {
        let conn = self.conn()?;
        let now = Utc::now().to_rfc3339();
        let updated = conn.execute(
            "UPDATE runs SET finished_at = ?1, status = ?2, requests_finished = ?3,
                 requests_failed = ?4, records_pushed = ?5
             WHERE id = ?6",
            params![
                now,
                status.to_db_string(),
                requests_finished as i64,
                requests_failed as i64,
                records_pushed as i64,
                run_id
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    /// Gets the most recent run
    pub fn latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, started_at, finished_at, status, requests_finished, requests_failed, records_pushed
             FROM runs ORDER BY id DESC LIMIT 1",
        )?;

        let run = stmt
            .query_row([], |row| {
                Ok(RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    status: RunStatus::from_db_string(&row.get::<_, String>(3)?)
                        .unwrap_or(RunStatus::Running),
                    requests_finished: row.get::<_, i64>(4)? as u64,
                    requests_failed: row.get::<_, i64>(5)? as u64,
                    records_pushed: row.get::<_, i64>(6)? as u64,
                })
            })
            .optional()?;

        Ok(run)
    }

    /// Empties the dataset and the key-value store
    ///
    /// Run history is kept. Called at the start of a run so the results on
    /// disk always belong to the latest run.
    pub fn clear_results(&self) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(
            "
            DELETE FROM dataset_items;
            DELETE FROM key_value;
        ",
        )?;
        Ok(())
    }

    // ===== Statistics =====

    /// Counts dataset items
    pub fn count_items(&self) -> StorageResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM dataset_items", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Lists stored keys in alphabetical order
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM key_value ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}

impl DatasetSink for SqliteStore {
    fn push_data(&self, record: Record) -> StorageResult<()> {
        let data = serde_json::to_string(&record)?;
        let now = Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT INTO dataset_items (data, created_at) VALUES (?1, ?2)",
            params![data, now],
        )?;
        Ok(())
    }

    fn dataset_items(&self) -> StorageResult<Vec<Record>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT data FROM dataset_items ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut items = Vec::with_capacity(rows.len());
        for data in rows {
            items.push(serde_json::from_str(&data)?);
        }
        Ok(items)
    }
}

impl KeyValueStore for SqliteStore {
    fn set_value(&self, key: &str, value: &Value) -> StorageResult<()> {
        let data = serde_json::to_string(value)?;
        let now = Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT OR REPLACE INTO key_value (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, data, now],
        )?;
        Ok(())
    }

    fn get_value(&self, key: &str) -> StorageResult<Option<Value>> {
        let conn = self.conn()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT value FROM key_value WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match data {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }
}
