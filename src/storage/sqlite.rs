//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::crawler::TaskKind;
use crate::item::ItemRecord;
use crate::output::TaskFailure;
use crate::state::TaskOutcome;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Running),
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs WHERE id = ?1",
                params![run_id],
                run_from_row,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                "SELECT id, started_at, finished_at, config_hash, status FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;

        Ok(run)
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Items =====

    fn insert_item(&mut self, run_id: i64, item: &ItemRecord) -> StorageResult<i64> {
        let artist = serde_json::to_string(&item.artist)?;
        let path = serde_json::to_string(&item.path)?;
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO items
                (run_id, url, title, image, height, width, description, artist, path, top_category, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                run_id,
                item.url,
                item.title,
                item.image,
                item.height,
                item.width,
                item.description,
                artist,
                path,
                item.path.top_level(),
                now,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn count_items(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM items WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_items_by_category(&self, run_id: i64) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT COALESCE(top_category, ''), COUNT(*) AS n FROM items
             WHERE run_id = ?1
             GROUP BY top_category
             ORDER BY n DESC, top_category",
        )?;

        let rows = stmt.query_map(params![run_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }

        Ok(counts)
    }

    // ===== Failures =====

    fn insert_failure(&mut self, run_id: i64, failure: &TaskFailure) -> StorageResult<()> {
        let path = serde_json::to_string(&failure.path)?;
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO failures (run_id, url, path, task_kind, outcome, message, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run_id,
                failure.url,
                path,
                failure.kind.label(),
                failure.outcome.to_db_string(),
                failure.message,
                now,
            ],
        )?;

        Ok(())
    }

    fn load_failures(&self, run_id: i64) -> StorageResult<Vec<TaskFailure>> {
        let mut stmt = self.conn.prepare(
            "SELECT url, path, task_kind, outcome, message
             FROM failures WHERE run_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![run_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut failures = Vec::new();
        for row in rows {
            let (url, path, kind, outcome, message) = row?;

            let kind = TaskKind::from_label(&kind).ok_or_else(|| StorageError::CorruptRow {
                table: "failures",
                message: format!("unknown task kind '{}'", kind),
            })?;
            let outcome =
                TaskOutcome::from_db_string(&outcome).ok_or_else(|| StorageError::CorruptRow {
                    table: "failures",
                    message: format!("unknown outcome '{}'", outcome),
                })?;

            failures.push(TaskFailure {
                url,
                path: serde_json::from_str(&path)?,
                kind,
                outcome,
                message,
            });
        }

        Ok(failures)
    }

    fn count_failures_by_outcome(&self, run_id: i64) -> StorageResult<HashMap<TaskOutcome, u64>> {
        let mut stmt = self.conn.prepare(
            "SELECT outcome, COUNT(*) FROM failures WHERE run_id = ?1 GROUP BY outcome",
        )?;

        let rows = stmt.query_map(params![run_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut summary = HashMap::new();
        for row in rows {
            let (outcome_str, count) = row?;
            if let Some(outcome) = TaskOutcome::from_db_string(&outcome_str) {
                summary.insert(outcome, count as u64);
            }
        }

        Ok(summary)
    }
}
