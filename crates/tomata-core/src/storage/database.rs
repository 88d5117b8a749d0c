//! SQLite-backed persistence.
//!
//! Two tables: the append-only `sessions` ledger, and a `kv` table
//! holding the JSON storage documents (`timer-storage`, `task-storage`).
//! Statistics are SQL aggregates over the ledger, evaluated per query so
//! the "today" boundary is always the current local calendar day.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::error::StorageError;
use crate::session::Session;
use crate::stats::{self, DailyFocus, Stats};

use super::data_dir;

/// Database file name inside the data directory.
const DB_FILE: &str = "tomata.db";

/// SQLite database handle.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (and migrate) the database at `~/.config/tomata/tomata.db`.
    pub fn open() -> Result<Self, StorageError> {
        Self::open_at(&data_dir()?.join(DB_FILE))
    }

    /// Open (and migrate) a database at an explicit path.
    pub fn open_at(path: &std::path::Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id            TEXT PRIMARY KEY,
                mode          TEXT NOT NULL,
                duration_secs INTEGER NOT NULL,
                completed_at  TEXT NOT NULL,
                task_id       TEXT
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);
            CREATE INDEX IF NOT EXISTS idx_sessions_mode_completed_at ON sessions(mode, completed_at);",
        )?;
        Ok(())
    }

    /// Append a completed session to the ledger.
    pub fn record_session(&self, session: &Session) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO sessions (id, mode, duration_secs, completed_at, task_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session.id.to_string(),
                session.mode.as_str(),
                session.duration_secs,
                session.completed_at.to_rfc3339(),
                session.task_id.map(|id| id.to_string()),
            ],
        )?;
        Ok(())
    }

    /// Number of sessions in the ledger.
    pub fn session_count(&self) -> Result<u64, StorageError> {
        let count =
            self.conn
                .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get::<_, u64>(0))?;
        Ok(count)
    }

    /// Today's and all-time work statistics.
    pub fn stats_summary(&self) -> Result<Stats, StorageError> {
        let today = stats::today_start_utc().to_rfc3339();
        let mut summary = Stats::default();

        let (count, secs) = self.work_aggregate(None)?;
        summary.total_pomodoros = count;
        summary.total_work_secs = secs;

        let (count, secs) = self.work_aggregate(Some(&today))?;
        summary.today_pomodoros = count;
        summary.today_work_secs = secs;

        Ok(summary)
    }

    fn work_aggregate(&self, since: Option<&str>) -> Result<(u64, u64), StorageError> {
        let row = match since {
            Some(bound) => self.conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(duration_secs), 0)
                 FROM sessions
                 WHERE mode = 'work' AND completed_at >= ?1",
                params![bound],
                |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
            )?,
            None => self.conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(duration_secs), 0)
                 FROM sessions
                 WHERE mode = 'work'",
                [],
                |row| Ok((row.get::<_, u64>(0)?, row.get::<_, u64>(1)?)),
            )?,
        };
        Ok(row)
    }

    /// Per-day work totals for the last `days` local calendar days
    /// (oldest first, zero-filled). Feeds external charting.
    pub fn daily_focus(&self, days: u32) -> Result<Vec<DailyFocus>, StorageError> {
        let days = days.max(1);
        let today = stats::local_today();
        let first = today - chrono::Duration::days(i64::from(days) - 1);
        let since = stats::local_day_start_utc(first).to_rfc3339();

        let mut stmt = self.conn.prepare(
            "SELECT duration_secs, completed_at
             FROM sessions
             WHERE mode = 'work' AND completed_at >= ?1",
        )?;
        let rows = stmt.query_map(params![since], |row| {
            Ok((row.get::<_, u64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut series: Vec<DailyFocus> = (0..days)
            .map(|i| DailyFocus {
                date: first + chrono::Duration::days(i64::from(i)),
                work_secs: 0,
                pomodoros: 0,
            })
            .collect();

        for row in rows {
            let (secs, completed_at) = row?;
            // Rows with unparseable timestamps are skipped, not fatal.
            let Ok(parsed) = DateTime::parse_from_rfc3339(&completed_at) else {
                continue;
            };
            let day = stats::local_date_of(parsed.with_timezone(&Utc));
            if let Some(bucket) = series.iter_mut().find(|d| d.date == day) {
                bucket.work_secs += secs;
                bucket.pomodoros += 1;
            }
        }

        Ok(series)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
