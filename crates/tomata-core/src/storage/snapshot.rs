//! Persisted storage documents.
//!
//! Two independent JSON documents live in the kv table, one per key.
//! They are deliberately distinct from the runtime types: a snapshot
//! never carries `remaining`, `status` or the session id -- an in-flight
//! countdown is not resumed across a restart. Reconstruction rule:
//! idle, in the persisted mode, at that mode's full configured duration.
//!
//! A corrupt document is treated like a missing one; loading never fails
//! because of bad data, only because storage itself is unavailable.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::task::Task;
use crate::timer::{TimerMode, TimerSettings};

use super::database::Database;

/// kv key of the timer/settings document.
pub const TIMER_STORAGE_KEY: &str = "timer-storage";
/// kv key of the task-list document.
pub const TASK_STORAGE_KEY: &str = "task-storage";

/// Persisted slice of the timer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub current_mode: TimerMode,
    pub current_session: u32,
    pub sessions_until_long_break: u32,
    pub completed_cycles: u64,
    pub today_pomodoros: u64,
    pub today_work_secs: u64,
    pub settings: TimerSettings,
}

impl TimerSnapshot {
    /// Fresh-profile snapshot carrying the given settings.
    pub fn with_settings(settings: TimerSettings) -> Self {
        Self {
            current_mode: TimerMode::Work,
            current_session: 1,
            sessions_until_long_break: settings.sessions_until_long_break,
            completed_cycles: 0,
            today_pomodoros: 0,
            today_work_secs: 0,
            settings,
        }
    }

    /// Load from the kv store. Missing or corrupt documents yield `None`.
    pub fn load(db: &Database) -> Result<Option<Self>, StorageError> {
        load_document(db, TIMER_STORAGE_KEY)
    }

    pub fn save(&self, db: &Database) -> Result<()> {
        let json = serde_json::to_string(self)?;
        db.kv_set(TIMER_STORAGE_KEY, &json)?;
        Ok(())
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::with_settings(TimerSettings::default())
    }
}

/// Persisted task list plus selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub selected_task_id: Option<Uuid>,
}

impl TaskSnapshot {
    /// Load from the kv store. Missing or corrupt documents yield `None`.
    pub fn load(db: &Database) -> Result<Option<Self>, StorageError> {
        load_document(db, TASK_STORAGE_KEY)
    }

    pub fn save(&self, db: &Database) -> Result<()> {
        let json = serde_json::to_string(self)?;
        db.kv_set(TASK_STORAGE_KEY, &json)?;
        Ok(())
    }
}

fn load_document<T: serde::de::DeserializeOwned>(
    db: &Database,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match db.kv_get(key)? {
        Some(json) => Ok(serde_json::from_str(&json).ok()),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_snapshot_roundtrip() {
        let db = Database::open_memory().unwrap();
        let snap = TimerSnapshot {
            current_mode: TimerMode::ShortBreak,
            current_session: 3,
            sessions_until_long_break: 2,
            completed_cycles: 11,
            today_pomodoros: 4,
            today_work_secs: 6000,
            settings: TimerSettings::default(),
        };
        snap.save(&db).unwrap();
        assert_eq!(TimerSnapshot::load(&db).unwrap(), Some(snap));
    }

    #[test]
    fn missing_document_is_none() {
        let db = Database::open_memory().unwrap();
        assert_eq!(TimerSnapshot::load(&db).unwrap(), None);
        assert_eq!(TaskSnapshot::load(&db).unwrap(), None);
    }

    #[test]
    fn corrupt_document_is_none_not_an_error() {
        let db = Database::open_memory().unwrap();
        db.kv_set(TIMER_STORAGE_KEY, "{not json").unwrap();
        db.kv_set(TASK_STORAGE_KEY, "[\"wrong shape\"]").unwrap();
        assert_eq!(TimerSnapshot::load(&db).unwrap(), None);
        assert_eq!(TaskSnapshot::load(&db).unwrap(), None);
    }

    #[test]
    fn task_snapshot_defaults_tolerate_missing_fields() {
        let snap: TaskSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snap.tasks.is_empty());
        assert!(snap.selected_task_id.is_none());
    }
}
