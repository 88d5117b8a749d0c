//! Completed-session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::TimerMode;

/// One completed countdown, recorded immutably in the history ledger.
///
/// `duration_secs` is the configured duration of the mode at the time the
/// countdown ran, which is also the number of seconds actually counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub mode: TimerMode,
    pub duration_secs: u32,
    pub completed_at: DateTime<Utc>,
    /// Task credited with this session, if one was selected.
    pub task_id: Option<Uuid>,
}
