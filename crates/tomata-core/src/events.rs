use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::Session;
use crate::timer::{TimerMode, TimerSettings, TimerStatus};

/// Every accepted timer command produces an Event; hosts render or relay
/// them. A command that returns no event changed nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        duration_secs: u32,
        session_id: Uuid,
        at: DateTime<Utc>,
    },
    TimerResumed {
        mode: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: TimerSettings,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero (or was force-completed). The engine has
    /// already advanced to `next_mode`; `auto_start` is the policy decision
    /// the host is asked to honor after a short delay.
    SessionCompleted {
        session: Session,
        next_mode: TimerMode,
        auto_start: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: TimerMode,
        status: TimerStatus,
        remaining_secs: u32,
        duration_secs: u32,
        current_session: u32,
        sessions_until_long_break: u32,
        completed_cycles: u64,
        session_id: Option<Uuid>,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}
