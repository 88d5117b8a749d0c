//! Timer state machine: modes, status, settings, and the engine itself.

pub mod engine;
pub mod settings;

pub use engine::{TimerEngine, AUTO_START_DELAY_SECS};
pub use settings::{SettingsPatch, TimerSettings};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which configured duration governs the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn is_work(self) -> bool {
        matches!(self, TimerMode::Work)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::ShortBreak => "shortBreak",
            TimerMode::LongBreak => "longBreak",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(TimerMode::Work),
            "shortBreak" | "short-break" | "short_break" => Ok(TimerMode::ShortBreak),
            "longBreak" | "long-break" | "long_break" => Ok(TimerMode::LongBreak),
            other => Err(format!(
                "unknown mode '{other}' (expected work, shortBreak or longBreak)"
            )),
        }
    }
}

/// Run state of the countdown.
///
/// `Completed` is a transient notification state: the engine has already
/// advanced to the next mode at full duration, and every command treats
/// it exactly like `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

impl TimerStatus {
    /// True while a started countdown exists (running or frozen).
    pub fn is_in_flight(self) -> bool {
        matches!(self, TimerStatus::Running | TimerStatus::Paused)
    }
}
