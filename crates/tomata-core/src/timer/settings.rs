//! Timer settings and partial updates.
//!
//! Durations are stored in seconds. A running countdown's frozen
//! duration is never touched by a settings update -- see
//! [`TimerEngine::update_settings`](super::engine::TimerEngine::update_settings).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use super::TimerMode;

/// User-configurable timer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// Work session length in seconds.
    #[serde(default = "default_work_duration")]
    pub work_duration: u32,
    /// Short break length in seconds.
    #[serde(default = "default_short_break_duration")]
    pub short_break_duration: u32,
    /// Long break length in seconds.
    #[serde(default = "default_long_break_duration")]
    pub long_break_duration: u32,
    /// Completed work sessions before a long break is inserted.
    #[serde(default = "default_sessions_until_long_break")]
    pub sessions_until_long_break: u32,
    /// Start the break countdown automatically after a work session.
    #[serde(default)]
    pub auto_start_breaks: bool,
    /// Start the next work countdown automatically after a break.
    #[serde(default)]
    pub auto_start_work: bool,
    /// Host-facing toggle; no effect on the state machine.
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// Host-facing toggle; no effect on the state machine.
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

fn default_work_duration() -> u32 {
    25 * 60
}
fn default_short_break_duration() -> u32 {
    5 * 60
}
fn default_long_break_duration() -> u32 {
    15 * 60
}
fn default_sessions_until_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            work_duration: default_work_duration(),
            short_break_duration: default_short_break_duration(),
            long_break_duration: default_long_break_duration(),
            sessions_until_long_break: default_sessions_until_long_break(),
            auto_start_breaks: false,
            auto_start_work: false,
            sound_enabled: true,
            notifications_enabled: true,
        }
    }
}

impl TimerSettings {
    /// Configured duration in seconds for the given mode.
    pub fn duration_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work_duration,
            TimerMode::ShortBreak => self.short_break_duration,
            TimerMode::LongBreak => self.long_break_duration,
        }
    }

    /// Apply a validated patch.
    pub(crate) fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(v) = patch.work_duration {
            self.work_duration = v;
        }
        if let Some(v) = patch.short_break_duration {
            self.short_break_duration = v;
        }
        if let Some(v) = patch.long_break_duration {
            self.long_break_duration = v;
        }
        if let Some(v) = patch.sessions_until_long_break {
            self.sessions_until_long_break = v;
        }
        if let Some(v) = patch.auto_start_breaks {
            self.auto_start_breaks = v;
        }
        if let Some(v) = patch.auto_start_work {
            self.auto_start_work = v;
        }
        if let Some(v) = patch.sound_enabled {
            self.sound_enabled = v;
        }
        if let Some(v) = patch.notifications_enabled {
            self.notifications_enabled = v;
        }
    }
}

/// Partial settings update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub work_duration: Option<u32>,
    pub short_break_duration: Option<u32>,
    pub long_break_duration: Option<u32>,
    pub sessions_until_long_break: Option<u32>,
    pub auto_start_breaks: Option<bool>,
    pub auto_start_work: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub notifications_enabled: Option<bool>,
}

impl SettingsPatch {
    /// Durations and the long-break threshold must be positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("work_duration", self.work_duration),
            ("short_break_duration", self.short_break_duration),
            ("long_break_duration", self.long_break_duration),
            ("sessions_until_long_break", self.sessions_until_long_break),
        ] {
            if value == Some(0) {
                return Err(ValidationError::invalid(field, "must be at least 1"));
            }
        }
        Ok(())
    }
}
