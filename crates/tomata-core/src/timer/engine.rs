//! Timer engine implementation.
//!
//! The engine is a pure state machine with no internal threads or timers.
//! One call to `tick()` is one logical second; the caller drives it at
//! whatever cadence it wants (the CLI sleeps for a wall-clock second,
//! tests call it in a loop).
//!
//! ## State transitions
//!
//! ```text
//! Idle ──start──> Running ──pause──> Paused ──start──> Running
//!                    │
//!                    └─tick reaches 0─> Completed (already advanced to
//!                                       the next mode at full duration)
//! ```
//!
//! `Completed` is the notification pulse after a finalization; every
//! command treats it exactly like `Idle`, so calling `start()` on it is
//! equivalent to `reset()` followed by `start()`.

use chrono::Utc;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::events::Event;
use crate::session::Session;
use crate::storage::snapshot::TimerSnapshot;

use super::{SettingsPatch, TimerMode, TimerSettings, TimerStatus};

/// Delay, in seconds, before an auto-started next session begins.
/// The host scheduler is asked to honor this; the engine never sleeps.
pub const AUTO_START_DELAY_SECS: u64 = 1;

/// Core timer state machine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    settings: TimerSettings,
    mode: TimerMode,
    status: TimerStatus,
    /// Configured duration of `mode`, frozen while a countdown is in
    /// flight so a mid-session settings change cannot corrupt it.
    duration: u32,
    /// Seconds left; always within `0..=duration`.
    remaining: u32,
    /// 1-based position within the current long-break cycle.
    current_session: u32,
    /// Work sessions left before the next long break.
    sessions_until_long_break: u32,
    /// Lifetime count of completed work sessions.
    completed_cycles: u64,
    /// Correlates a started countdown with its eventual history record.
    /// `Some` iff status is Running or Paused.
    session_id: Option<Uuid>,
}

impl TimerEngine {
    /// Fresh engine: idle in work mode at full duration.
    pub fn new(settings: TimerSettings) -> Self {
        let duration = settings.duration_for(TimerMode::Work);
        let sessions_until_long_break = settings.sessions_until_long_break;
        Self {
            settings,
            mode: TimerMode::Work,
            status: TimerStatus::Idle,
            duration,
            remaining: duration,
            current_session: 1,
            sessions_until_long_break,
            completed_cycles: 0,
            session_id: None,
        }
    }

    /// Reconstruct from a persisted snapshot: idle in the persisted mode
    /// at full duration. In-flight countdowns are never resumed.
    pub fn from_snapshot(snap: &TimerSnapshot) -> Self {
        let settings = snap.settings.clone();
        let duration = settings.duration_for(snap.current_mode);
        Self {
            mode: snap.current_mode,
            status: TimerStatus::Idle,
            duration,
            remaining: duration,
            current_session: snap.current_session.max(1),
            sessions_until_long_break: snap.sessions_until_long_break.max(1),
            completed_cycles: snap.completed_cycles,
            session_id: None,
            settings,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration
    }

    pub fn current_session(&self) -> u32 {
        self.current_session
    }

    pub fn sessions_until_long_break(&self) -> u32 {
        self.sessions_until_long_break
    }

    pub fn completed_cycles(&self) -> u64 {
        self.completed_cycles
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// 0.0 .. 100.0 progress through the current countdown.
    pub fn progress_pct(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        let elapsed = (self.duration - self.remaining) as f64;
        (elapsed / self.duration as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode,
            status: self.status,
            remaining_secs: self.remaining,
            duration_secs: self.duration,
            current_session: self.current_session,
            sessions_until_long_break: self.sessions_until_long_break,
            completed_cycles: self.completed_cycles,
            session_id: self.session_id,
            progress_pct: self.progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a new countdown, or resume a paused one. No-op while running.
    pub fn start(&mut self) -> Option<Event> {
        match self.status {
            TimerStatus::Running => None,
            TimerStatus::Paused => {
                self.status = TimerStatus::Running;
                Some(Event::TimerResumed {
                    mode: self.mode,
                    remaining_secs: self.remaining,
                    at: Utc::now(),
                })
            }
            TimerStatus::Idle | TimerStatus::Completed => {
                // remaining == duration in both states, so starting from
                // Completed is reset-then-start without the reset.
                let session_id = Uuid::new_v4();
                self.session_id = Some(session_id);
                self.status = TimerStatus::Running;
                Some(Event::TimerStarted {
                    mode: self.mode,
                    duration_secs: self.duration,
                    session_id,
                    at: Utc::now(),
                })
            }
        }
    }

    /// Freeze the countdown. No-op unless running.
    pub fn pause(&mut self) -> Option<Event> {
        if self.status != TimerStatus::Running {
            return None;
        }
        self.status = TimerStatus::Paused;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining,
            at: Utc::now(),
        })
    }

    /// Back to idle at the full configured duration for the current mode.
    pub fn reset(&mut self) -> Option<Event> {
        self.status = TimerStatus::Idle;
        self.duration = self.settings.duration_for(self.mode);
        self.remaining = self.duration;
        self.session_id = None;
        Some(Event::TimerReset {
            mode: self.mode,
            at: Utc::now(),
        })
    }

    /// Switch to another mode. Rejected while a countdown is in flight
    /// (running or paused); callers check `status()` first.
    pub fn switch_mode(&mut self, mode: TimerMode) -> Option<Event> {
        if self.status.is_in_flight() {
            return None;
        }
        let from = self.mode;
        self.mode = mode;
        self.status = TimerStatus::Idle;
        self.duration = self.settings.duration_for(mode);
        self.remaining = self.duration;
        self.session_id = None;
        Some(Event::ModeSwitched {
            from,
            to: mode,
            duration_secs: self.duration,
            at: Utc::now(),
        })
    }

    /// Merge a settings patch. An in-flight countdown keeps its frozen
    /// duration; when idle the displayed duration is recomputed at once.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<Event, ValidationError> {
        patch.validate()?;
        self.settings.apply(patch);
        if !self.status.is_in_flight() {
            self.duration = self.settings.duration_for(self.mode);
            self.remaining = self.duration;
        }
        Ok(Event::SettingsUpdated {
            settings: self.settings.clone(),
            at: Utc::now(),
        })
    }

    /// One logical second. Only running countdowns advance; the tick that
    /// would reach zero performs the completion transition instead, so
    /// finalization happens exactly once per countdown.
    pub fn tick(&mut self) -> Option<Event> {
        if self.status != TimerStatus::Running {
            return None;
        }
        if self.remaining > 1 {
            self.remaining -= 1;
            return None;
        }
        self.remaining = 0;
        Some(self.finalize())
    }

    /// Force-complete the current countdown as if it had reached zero.
    /// No-op when nothing is in flight.
    pub fn complete(&mut self) -> Option<Event> {
        if !self.status.is_in_flight() {
            return None;
        }
        Some(self.finalize())
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Session finalization: record, cycle bookkeeping, advance to the
    /// next mode, decide auto-start. Runs exactly once per countdown.
    fn finalize(&mut self) -> Event {
        let completed_mode = self.mode;
        let session = Session {
            // session_id is Some for every in-flight countdown; the
            // fallback only guards against misuse.
            id: self.session_id.take().unwrap_or_else(Uuid::new_v4),
            mode: completed_mode,
            duration_secs: self.duration,
            completed_at: Utc::now(),
            task_id: None,
        };

        let next_mode = match completed_mode {
            TimerMode::Work => {
                self.completed_cycles += 1;
                if self.current_session >= self.settings.sessions_until_long_break {
                    self.current_session = 1;
                    self.sessions_until_long_break = self.settings.sessions_until_long_break;
                    TimerMode::LongBreak
                } else {
                    self.current_session += 1;
                    self.sessions_until_long_break =
                        self.sessions_until_long_break.saturating_sub(1);
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Work,
        };

        self.mode = next_mode;
        self.duration = self.settings.duration_for(next_mode);
        self.remaining = self.duration;
        self.status = TimerStatus::Completed;

        let auto_start = match completed_mode {
            TimerMode::Work => self.settings.auto_start_breaks,
            TimerMode::ShortBreak | TimerMode::LongBreak => self.settings.auto_start_work,
        };

        Event::SessionCompleted {
            session,
            next_mode,
            auto_start,
            at: Utc::now(),
        }
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}
