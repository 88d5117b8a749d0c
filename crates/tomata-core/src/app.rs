//! Application coordinator.
//!
//! One `App` per running host: it wires the timer engine, the task store
//! and the database together and owns the persistence rhythm. Timer
//! commands that only touch runtime state (start/pause) persist nothing;
//! anything that changes a persisted field writes its storage document
//! before returning. Session finalization is the one place side effects
//! fan out: ledger append, task credit, snapshot refresh.

use uuid::Uuid;

use crate::error::Result;
use crate::events::Event;
use crate::session::Session;
use crate::stats::{DailyFocus, Stats};
use crate::storage::{Config, Database, TaskSnapshot, TimerSnapshot};
use crate::task::{Task, TaskDraft, TaskPatch, TaskStore};
use crate::timer::{SettingsPatch, TimerEngine, TimerMode, TimerSettings};

/// The single engine-plus-collaborators instance of a running app.
pub struct App {
    engine: TimerEngine,
    tasks: TaskStore,
    db: Database,
}

impl App {
    /// Open the on-disk database and restore persisted state, seeding a
    /// fresh profile from the TOML config.
    pub fn open() -> Result<Self> {
        let db = Database::open()?;
        let config = Config::load_or_default();
        Self::load(db, config.timer)
    }

    /// Restore persisted state from the given database. `default_settings`
    /// only applies when no timer document exists yet.
    pub fn load(db: Database, default_settings: TimerSettings) -> Result<Self> {
        let timer_snap = TimerSnapshot::load(&db)?
            .unwrap_or_else(|| TimerSnapshot::with_settings(default_settings));
        let task_snap = TaskSnapshot::load(&db)?.unwrap_or_default();
        Ok(Self {
            engine: TimerEngine::from_snapshot(&timer_snap),
            tasks: TaskStore::from_snapshot(task_snap),
            db,
        })
    }

    // ── Timer operations ─────────────────────────────────────────────

    /// Start or resume the countdown.
    pub fn start_timer(&mut self) -> Option<Event> {
        self.engine.start()
    }

    /// Pause the countdown.
    pub fn pause_timer(&mut self) -> Option<Event> {
        self.engine.pause()
    }

    /// Reset to idle at full duration.
    pub fn reset_timer(&mut self) -> Option<Event> {
        self.engine.reset()
    }

    /// Switch mode; rejected (returns `None`) while a countdown is in
    /// flight. An accepted switch is persisted.
    pub fn switch_mode(&mut self, mode: TimerMode) -> Result<Option<Event>> {
        let event = self.engine.switch_mode(mode);
        if event.is_some() {
            self.save_timer()?;
        }
        Ok(event)
    }

    /// Merge a settings patch and persist it.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<Event> {
        let event = self.engine.update_settings(patch)?;
        self.save_timer()?;
        Ok(event)
    }

    /// Advance the countdown by one logical second. A completing tick
    /// runs the full finalization before returning.
    pub fn tick(&mut self) -> Result<Option<Event>> {
        let event = self.engine.tick();
        self.after_engine_event(event)
    }

    /// Force-complete the in-flight countdown.
    pub fn complete_timer(&mut self) -> Result<Option<Event>> {
        let event = self.engine.complete();
        self.after_engine_event(event)
    }

    fn after_engine_event(&mut self, event: Option<Event>) -> Result<Option<Event>> {
        match event {
            Some(Event::SessionCompleted {
                mut session,
                next_mode,
                auto_start,
                at,
            }) => {
                self.apply_completion(&mut session)?;
                Ok(Some(Event::SessionCompleted {
                    session,
                    next_mode,
                    auto_start,
                    at,
                }))
            }
            other => Ok(other),
        }
    }

    /// Finalization side effects: stamp the bound task onto the record,
    /// credit it for work sessions, append to the ledger, persist.
    fn apply_completion(&mut self, session: &mut Session) -> Result<()> {
        session.task_id = self.tasks.selected_id();
        if session.mode.is_work() {
            if let Some(task_id) = session.task_id {
                self.tasks.increment_pomodoro(task_id);
            }
        }
        self.db.record_session(session)?;
        self.save_tasks()?;
        self.save_timer()?;
        Ok(())
    }

    // ── Task operations ──────────────────────────────────────────────

    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Task> {
        let task = self.tasks.add(draft)?;
        self.save_tasks()?;
        Ok(task)
    }

    pub fn update_task(&mut self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>> {
        let task = self.tasks.update(id, patch)?;
        if task.is_some() {
            self.save_tasks()?;
        }
        Ok(task)
    }

    pub fn delete_task(&mut self, id: Uuid) -> Result<bool> {
        let deleted = self.tasks.delete(id);
        if deleted {
            self.save_tasks()?;
        }
        Ok(deleted)
    }

    pub fn complete_task(&mut self, id: Uuid) -> Result<Option<Task>> {
        let task = self.tasks.complete(id);
        if task.is_some() {
            self.save_tasks()?;
        }
        Ok(task)
    }

    /// Bind the current task. An unknown id is a silent no-op (`false`).
    pub fn select_task(&mut self, id: Option<Uuid>) -> Result<bool> {
        let changed = self.tasks.select(id);
        if changed {
            self.save_tasks()?;
        }
        Ok(changed)
    }

    pub fn increment_task_pomodoro(&mut self, id: Uuid) -> Result<Option<Task>> {
        let task = self.tasks.increment_pomodoro(id);
        if task.is_some() {
            self.save_tasks()?;
        }
        Ok(task)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Current state as a snapshot event.
    pub fn snapshot(&self) -> Event {
        self.engine.snapshot()
    }

    /// 0-100 progress through the current countdown.
    pub fn progress_pct(&self) -> f64 {
        self.engine.progress_pct()
    }

    pub fn stats(&self) -> Result<Stats> {
        Ok(self.db.stats_summary()?)
    }

    pub fn daily_focus(&self, days: u32) -> Result<Vec<DailyFocus>> {
        Ok(self.db.daily_focus(days)?)
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn save_timer(&self) -> Result<()> {
        let stats = self.db.stats_summary()?;
        let snap = TimerSnapshot {
            current_mode: self.engine.mode(),
            current_session: self.engine.current_session(),
            sessions_until_long_break: self.engine.sessions_until_long_break(),
            completed_cycles: self.engine.completed_cycles(),
            today_pomodoros: stats.today_pomodoros,
            today_work_secs: stats.today_work_secs,
            settings: self.engine.settings().clone(),
        };
        snap.save(&self.db)
    }

    fn save_tasks(&self) -> Result<()> {
        self.tasks.to_snapshot().save(&self.db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerStatus;

    fn memory_app(settings: TimerSettings) -> App {
        App::load(Database::open_memory().unwrap(), settings).unwrap()
    }

    fn fast_settings() -> TimerSettings {
        TimerSettings {
            work_duration: 2,
            short_break_duration: 2,
            long_break_duration: 3,
            sessions_until_long_break: 2,
            ..TimerSettings::default()
        }
    }

    #[test]
    fn completion_appends_to_ledger() {
        let mut app = memory_app(fast_settings());
        app.start_timer();
        let event = app.complete_timer().unwrap().unwrap();
        assert!(matches!(event, Event::SessionCompleted { .. }));
        let stats = app.stats().unwrap();
        assert_eq!(stats.today_pomodoros, 1);
        assert_eq!(stats.today_work_secs, 2);
    }

    #[test]
    fn completion_credits_the_selected_task() {
        let mut app = memory_app(fast_settings());
        let task = app
            .add_task(TaskDraft {
                title: "Ship it".into(),
                estimated_pomodoros: 2,
                notes: None,
            })
            .unwrap();
        assert!(app.select_task(Some(task.id)).unwrap());

        app.start_timer();
        let event = app.complete_timer().unwrap().unwrap();
        match event {
            Event::SessionCompleted { session, .. } => {
                assert_eq!(session.task_id, Some(task.id))
            }
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
        let task = app.tasks().get(task.id).unwrap();
        assert_eq!(task.completed_pomodoros, 1);
        assert!(!task.completed);
    }

    #[test]
    fn break_completion_records_task_but_does_not_credit() {
        let mut app = memory_app(fast_settings());
        let task = app
            .add_task(TaskDraft {
                title: "Reading".into(),
                estimated_pomodoros: 1,
                notes: None,
            })
            .unwrap();
        app.select_task(Some(task.id)).unwrap();

        app.switch_mode(TimerMode::ShortBreak).unwrap();
        app.start_timer();
        let event = app.complete_timer().unwrap().unwrap();
        match event {
            Event::SessionCompleted { session, .. } => {
                assert_eq!(session.task_id, Some(task.id))
            }
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
        assert_eq!(app.tasks().get(task.id).unwrap().completed_pomodoros, 0);
    }

    #[test]
    fn timer_state_survives_a_reload_as_idle() {
        let db = Database::open_memory().unwrap();
        let mut app = App::load(db, fast_settings()).unwrap();
        app.start_timer();
        app.tick().unwrap();
        app.tick().unwrap(); // completes session 1, engine now in ShortBreak

        // Reuse the same database handle chain by snapshotting through kv.
        let snap = TimerSnapshot {
            current_mode: app.engine().mode(),
            current_session: app.engine().current_session(),
            sessions_until_long_break: app.engine().sessions_until_long_break(),
            completed_cycles: app.engine().completed_cycles(),
            today_pomodoros: 0,
            today_work_secs: 0,
            settings: app.engine().settings().clone(),
        };
        let restored = TimerEngine::from_snapshot(&snap);
        assert_eq!(restored.status(), TimerStatus::Idle);
        assert_eq!(restored.mode(), TimerMode::ShortBreak);
        assert_eq!(restored.remaining_secs(), restored.duration_secs());
        assert!(restored.session_id().is_none());
    }
}
