//! Task list and the timer's "current task" binding.
//!
//! The store owns the tasks; the timer only holds a weak reference (the
//! selected id). Completing a work session credits the selected task
//! with one pomodoro, saturating at the estimate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::stats;
use crate::storage::snapshot::TaskSnapshot;

const TITLE_MAX: usize = 100;
const NOTES_MAX: usize = 500;
const ESTIMATE_MIN: u32 = 1;
const ESTIMATE_MAX: u32 = 20;

/// A unit of work measured in pomodoros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub estimated_pomodoros: u32,
    /// Never exceeds `estimated_pomodoros`.
    pub completed_pomodoros: u32,
    pub completed: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// 0-100 completion based on credited pomodoros.
    pub fn progress_pct(&self) -> f64 {
        if self.estimated_pomodoros == 0 {
            return 0.0;
        }
        (f64::from(self.completed_pomodoros) / f64::from(self.estimated_pomodoros) * 100.0)
            .clamp(0.0, 100.0)
    }
}

/// Creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub estimated_pomodoros: u32,
    pub notes: Option<String>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub estimated_pomodoros: Option<u32>,
    pub completed: Option<bool>,
    pub notes: Option<String>,
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::invalid("title", "must not be empty"));
    }
    if title.chars().count() > TITLE_MAX {
        return Err(ValidationError::invalid(
            "title",
            format!("must be at most {TITLE_MAX} characters"),
        ));
    }
    Ok(title.to_string())
}

fn validate_estimate(estimate: u32) -> Result<(), ValidationError> {
    if !(ESTIMATE_MIN..=ESTIMATE_MAX).contains(&estimate) {
        return Err(ValidationError::invalid(
            "estimated_pomodoros",
            format!("must be between {ESTIMATE_MIN} and {ESTIMATE_MAX}"),
        ));
    }
    Ok(())
}

fn validate_notes(notes: &Option<String>) -> Result<(), ValidationError> {
    if let Some(notes) = notes {
        if notes.chars().count() > NOTES_MAX {
            return Err(ValidationError::invalid(
                "notes",
                format!("must be at most {NOTES_MAX} characters"),
            ));
        }
    }
    Ok(())
}

/// Owns the task list plus the selected ("current") task id.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    selected: Option<Uuid>,
}

impl TaskStore {
    pub fn from_snapshot(snap: TaskSnapshot) -> Self {
        let selected = snap
            .selected_task_id
            .filter(|id| snap.tasks.iter().any(|t| t.id == *id));
        Self {
            tasks: snap.tasks,
            selected,
        }
    }

    pub fn to_snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            tasks: self.tasks.clone(),
            selected_task_id: self.selected,
        }
    }

    /// Validate and append a new task.
    pub fn add(&mut self, draft: TaskDraft) -> Result<Task, ValidationError> {
        let title = validate_title(&draft.title)?;
        validate_estimate(draft.estimated_pomodoros)?;
        validate_notes(&draft.notes)?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title,
            estimated_pomodoros: draft.estimated_pomodoros,
            completed_pomodoros: 0,
            completed: false,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Apply a patch. Returns the updated task, or `None` for an unknown
    /// id. Shrinking the estimate clamps the credited count down with it.
    pub fn update(&mut self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>, ValidationError> {
        let title = match &patch.title {
            Some(t) => Some(validate_title(t)?),
            None => None,
        };
        if let Some(estimate) = patch.estimated_pomodoros {
            validate_estimate(estimate)?;
        }
        validate_notes(&patch.notes)?;

        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(estimate) = patch.estimated_pomodoros {
            task.estimated_pomodoros = estimate;
            task.completed_pomodoros = task.completed_pomodoros.min(estimate);
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        if let Some(notes) = patch.notes {
            task.notes = Some(notes);
        }
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    /// Remove a task; a binding to it is cleared with it.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.tasks.len() != before
    }

    /// Mark a task done regardless of credited pomodoros.
    pub fn complete(&mut self, id: Uuid) -> Option<Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed = true;
        task.updated_at = Utc::now();
        Some(task.clone())
    }

    /// Bind the timer's current task. An unknown id leaves the binding
    /// unchanged and returns false; `None` clears it.
    pub fn select(&mut self, id: Option<Uuid>) -> bool {
        match id {
            None => {
                self.selected = None;
                true
            }
            Some(id) if self.tasks.iter().any(|t| t.id == id) => {
                self.selected = Some(id);
                true
            }
            Some(_) => false,
        }
    }

    /// Credit one pomodoro, saturating at the estimate; reaching the
    /// estimate marks the task completed.
    pub fn increment_pomodoro(&mut self, id: Uuid) -> Option<Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        task.completed_pomodoros = (task.completed_pomodoros + 1).min(task.estimated_pomodoros);
        if task.completed_pomodoros >= task.estimated_pomodoros {
            task.completed = true;
        }
        task.updated_at = Utc::now();
        Some(task.clone())
    }

    // ── Getters ──────────────────────────────────────────────────────

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn active(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    pub fn completed(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed).collect()
    }

    /// Tasks created today, local time.
    pub fn today(&self) -> Vec<&Task> {
        let today = stats::local_today();
        self.tasks
            .iter()
            .filter(|t| stats::local_date_of(t.created_at) == today)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, estimate: u32) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            estimated_pomodoros: estimate,
            notes: None,
        }
    }

    #[test]
    fn add_and_get() {
        let mut store = TaskStore::default();
        let task = store.add(draft("Write report", 4)).unwrap();
        assert_eq!(task.completed_pomodoros, 0);
        assert!(!task.completed);
        assert_eq!(store.get(task.id).unwrap().title, "Write report");
    }

    #[test]
    fn title_is_trimmed_and_validated() {
        let mut store = TaskStore::default();
        let task = store.add(draft("  padded  ", 1)).unwrap();
        assert_eq!(task.title, "padded");
        assert!(store.add(draft("   ", 1)).is_err());
        assert!(store.add(draft(&"x".repeat(101), 1)).is_err());
    }

    #[test]
    fn estimate_bounds_enforced() {
        let mut store = TaskStore::default();
        assert!(store.add(draft("a", 0)).is_err());
        assert!(store.add(draft("a", 21)).is_err());
        assert!(store.add(draft("a", 20)).is_ok());
    }

    #[test]
    fn increment_saturates_and_completes() {
        let mut store = TaskStore::default();
        let task = store.add(draft("Quick fix", 2)).unwrap();

        let t = store.increment_pomodoro(task.id).unwrap();
        assert_eq!(t.completed_pomodoros, 1);
        assert!(!t.completed);

        let t = store.increment_pomodoro(task.id).unwrap();
        assert_eq!(t.completed_pomodoros, 2);
        assert!(t.completed);

        // Saturates: never exceeds the estimate.
        let t = store.increment_pomodoro(task.id).unwrap();
        assert_eq!(t.completed_pomodoros, 2);
    }

    #[test]
    fn select_unknown_id_is_a_silent_no_op() {
        let mut store = TaskStore::default();
        let task = store.add(draft("a", 1)).unwrap();
        assert!(store.select(Some(task.id)));

        assert!(!store.select(Some(Uuid::new_v4())));
        assert_eq!(store.selected_id(), Some(task.id));

        assert!(store.select(None));
        assert!(store.selected_id().is_none());
    }

    #[test]
    fn delete_clears_binding() {
        let mut store = TaskStore::default();
        let task = store.add(draft("a", 1)).unwrap();
        store.select(Some(task.id));
        assert!(store.delete(task.id));
        assert!(store.selected_id().is_none());
        assert!(!store.delete(task.id));
    }

    #[test]
    fn shrinking_estimate_clamps_credited_count() {
        let mut store = TaskStore::default();
        let task = store.add(draft("a", 5)).unwrap();
        for _ in 0..4 {
            store.increment_pomodoro(task.id);
        }
        let updated = store
            .update(
                task.id,
                TaskPatch {
                    estimated_pomodoros: Some(2),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.estimated_pomodoros, 2);
        assert_eq!(updated.completed_pomodoros, 2);
    }

    #[test]
    fn update_unknown_id_returns_none() {
        let mut store = TaskStore::default();
        let result = store.update(Uuid::new_v4(), TaskPatch::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn active_and_completed_filters() {
        let mut store = TaskStore::default();
        let a = store.add(draft("a", 1)).unwrap();
        store.add(draft("b", 1)).unwrap();
        store.complete(a.id);
        assert_eq!(store.active().len(), 1);
        assert_eq!(store.completed().len(), 1);
        assert_eq!(store.today().len(), 2);
    }

    #[test]
    fn snapshot_roundtrip_drops_dangling_selection() {
        let mut store = TaskStore::default();
        let task = store.add(draft("a", 1)).unwrap();
        store.select(Some(task.id));

        let restored = TaskStore::from_snapshot(store.to_snapshot());
        assert_eq!(restored.selected_id(), Some(task.id));

        // A snapshot referencing a task that no longer exists loses the
        // selection instead of keeping a dangling id.
        let snap = TaskSnapshot {
            tasks: vec![],
            selected_task_id: Some(task.id),
        };
        let restored = TaskStore::from_snapshot(snap);
        assert!(restored.selected_id().is_none());
    }
}
