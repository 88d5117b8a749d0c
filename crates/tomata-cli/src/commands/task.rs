//! Task management commands.

use clap::Subcommand;
use uuid::Uuid;

use tomata_core::{App, TaskDraft, TaskPatch};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Estimated pomodoros (1-20)
        #[arg(long, default_value = "1")]
        estimated_pomodoros: u32,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List tasks
    List {
        /// Only completed tasks
        #[arg(long)]
        completed: bool,
        /// Only tasks created today
        #[arg(long)]
        today: bool,
    },
    /// Show one task
    Show {
        id: String,
    },
    /// Update a task
    Update {
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New estimate (1-20)
        #[arg(long)]
        estimated_pomodoros: Option<u32>,
        /// Set completed status
        #[arg(long)]
        completed: Option<bool>,
        /// New notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a task
    Delete {
        id: String,
    },
    /// Mark a task done
    Done {
        id: String,
    },
    /// Select the task credited by completed work sessions
    Select {
        /// Task id; omit to clear the selection
        id: Option<String>,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::open()?;

    match action {
        TaskAction::Add {
            title,
            estimated_pomodoros,
            notes,
        } => {
            let task = app.add_task(TaskDraft {
                title,
                estimated_pomodoros,
                notes,
            })?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { completed, today } => {
            let tasks = if completed {
                app.tasks().completed()
            } else if today {
                app.tasks().today()
            } else {
                app.tasks().all().iter().collect()
            };
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Show { id } => {
            let id = Uuid::parse_str(&id)?;
            match app.tasks().get(id) {
                Some(task) => println!("{}", serde_json::to_string_pretty(task)?),
                None => println!("task not found: {id}"),
            }
        }
        TaskAction::Update {
            id,
            title,
            estimated_pomodoros,
            completed,
            notes,
        } => {
            let id = Uuid::parse_str(&id)?;
            let patch = TaskPatch {
                title,
                estimated_pomodoros,
                completed,
                notes,
            };
            match app.update_task(id, patch)? {
                Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
                None => println!("task not found: {id}"),
            }
        }
        TaskAction::Delete { id } => {
            let id = Uuid::parse_str(&id)?;
            if app.delete_task(id)? {
                println!("task deleted: {id}");
            } else {
                println!("task not found: {id}");
            }
        }
        TaskAction::Done { id } => {
            let id = Uuid::parse_str(&id)?;
            match app.complete_task(id)? {
                Some(task) => println!("{}", serde_json::to_string_pretty(&task)?),
                None => println!("task not found: {id}"),
            }
        }
        TaskAction::Select { id } => {
            let id = match id {
                Some(raw) => Some(Uuid::parse_str(&raw)?),
                None => None,
            };
            if app.select_task(id)? {
                match app.tasks().selected() {
                    Some(task) => println!("{}", serde_json::to_string_pretty(task)?),
                    None => println!("selection cleared"),
                }
            } else {
                println!("task not found; selection unchanged");
            }
        }
    }

    Ok(())
}
