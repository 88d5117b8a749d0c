//! # tomata Core Library
//!
//! Core business logic for the tomata pomodoro timer. The CLI binary is
//! a thin layer over this crate; a GUI would sit on the same surface.
//!
//! ## Architecture
//!
//! - **Timer engine**: a pure state machine; the caller invokes `tick()`
//!   once per logical second, there are no internal threads or timers
//! - **Session ledger**: append-only SQLite history with statistics
//!   recomputed per query
//! - **Tasks**: a task list whose selected task is credited one pomodoro
//!   per completed work session
//! - **Storage**: SQLite for the ledger and the two JSON storage
//!   documents, TOML for configuration
//! - **Auth**: thin HTTP client for the account backend, keyring-cached
//!   token
//!
//! ## Key components
//!
//! - [`App`]: one instance per running host, wires everything together
//! - [`TimerEngine`]: the countdown state machine
//! - [`TaskStore`]: task list plus current-task binding
//! - [`Database`]: ledger and kv persistence

pub mod app;
pub mod auth;
pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use app::App;
pub use auth::{AuthClient, AuthSession, User};
pub use error::{AuthError, ConfigError, CoreError, Result, StorageError, ValidationError};
pub use events::Event;
pub use session::Session;
pub use stats::{DailyFocus, Stats};
pub use storage::{Config, Database, TaskSnapshot, TimerSnapshot};
pub use task::{Task, TaskDraft, TaskPatch, TaskStore};
pub use timer::{
    SettingsPatch, TimerEngine, TimerMode, TimerSettings, TimerStatus, AUTO_START_DELAY_SECS,
};
