pub mod config;
pub mod database;
pub mod snapshot;

pub use config::Config;
pub use database::Database;
pub use snapshot::{TaskSnapshot, TimerSnapshot, TASK_STORAGE_KEY, TIMER_STORAGE_KEY};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/tomata[-dev]/` based on TOMATA_ENV.
///
/// Set TOMATA_ENV=dev to use a separate development data directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("TOMATA_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("tomata-dev")
    } else {
        base_dir.join("tomata")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StorageError::DataDir(e.to_string()))?;
    Ok(dir)
}
