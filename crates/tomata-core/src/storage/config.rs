//! TOML-based application configuration.
//!
//! Holds the timer settings a fresh profile starts with (once a
//! `timer-storage` snapshot exists, the snapshot's settings win) and the
//! backend API endpoint for the auth client.
//!
//! Stored at `~/.config/tomata/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::timer::TimerSettings;

use super::data_dir;

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `http://localhost:3001/api`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:3001/api".into()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tomata/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// First-run timer settings.
    #[serde(default)]
    pub timer: TimerSettings,
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk; a missing file is written out with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if
    /// the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as a string by dot-separated key
    /// (e.g. `timer.work_duration`, `api.base_url`).
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. The value is parsed to
    /// match the existing field's type. Does not persist; call [`save`].
    ///
    /// [`save`]: Config::save
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

fn get_json_value_by_path<'a>(
    root: &'a serde_json::Value,
    key: &str,
) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_json_value_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };

    let mut parts = key.split('.').peekable();
    if parts.peek().is_none() {
        return Err(unknown());
    }

    let mut current = root;
    while let Some(part) = parts.next() {
        let is_leaf = parts.peek().is_none();
        if is_leaf {
            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    let n = value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                    serde_json::Value::Number(n.into())
                }
                serde_json::Value::Null | serde_json::Value::String(_) => {
                    serde_json::Value::String(value.into())
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        current = current.get_mut(part).ok_or_else(unknown)?;
    }

    Err(unknown())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.work_duration, 1500);
        assert_eq!(parsed.api.base_url, "http://localhost:3001/api");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.work_duration").as_deref(), Some("1500"));
        assert_eq!(cfg.get("timer.auto_start_breaks").as_deref(), Some("false"));
        assert_eq!(
            cfg.get("api.base_url").as_deref(),
            Some("http://localhost:3001/api")
        );
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_number_and_bool_fields() {
        let mut cfg = Config::default();
        cfg.set("timer.work_duration", "1800").unwrap();
        cfg.set("timer.auto_start_work", "true").unwrap();
        assert_eq!(cfg.timer.work_duration, 1800);
        assert!(cfg.timer.auto_start_work);
    }

    #[test]
    fn set_updates_string_fields() {
        let mut cfg = Config::default();
        cfg.set("api.base_url", "https://pomo.example.com/api").unwrap();
        assert_eq!(cfg.api.base_url, "https://pomo.example.com/api");
    }

    #[test]
    fn set_rejects_unknown_keys() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timer.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("nope.work_duration", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn set_rejects_type_mismatches() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("timer.auto_start_breaks", "definitely"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("timer.work_duration", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
