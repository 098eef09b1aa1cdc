//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Lock mode focus/break durations
//! - Selected reminder interval
//! - Notification and chime behavior
//!
//! Configuration is stored at `<data dir>/config.toml`. Stored values are
//! clamped into range when read through [`Config::lock_settings`] and
//! [`Config::interval`], so a hand-edited file never reaches the cycles
//! unvalidated.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};
use crate::reminder::presets::{self, IntervalPreset, INTERVAL_PRESETS};
use crate::timer::LockSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockConfig {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u32,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderConfig {
    /// Index into the interval presets.
    #[serde(default)]
    pub interval_index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Treat the host as always focused, which suppresses break notifications.
    /// A terminal cannot observe window focus, so this is a user choice.
    #[serde(default)]
    pub assume_foreground: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChimeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Command used to play `sound_file`.
    #[serde(default = "default_player")]
    pub player: String,
    /// Sound to play. Falls back to the terminal bell when unset.
    #[serde(default)]
    pub sound_file: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lock: LockConfig,
    #[serde(default)]
    pub reminder: ReminderConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub chime: ChimeConfig,
}

fn default_focus_minutes() -> u32 {
    30
}
fn default_break_minutes() -> u32 {
    5
}
fn default_true() -> bool {
    true
}
fn default_player() -> String {
    "paplay".into()
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            assume_foreground: false,
        }
    }
}

impl Default for ChimeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            player: default_player(),
            sound_file: None,
        }
    }
}

impl Config {
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
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    // An empty value clears optional text settings.
                    serde_json::Value::Null | serde_json::Value::String(_) if value.is_empty() => {
                        serde_json::Value::Null
                    }
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key, validate it, and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the new value is out of range. Nothing is written in that case.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_at(&Self::path()?, key, value)
    }

    /// Same as [`Config::set`], saving to `path`.
    pub fn set_at(&mut self, path: &Path, key: &str, value: &str) -> Result<()> {
        let mut next = self.clone();
        next.apply(key, value)?;
        next.validate_key(key)?;
        next.save_to(path)?;
        *self = next;
        Ok(())
    }

    /// Strict range check of the value stored under `key`.
    ///
    /// Only the named field is checked: other out-of-range values in a
    /// hand-edited file are clamped on read and must not block edits.
    pub fn validate_key(&self, key: &str) -> Result<(), ValidationError> {
        match key {
            "lock.focus_minutes" => LockSettings::check_focus(self.lock.focus_minutes),
            "lock.break_minutes" => LockSettings::check_break(self.lock.break_minutes),
            "reminder.interval_index" => presets::preset(self.reminder.interval_index).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Path of the config file in the data directory.
    pub fn file_path() -> Result<PathBuf> {
        Self::path()
    }

    /// Lock durations, clamped into the allowed ranges.
    pub fn lock_settings(&self) -> LockSettings {
        let (focus_minutes, break_minutes) = (self.lock.focus_minutes, self.lock.break_minutes);
        LockSettings::new(focus_minutes, break_minutes).unwrap_or_else(|e| {
            let clamped = LockSettings::clamped(focus_minutes, break_minutes);
            tracing::warn!(
                "{e}; using {} min focus / {} min break",
                clamped.focus_minutes(),
                clamped.break_minutes()
            );
            clamped
        })
    }

    /// Selected reminder preset, falling back to the last one if the stored
    /// index is out of range.
    pub fn interval(&self) -> &'static IntervalPreset {
        presets::preset(self.reminder.interval_index).unwrap_or_else(|e| {
            let last = INTERVAL_PRESETS.len() - 1;
            tracing::warn!("{e}; using \"{}\"", INTERVAL_PRESETS[last].label);
            &INTERVAL_PRESETS[last]
        })
    }
}
