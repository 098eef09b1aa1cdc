mod config;
pub mod database;

pub use config::{ChimeConfig, Config, LockConfig, NotificationsConfig, ReminderConfig};
pub use database::{Database, COMPLETED_KEY};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the directory holding `config.toml` and `eyebreak.db`.
///
/// `EYEBREAK_CONFIG_DIR` wins if set. Otherwise `~/.config/eyebreak[-dev]/`,
/// with the `-dev` suffix when `EYEBREAK_ENV=dev`. The directory is created
/// if missing.
///
/// # Errors
/// Returns an error if no directory can be determined or created.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("EYEBREAK_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join(".config");
            let env = std::env::var("EYEBREAK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("eyebreak-dev")
            } else {
                base_dir.join("eyebreak")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
