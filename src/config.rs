//! Settings management module
//!
//! Handles the optional settings file and the environment variables that
//! locate it. Every field has a default so an absent file, an empty object or
//! a partial object are all valid.

use crate::error::{AvidiaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit settings file
pub const SETTINGS_ENV: &str = "AVIDIA_SETTINGS";

/// Tunables loaded once at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Rows per page in selection lists
    pub page_size: usize,
    /// Line written to the package installer's license prompts
    pub license_answer: String,
    /// Interval between license answers, in milliseconds
    pub license_interval_ms: u64,
    /// Memory given to a started emulator, in MB
    pub emulator_memory_mb: u32,
    /// SD card size used when the user leaves the field empty
    pub default_sdcard_mb: u32,
    /// Time a stopped emulator gets between SIGTERM and SIGKILL
    pub stop_grace_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page_size: 15,
            license_answer: "y".to_string(),
            license_interval_ms: 1000,
            emulator_memory_mb: 4096,
            default_sdcard_mb: 512,
            stop_grace_ms: 3000,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load from `AVIDIA_SETTINGS` or the default location, falling back to
    /// defaults when no file exists there.
    ///
    /// An explicitly named file that is missing is an error; the default
    /// location is optional.
    pub fn load() -> Result<Self> {
        if let Some(explicit) = std::env::var_os(SETTINGS_ENV) {
            let path = PathBuf::from(explicit);
            if !path.is_file() {
                return Err(AvidiaError::config(format!(
                    "{} points to {}, which is not a file",
                    SETTINGS_ENV,
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        match default_settings_path() {
            Some(path) if path.is_file() => Self::load_from_file(path),
            _ => {
                tracing::debug!("no settings file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate value ranges
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(AvidiaError::config("page_size must be at least 1"));
        }
        if self.license_answer.contains('\n') {
            return Err(AvidiaError::config(
                "license_answer must be a single line",
            ));
        }
        if self.license_interval_ms == 0 {
            return Err(AvidiaError::config(
                "license_interval_ms must be greater than zero",
            ));
        }
        if self.emulator_memory_mb == 0 {
            return Err(AvidiaError::config(
                "emulator_memory_mb must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn license_interval(&self) -> Duration {
        Duration::from_millis(self.license_interval_ms)
    }

    pub fn stop_grace(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms)
    }
}

/// `$XDG_CONFIG_HOME/avidia/settings.json`, else `~/.config/avidia/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("avidia").join("settings.json"))
}
