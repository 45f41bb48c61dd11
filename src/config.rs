//! Application configuration
//!
//! Stored as TOML under the user configuration directory
//! (`~/.config/speedrun-timer/config.toml` on Linux). A missing file is
//! created with defaults on first load.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::Intent;
use crate::error::{Result, TimerError};

const APP_DIR: &str = "speedrun-timer";
const CONFIG_FILE: &str = "config.toml";

const DEFAULT_REFRESH_RATE_HZ: u32 = 60;
const MAX_REFRESH_RATE_HZ: u32 = 1000;

/// Raw key names bound to each intent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub split: String,
    pub pause: String,
    pub stop: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            split: "Return".to_string(),
            pause: "Space".to_string(),
            stop: "BackSpace".to_string(),
        }
    }
}

impl KeyBindings {
    /// Map a key name to its intent, ignoring case
    pub fn intent_for(&self, key: &str) -> Option<Intent> {
        let key = key.trim();
        if key.eq_ignore_ascii_case(&self.split) {
            Some(Intent::Split)
        } else if key.eq_ignore_ascii_case(&self.pause) {
            Some(Intent::Pause)
        } else if key.eq_ignore_ascii_case(&self.stop) {
            Some(Intent::Stop)
        } else {
            None
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Run file opened most recently
    pub last_split_file: Option<PathBuf>,
    /// Display refresh rate
    pub refresh_rate_hz: u32,
    pub keys: KeyBindings,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            last_split_file: None,
            refresh_rate_hz: DEFAULT_REFRESH_RATE_HZ,
            keys: KeyBindings::default(),
        }
    }
}

impl TimerConfig {
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or(TimerError::NoConfigDir)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| TimerError::io(path, e))?;
        let config = Self::from_toml(&contents)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the config, writing a default one first if the file is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}; creating default", path.display());
            let config = Self::default();
            config.save(path)?;
            return Ok(config);
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| TimerError::io(parent, e))?;
        }
        fs::write(path, self.to_toml()?).map_err(|e| TimerError::io(path, e))
    }

    /// Interval between display refreshes
    pub fn refresh_interval(&self) -> Duration {
        let hz = self.refresh_rate_hz.clamp(1, MAX_REFRESH_RATE_HZ);
        Duration::from_secs(1) / hz
    }
}
