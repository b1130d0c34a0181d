//! Configuration file support for Gym Buddy.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/gym-buddy/config.toml`.
//! Every field is optional.

use crate::persistence::WritePolicy;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub timers: TimerConfig,

    #[serde(default)]
    pub persistence: PersistenceConfig,

    #[serde(default)]
    pub feedback: FeedbackConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Timer tick configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Milliseconds per timer unit
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
        }
    }
}

impl TimerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Snapshot write configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct PersistenceConfig {
    /// Coalescing window for snapshot writes; 0 writes on every mutation
    #[serde(default)]
    pub coalesce_ms: u64,
}

impl PersistenceConfig {
    pub fn write_policy(&self) -> WritePolicy {
        WritePolicy::from_millis(self.coalesce_ms)
    }
}

/// Which feedback channels fire
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedbackConfig {
    #[serde(default = "default_true")]
    pub sound: bool,

    #[serde(default = "default_true")]
    pub vibration: bool,

    #[serde(default = "default_true")]
    pub notifications: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            sound: true,
            vibration: true,
            notifications: true,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("gym-buddy")
}

fn default_tick_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("gym-buddy").join("config.toml")
    }

    /// Reject values the timers cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.timers.tick_ms == 0 {
            return Err(Error::Config("timers.tick_ms must be greater than 0".into()));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
