//! TOML configuration for the dispatcher.
//!
//! Every field has a default, so an empty or partial file is valid. Tuning
//! values are taken as given; nonsensical values degrade behaviour (e.g. a
//! zero interval repeats every frame) rather than fail.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::controller::poller::PollerSettings;
use crate::controller::profile::Profile;
use crate::dispatch::consumer::ConsumerOptions;
use crate::dispatch::keys::KeyBindings;
use crate::dispatch::tracker::RepeatTiming;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "PADNAV_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct RepeatSettings {
    pub delay_ms: u64,
    pub interval_ms: u64,
}

impl Default for RepeatSettings {
    fn default() -> Self {
        Self {
            delay_ms: 400,
            interval_ms: 150,
        }
    }
}

impl From<RepeatSettings> for RepeatTiming {
    fn from(settings: RepeatSettings) -> Self {
        RepeatTiming::from_millis(settings.delay_ms, settings.interval_ms)
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Poll period; one tick per frame
    pub frame_interval_ms: u64,
    pub repeat: RepeatSettings,
    pub profile: Profile,
    pub keys: KeyBindings,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            repeat: RepeatSettings::default(),
            profile: Profile::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl DispatcherConfig {
    /// `$PADNAV_CONFIG`, else `<config dir>/padnav/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("padnav").join("config.toml"))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Loads `path`, falling back to defaults when the file does not exist
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => {
                info!("Loading config from {}", path.display());
                Self::load(path)
            }
            Some(path) => {
                info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                info!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn poller_settings(&self) -> PollerSettings {
        PollerSettings {
            frame_interval_ms: self.frame_interval_ms,
        }
    }

    /// Consumer options sharing this config's profile and repeat timing
    pub fn consumer_options(&self, label: impl Into<String>) -> ConsumerOptions {
        ConsumerOptions {
            label: label.into(),
            repeat: self.repeat.into(),
            profile: self.profile.clone(),
        }
    }
}
