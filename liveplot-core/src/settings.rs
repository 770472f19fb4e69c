use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CLOCK_INTERVAL_SECONDS: f64 = 0.1;
pub const DEFAULT_DATA_CAPACITY: usize = 50;
pub const DEFAULT_WARMUP_SECONDS: f64 = 5.0;
pub const DEFAULT_STATE_POLL_SECONDS: f64 = 2.0;
pub const DEFAULT_SHUTDOWN_GRACE_SECONDS: f64 = 1.0;
pub const DEFAULT_BROADCAST_INTERVAL_SECONDS: f64 = 0.005;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to write settings file '{path}': {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Agent construction parameters. Every field is optional in files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Renderer loop tick.
    pub clock_interval_seconds: f64,
    /// Emit lifecycle diagnostics.
    pub verbose: bool,
    /// Slots in the Data channel.
    pub data_capacity: usize,
    /// Time a provider thread pulls unconditionally after its window is created.
    pub warmup_seconds: f64,
    /// Period of the state poller.
    pub state_poll_seconds: f64,
    /// Wait between the terminate command and forced teardown.
    pub shutdown_grace_seconds: f64,
    /// Minimum spacing between two Data channel publications.
    pub broadcast_interval_seconds: f64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            clock_interval_seconds: DEFAULT_CLOCK_INTERVAL_SECONDS,
            verbose: false,
            data_capacity: DEFAULT_DATA_CAPACITY,
            warmup_seconds: DEFAULT_WARMUP_SECONDS,
            state_poll_seconds: DEFAULT_STATE_POLL_SECONDS,
            shutdown_grace_seconds: DEFAULT_SHUTDOWN_GRACE_SECONDS,
            broadcast_interval_seconds: DEFAULT_BROADCAST_INTERVAL_SECONDS,
        }
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn non_negative_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

impl AgentSettings {
    pub fn with_clock(mut self, seconds: f64) -> Self {
        self.clock_interval_seconds = seconds;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Replaces unusable values with defaults.
    pub fn normalized(mut self) -> Self {
        self.clock_interval_seconds =
            positive_or(self.clock_interval_seconds, DEFAULT_CLOCK_INTERVAL_SECONDS);
        self.data_capacity = self.data_capacity.max(1);
        self.warmup_seconds = non_negative_or(self.warmup_seconds, DEFAULT_WARMUP_SECONDS);
        self.state_poll_seconds =
            positive_or(self.state_poll_seconds, DEFAULT_STATE_POLL_SECONDS);
        self.shutdown_grace_seconds =
            non_negative_or(self.shutdown_grace_seconds, DEFAULT_SHUTDOWN_GRACE_SECONDS);
        self.broadcast_interval_seconds = non_negative_or(
            self.broadcast_interval_seconds,
            DEFAULT_BROADCAST_INTERVAL_SECONDS,
        );
        self
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_secs_f64(self.clock_interval_seconds)
    }

    pub fn warmup(&self) -> Duration {
        Duration::from_secs_f64(self.warmup_seconds)
    }

    pub fn state_poll_interval(&self) -> Duration {
        Duration::from_secs_f64(self.state_poll_seconds)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs_f64(self.shutdown_grace_seconds)
    }

    pub fn broadcast_interval(&self) -> Duration {
        Duration::from_secs_f64(self.broadcast_interval_seconds)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("json")
}

/// Reads settings from a `.json` file or, for any other extension, TOML.
pub fn load_settings_file(path: &Path) -> Result<AgentSettings, SettingsError> {
    let data = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let settings: AgentSettings = if is_json(path) {
        serde_json::from_str(&data)?
    } else {
        toml::from_str(&data)?
    };
    Ok(settings.normalized())
}

pub fn save_settings_file(path: &Path, settings: &AgentSettings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let data = if is_json(path) {
        serde_json::to_string_pretty(settings)?
    } else {
        settings.to_toml_string()?
    };
    std::fs::write(path, data).map_err(|source| SettingsError::Write {
        path: path.display().to_string(),
        source,
    })
}
