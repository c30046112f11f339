use std::path::Path;

use diamond_timelock::{TimelockConfig, DEFAULT_HISTORY_LIMIT, DEFAULT_REVERT_WINDOW_SECS};
use diamond_types::{FacetAddress, Selector, INIT_SELECTOR, SECONDS_PER_DAY};
use serde::{Deserialize, Serialize};

/// Events kept in the registry's log before the oldest are dropped.
pub const DEFAULT_EVENT_CAPACITY: usize = 4096;

/// Configuration errors. Parse failures keep the parser's message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(String),

    #[error("invalid {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error("unsupported config extension: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Registry settings.
///
/// Missing fields fall back to [`RegistryConfig::default`], except that a
/// usable config always needs a non-zero governor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// The only account allowed to mutate the registry.
    pub governor: FacetAddress,
    /// How long after a Replace commit the previous binding can be restored.
    pub revert_window_secs: u64,
    /// Selector rejected in Add entries.
    pub init_selector: Selector,
    /// Finished queue entries retained for inspection.
    pub history_limit: usize,
    pub event_capacity: usize,
    pub timelock: TimelockConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            governor: FacetAddress::ZERO,
            revert_window_secs: DEFAULT_REVERT_WINDOW_SECS,
            init_selector: INIT_SELECTOR,
            history_limit: DEFAULT_HISTORY_LIMIT,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            timelock: TimelockConfig::default(),
        }
    }
}

impl RegistryConfig {
    pub fn new(governor: FacetAddress) -> Self {
        Self {
            governor,
            ..Self::default()
        }
    }

    /// Timelock disabled: queued cuts can be committed immediately.
    pub fn development(governor: FacetAddress) -> Self {
        Self {
            timelock: TimelockConfig::disabled(),
            ..Self::new(governor)
        }
    }

    /// One-day timelock with the standard 30-day revert window.
    pub fn production(governor: FacetAddress) -> Self {
        Self {
            timelock: TimelockConfig::new(true, SECONDS_PER_DAY),
            ..Self::new(governor)
        }
    }

    pub fn with_timelock(mut self, timelock: TimelockConfig) -> Self {
        self.timelock = timelock;
        self
    }

    pub fn with_revert_window(mut self, secs: u64) -> Self {
        self.revert_window_secs = secs;
        self
    }

    pub fn with_init_selector(mut self, selector: Selector) -> Self {
        self.init_selector = selector;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.governor.is_zero() {
            return Err(ConfigError::Invalid(
                "governor must be a non-zero address".into(),
            ));
        }
        if self.revert_window_secs == 0 {
            return Err(ConfigError::Invalid(
                "revert_window_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse {
            format: "toml",
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(|e| ConfigError::Parse {
            format: "json",
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Parse {
            format: "toml",
            message: e.to_string(),
        })
    }
}
