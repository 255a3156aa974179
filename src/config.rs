//! Analytic defaults and feature switches
//!
//! Loaded from YAML, e.g.
//!
//! ```yaml
//! exposure_threshold_minutes: 120
//! careless_min_places: 10
//! companion_hops: 3
//! disabled_operations: [setHighRisk]
//! ```

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Defaults applied when a request omits its parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceConfig {
    /// Minimum overlap for an exposure to count
    pub exposure_threshold_minutes: i64,
    /// Places a sick person must exceed to be careless
    pub careless_min_places: usize,
    /// Layers walked by the healthy companion closure
    pub companion_hops: usize,
    /// Request names answered with `Unimplemented`
    pub disabled_operations: Vec<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            exposure_threshold_minutes: 120,
            careless_min_places: 10,
            companion_hops: 3,
            disabled_operations: Vec::new(),
        }
    }
}

impl TraceConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: TraceConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.exposure_threshold_minutes < 0 {
            return Err(ConfigError::Invalid {
                field: "exposure_threshold_minutes",
                reason: format!("must not be negative, got {}", self.exposure_threshold_minutes),
            });
        }
        self.exposure_threshold()?;
        if self.companion_hops == 0 {
            return Err(ConfigError::Invalid {
                field: "companion_hops",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Fails when the minutes do not fit in a `Duration`
    pub fn exposure_threshold(&self) -> ConfigResult<Duration> {
        let minutes = self.exposure_threshold_minutes;
        Duration::try_minutes(minutes).ok_or_else(|| ConfigError::Invalid {
            field: "exposure_threshold_minutes",
            reason: format!("out of range, got {}", minutes),
        })
    }

    /// Whether a request name is switched off
    pub fn is_disabled(&self, operation: &str) -> bool {
        self.disabled_operations.iter().any(|op| op == operation)
    }
}
