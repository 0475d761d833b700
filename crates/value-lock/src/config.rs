//! Configuration for the value lock engine

use crate::domain::MAX_DURATION_MINUTES;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Maximum lock duration outside `1..=525600` minutes.
    #[error("Invalid max duration: {value} minutes (must be 1..={max})")]
    InvalidMaxDuration {
        /// Configured value
        value: u64,
        /// Hard upper bound
        max: u64,
    },

    /// An environment variable could not be parsed.
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
    },
}

/// Engine configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueLockConfig {
    /// Longest lock accepted by `create_deposit`, in minutes. May tighten
    /// but never exceed 365 days.
    pub max_duration_minutes: u64,
    /// Service name attached to logs.
    pub service_name: String,
}

impl Default for ValueLockConfig {
    fn default() -> Self {
        Self {
            max_duration_minutes: MAX_DURATION_MINUTES,
            service_name: "value-lock".to_string(),
        }
    }
}

impl ValueLockConfig {
    /// Load from `VL_MAX_DURATION_MINUTES` and `VL_SERVICE_NAME`, falling
    /// back to defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup("VL_MAX_DURATION_MINUTES") {
            config.max_duration_minutes =
                raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    key: "VL_MAX_DURATION_MINUTES",
                    value: raw.clone(),
                })?;
        }
        if let Some(name) = lookup("VL_SERVICE_NAME") {
            config.service_name = name;
        }
        config.validate()?;
        Ok(config)
    }

    /// Tighten the maximum lock duration.
    pub fn with_max_duration_minutes(mut self, minutes: u64) -> Self {
        self.max_duration_minutes = minutes;
        self
    }

    /// Reject a maximum duration of zero or above 365 days.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_duration_minutes == 0 || self.max_duration_minutes > MAX_DURATION_MINUTES {
            return Err(ConfigError::InvalidMaxDuration {
                value: self.max_duration_minutes,
                max: MAX_DURATION_MINUTES,
            });
        }
        Ok(())
    }
}
