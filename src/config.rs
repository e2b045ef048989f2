//! Construction-time configuration.
//!
//! All knobs are plain data with `serde` support so they can be embedded in a
//! host application's own configuration file. Missing fields take their
//! defaults.

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Default number of items a batcher accumulates before writing.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Default number of idle objects a pool keeps for reuse.
pub const DEFAULT_MAX_IDLE: usize = 64;

fn parse<T>(json: &str) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    Ok(serde_json::from_str(json)?)
}

/// Sizing for maps and caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of entries to reserve up front.
    pub initial_capacity: usize,
}

impl CacheConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = parse(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Every capacity is valid, including zero.
    ///
    /// # Errors
    /// Never fails; present for symmetry with the other configs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Limits for [`ObjectPool`](crate::pool::ObjectPool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of idle objects retained; returns beyond this are dropped.
    pub max_idle: usize,
    /// Number of objects created eagerly at construction.
    pub prefill: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle: DEFAULT_MAX_IDLE,
            prefill: 0,
        }
    }
}

impl PoolConfig {
    /// Parses and validates a configuration from JSON.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the document is malformed or invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = parse(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the limits for consistency.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroMaxIdle`] or
    /// [`ConfigError::PrefillExceedsMaxIdle`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_idle == 0 {
            return Err(ConfigError::ZeroMaxIdle);
        }
        if self.prefill > self.max_idle {
            return Err(ConfigError::PrefillExceedsMaxIdle {
                prefill: self.prefill,
                max_idle: self.max_idle,
            });
        }
        Ok(())
    }
}

/// Limits for [`Batcher`](crate::batch::Batcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of pending items that triggers a write.
    pub batch_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl BatchConfig {
    /// Convenience constructor.
    pub const fn with_batch_size(batch_size: usize) -> Self {
        Self { batch_size }
    }

    /// Parses and validates a configuration from JSON.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the document is malformed or invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = parse(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns [`ConfigError::ZeroBatchSize`] if `batch_size` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }
}
