//! Error types shared across the crate.
//!
//! Producer, loader and sink failures are user-defined and pass through these
//! containers unchanged; only configuration problems have a dedicated type.

use core::fmt;

/// The error type for invalid configuration.
///
/// Constructors that take a configuration validate it up front, so a bad value
/// is reported when the pool or batcher is built rather than on first use.
#[derive(Debug)]
pub enum ConfigError {
    /// `batch_size` was zero; a batcher could never fill a batch.
    ZeroBatchSize,
    /// `max_idle` was zero; a pool could never retain an object.
    ZeroMaxIdle,
    /// More objects were requested up front than the pool may keep idle.
    PrefillExceedsMaxIdle {
        /// Requested number of prefilled objects.
        prefill: usize,
        /// Configured idle limit.
        max_idle: usize,
    },
    /// The configuration document could not be parsed.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroBatchSize => f.write_str("batch size must be greater than zero"),
            ConfigError::ZeroMaxIdle => f.write_str("pool max_idle must be greater than zero"),
            ConfigError::PrefillExceedsMaxIdle { prefill, max_idle } => write!(
                f,
                "pool prefill ({prefill}) exceeds max_idle ({max_idle})"
            ),
            ConfigError::Parse(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// A batch that a sink refused.
///
/// The batch is handed back together with the sink's error so the caller can
/// retry, reroute or drop it explicitly. Nothing is discarded silently.
pub struct FlushError<T, E> {
    error: E,
    batch: Vec<T>,
}

impl<T, E> FlushError<T, E> {
    pub(crate) fn new(error: E, batch: Vec<T>) -> Self {
        Self { error, batch }
    }

    /// The error reported by the sink.
    #[inline]
    pub fn error(&self) -> &E {
        &self.error
    }

    /// The items that were not written.
    #[inline]
    pub fn batch(&self) -> &[T] {
        &self.batch
    }

    /// Takes back the unwritten items.
    #[inline]
    pub fn into_batch(self) -> Vec<T> {
        self.batch
    }

    /// Splits into the sink error and the unwritten items.
    #[inline]
    pub fn into_parts(self) -> (E, Vec<T>) {
        (self.error, self.batch)
    }
}

impl<T, E: fmt::Debug> fmt::Debug for FlushError<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlushError")
            .field("error", &self.error)
            .field("batch_len", &self.batch.len())
            .finish()
    }
}

impl<T, E: fmt::Display> fmt::Display for FlushError<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to write batch of {} items: {}",
            self.batch.len(),
            self.error
        )
    }
}

impl<T, E> std::error::Error for FlushError<T, E>
where
    E: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
