//! Error types for the correlation analysis engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for engine operations
///
/// Numeric failures inside the analyzers are not errors: they degrade to
/// neutral sub-measure values. Only the fallible edges of the crate
/// (input construction, configuration) surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// Metric series violates an input invariant
    #[error("Invalid metric series: {0}")]
    InvalidSeries(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
