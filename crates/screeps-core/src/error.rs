//! Error types for exporter configuration.

use thiserror::Error;

/// Result type alias for configuration loading and validation.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Startup configuration errors. These are the only fatal errors in the
/// exporter; they are raised before the collection loop starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no API token configured")]
    MissingToken,

    #[error("no shard configured")]
    NoShards,

    #[error("invalid config: {0}")]
    Invalid(String),
}
