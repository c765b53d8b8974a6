use thiserror::Error;

/// Top-level error type for Playwatch.
#[derive(Debug, Error)]
pub enum PlaywatchError {
    /// A status source could not produce a snapshot (network, timeout, bad payload).
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Missing or malformed configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A status transition could not be rendered.
    #[error("format error: {0}")]
    Format(String),

    /// Error from a messaging channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
