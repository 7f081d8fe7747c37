use thiserror::Error;

/// Core error type shared across Zonalyss crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The verification configuration violates internal invariants.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// An unknown geographic level was requested.
    #[error("unknown level: {0}")]
    UnknownLevel(String),
}

/// Convenience alias for results returned by Zonalyss crates.
pub type Result<T> = std::result::Result<T, Error>;
