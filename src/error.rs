//! Error types for the network engine.

use thiserror::Error;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Error, Debug)]
pub enum NetError {
    /// Malformed topology handed to a constructor or training policy.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A vector whose length does not match the network's input or output width.
    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A weight file that ended early or carries out-of-range fields.
    #[error("corrupt network file: {0}")]
    CorruptFile(String),

    /// A well-formed weight file whose topology differs from the receiving network.
    #[error("topology mismatch: {0}")]
    TopologyMismatch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        NetError::Configuration(msg.into())
    }

    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        NetError::CorruptFile(msg.into())
    }
}
