//! Error types for menugate

use thiserror::Error;

/// The main error type for menugate operations.
///
/// Only writes and construction surface errors; authorization itself never fails.
#[derive(Debug, Error)]
pub enum MenuGateError {
    #[error("storage error: {0}")]
    Storage(#[from] heed::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed permission record: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("unknown menu key `{0}`")]
    UnknownMenuKey(String),

    #[error("invalid role identifier `{0}`")]
    InvalidRole(String),
}

/// Result type alias for menugate operations
pub type Result<T> = std::result::Result<T, MenuGateError>;
