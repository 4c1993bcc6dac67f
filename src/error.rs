//! Unified error types for the item service.

use thiserror::Error;

/// Startup and wiring errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Item store errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No item with the given id.
    #[error("item {id} not found")]
    NotFound {
        /// The id that was looked up.
        id: String,
    },

    /// The backing storage can no longer be used (e.g. a poisoned lock).
    #[error("item store unavailable")]
    Unavailable,
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
