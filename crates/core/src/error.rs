//! Core error types

use thiserror::Error;

/// Core error type for AlgoForge
#[derive(Debug, Error)]
pub enum CoreError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration value outside its accepted domain
    #[error("Invalid configuration for {field}: {reason}")]
    Config { field: String, reason: String },
}

pub type Error = CoreError;
pub type Result<T> = std::result::Result<T, CoreError>;
