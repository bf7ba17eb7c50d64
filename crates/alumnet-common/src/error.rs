//! Error types for Alumnet

use thiserror::Error;

/// Result type alias for Alumnet operations
pub type Result<T> = std::result::Result<T, AlumnetError>;

/// Main error type for Alumnet
#[derive(Error, Debug)]
pub enum AlumnetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Institution not found: {0}")]
    InstitutionNotFound(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
