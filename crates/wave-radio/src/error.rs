//! Error types for Wave Radio

use thiserror::Error;

/// Main error type for Wave Radio operations
#[derive(Error, Debug)]
pub enum RadioError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// Extraction tool errors
    #[error("Extractor error: {0}")]
    Extractor(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Wave Radio operations
pub type Result<T> = std::result::Result<T, RadioError>;
