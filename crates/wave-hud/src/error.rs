//! Error types for the HUD client

use thiserror::Error;

/// Errors raised by the HUD client
#[derive(Error, Debug)]
pub enum HudError {
    /// An inbound bridge payload didn't match the update shape
    #[error("Invalid HUD payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for HUD operations
pub type Result<T> = std::result::Result<T, HudError>;
