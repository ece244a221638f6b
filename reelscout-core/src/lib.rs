//! Reelscout Core - Shared building blocks for the movie search proxy
//!
//! This crate provides what every other Reelscout crate leans on: centralized
//! configuration, the runtime mode switch, tracing setup, and the movie
//! database wire types shared by the proxy and its clients.

pub mod config;
pub mod mode;
pub mod tracing_setup;
pub mod types;

// Re-export main types for convenient access
pub use config::{ConfigError, ReelscoutConfig};
pub use mode::RuntimeMode;
pub use types::{MovieDetail, MovieSummary, SearchPayload};

/// Core errors that can bubble up from any Reelscout subsystem.
///
/// High-level error types representing failures surfaced to the binary.
#[derive(Debug, thiserror::Error)]
pub enum ReelscoutError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {reason}")]
    Server { reason: String },
}

impl ReelscoutError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            ReelscoutError::Configuration(ConfigError::MissingApiKey { variable }) => {
                format!("No movie database API key configured, set {variable}")
            }
            ReelscoutError::Configuration(e) => format!("Invalid configuration: {e}"),
            ReelscoutError::Io(_) => "File system or network error occurred".to_string(),
            ReelscoutError::Server { reason } => format!("Server failed: {reason}"),
        }
    }

    /// Checks if this error is due to user input or environment setup.
    pub fn is_user_error(&self) -> bool {
        matches!(self, ReelscoutError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, ReelscoutError>;
