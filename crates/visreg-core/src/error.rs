//! Unified error types for visreg

use thiserror::Error;

/// Failure reported by the diffing engine.
///
/// The message is carried verbatim so it can surface to the test unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Check whether the engine message mentions `needle`
    pub fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle)
    }
}

/// Unified error type for all visreg operations
#[derive(Error, Debug)]
pub enum VisregError {
    // Caller errors
    #[error("A unique screenshot name was not provided!")]
    MissingScreenshotName,

    // Comparison errors
    #[error("Expected screenshots to match.\nScreenshots have mismatch of {percent:.2} percent!")]
    Mismatch { percent: f64 },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Invalid diff report: {0}")]
    InvalidDiffReport(String),

    // Browser errors
    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Browser error: {0}")]
    Browser(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using VisregError
pub type Result<T> = std::result::Result<T, VisregError>;
