//! Error handling module for Avidia
//!
//! Provides centralized error handling with proper error types using thiserror.
//! User cancellation is never an error: widgets report it as `None` and wizards
//! as `WizardOutcome::Cancelled`. Tool failures are values too (see
//! `process_runner::ProcessResult`). What remains here are the conditions that
//! stop an operation outright.

use thiserror::Error;

/// Main error type for Avidia
#[derive(Error, Debug)]
pub enum AvidiaError {
    /// IO errors (file operations, terminal, pipes)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Startup environment errors (SDK directory, tool executables)
    #[error("Environment error: {0}")]
    Environment(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Process orchestration errors that are not plain exit codes
    #[error("Process error: {0}")]
    Process(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for Avidia operations
pub type Result<T> = std::result::Result<T, AvidiaError>;

impl AvidiaError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an environment error
    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a process error
    pub fn process(msg: impl Into<String>) -> Self {
        Self::Process(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AvidiaError::config("page_size must be at least 1");
        assert_eq!(
            err.to_string(),
            "Configuration error: page_size must be at least 1"
        );

        let err = AvidiaError::environment("SDK directory not found: /opt/sdk");
        assert_eq!(
            err.to_string(),
            "Environment error: SDK directory not found: /opt/sdk"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: AvidiaError = io_err.into();
        assert!(matches!(err, AvidiaError::Io(_)));
    }

    #[test]
    fn test_error_constructors() {
        let err = AvidiaError::terminal("raw mode unavailable");
        assert!(matches!(err, AvidiaError::Terminal(_)));

        let err = AvidiaError::process("stdin already closed");
        assert!(matches!(err, AvidiaError::Process(_)));

        let err = AvidiaError::general("something odd");
        assert_eq!(err.to_string(), "something odd");
    }
}
