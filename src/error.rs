//! Error types and handling for the `nearcast` service

use thiserror::Error;

/// Main error type for the `nearcast` service
#[derive(Error, Debug)]
pub enum NearcastError {
    /// Configuration-related errors (missing API key, bad env values)
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors, detected before any upstream call
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// An upstream provider returned a non-success status or rejected the request
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// Transport-level failures talking to an upstream (timeouts, connect
    /// errors, malformed payloads)
    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl NearcastError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// True for errors caused by the caller's input rather than the service
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Get a user-facing error message. Upstream details are logged, never
    /// echoed back to the caller.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            NearcastError::Config { .. } => {
                "Service is misconfigured. Please check the server configuration.".to_string()
            }
            NearcastError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            NearcastError::Upstream { .. } | NearcastError::Http { .. } => {
                "Unable to reach upstream services. Please try again later.".to_string()
            }
            NearcastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
