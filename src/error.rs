//! Error types for Modgen
//!
//! This module defines the error taxonomy shared by the project store,
//! the structured prompt client, and configuration loading, using
//! `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Modgen operations
///
/// Every failure is raised at the point of detection. Callers match on the
/// variant to present a user-facing message.
#[derive(Error, Debug)]
pub enum ModgenError {
    /// Project name produced an empty slug
    #[error("Invalid project name: {0}")]
    InvalidName(String),

    /// Create without overwrite targeted an existing project
    #[error("Project '{0}' already exists")]
    AlreadyExists(String),

    /// Load targeted a project directory that does not exist
    #[error("Project '{0}' does not exist")]
    NotFound(String),

    /// Project directory exists but its metadata document is absent or incomplete
    #[error("Project not initialized: {0}")]
    NotInitialized(String),

    /// Metadata could not be encoded, or a stored document could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A prompt or prompt message was constructed with invalid data
    #[error("Prompt validation error: {0}")]
    PromptValidation(String),

    /// Transport failure, error status, or a non-JSON response body
    #[error("API error: {message}")]
    Api {
        /// Human readable summary
        message: String,
        /// HTTP status code, absent for transport failures
        status_code: Option<u16>,
        /// Raw response body (or transport diagnostic) for debugging
        payload: Option<String>,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModgenError {
    /// Build an API error from its parts
    ///
    /// # Examples
    ///
    /// ```
    /// use modgen::error::ModgenError;
    ///
    /// let err = ModgenError::api("boom", Some(500), Some("{}".to_string()));
    /// assert_eq!(err.status_code(), Some(500));
    /// ```
    pub fn api(
        message: impl Into<String>,
        status_code: Option<u16>,
        payload: Option<String>,
    ) -> Self {
        Self::Api {
            message: message.into(),
            status_code,
            payload,
        }
    }

    /// HTTP status code carried by an API error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Raw payload carried by an API error, if any
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Api { payload, .. } => payload.as_deref(),
            _ => None,
        }
    }
}

/// Result type alias for Modgen operations
pub type Result<T> = std::result::Result<T, ModgenError>;
