//! Application-wide error types.
//!
//! Domain modules carry their own error enums; `AppError` is the envelope
//! an embedding layer (HTTP, CLI, worker) maps them into. The taxonomy
//! follows three families: validation errors are local and non-retriable,
//! transport errors are retried then surfaced, configuration errors fail
//! fast.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Access denied.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error: no partial state was committed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict with existing state (duplicate invoice number, replayed nonce).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transport failure talking to an external authority, after retries.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Component configuration is unusable; fail fast.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if retrying the same operation could succeed.
    ///
    /// Validation and conflict errors never become valid on retry; only
    /// transport-family failures are worth another attempt.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Unauthorized(String::new()).error_code(),
            "UNAUTHORIZED"
        );
        assert_eq!(AppError::Forbidden(String::new()).error_code(), "FORBIDDEN");
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(
            AppError::Transport(String::new()).error_code(),
            "TRANSPORT_ERROR"
        );
        assert_eq!(
            AppError::Configuration(String::new()).error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(
            AppError::Database(String::new()).error_code(),
            "DATABASE_ERROR"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_retriable_errors() {
        assert!(AppError::Transport("timeout".into()).is_retriable());
        assert!(!AppError::Validation("unbalanced".into()).is_retriable());
        assert!(!AppError::Conflict("nonce".into()).is_retriable());
        assert!(!AppError::Configuration("no bucket".into()).is_retriable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::Transport("msg".into()).to_string(),
            "Transport error: msg"
        );
    }
}
