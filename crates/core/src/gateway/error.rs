//! Gateway error types.

use thiserror::Error;

use gstbooks_shared::AppError;

/// Errors that can occur during gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Every transport attempt failed; wraps the last error.
    #[error("Gateway submission failed after {attempts} attempts: {last}")]
    SubmissionFailed {
        /// Number of attempts made.
        attempts: u32,
        /// The last transport error.
        last: String,
    },

    /// The payload could not be serialized.
    #[error("Payload serialization failed: {0}")]
    Serialization(String),

    /// The authority answered 2xx with a body the client cannot read.
    #[error("Malformed authority response: {0}")]
    MalformedResponse(String),

    /// The client could not be constructed from its configuration.
    #[error("Gateway client configuration failed: {0}")]
    Configuration(String),
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::SubmissionFailed { .. } => Self::Transport(err.to_string()),
            GatewayError::Serialization(_) | GatewayError::MalformedResponse(_) => {
                Self::Internal(err.to_string())
            }
            GatewayError::Configuration(msg) => Self::Configuration(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_failure_is_transport() {
        let app: AppError = GatewayError::SubmissionFailed {
            attempts: 3,
            last: "connection refused".to_string(),
        }
        .into();
        assert_eq!(app.error_code(), "TRANSPORT_ERROR");
        assert!(app.is_retriable());
    }

    #[test]
    fn test_display_carries_attempts() {
        let err = GatewayError::SubmissionFailed {
            attempts: 3,
            last: "timeout".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Gateway submission failed after 3 attempts: timeout"
        );
    }
}
