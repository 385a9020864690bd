//! Webhook guard error types.

use thiserror::Error;

use gstbooks_shared::AppError;

/// Errors raised by the webhook ingress guard.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    /// The callback carried no nonce.
    #[error("Missing nonce")]
    MissingNonce,

    /// The nonce was already consumed by an earlier callback.
    #[error("Nonce already used")]
    ReplayedNonce,

    /// The timestamp could not be parsed.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// The timestamp is outside the acceptance window.
    #[error("Timestamp out of acceptable range: skew of {skew_secs}s")]
    TimestampOutOfWindow {
        /// Absolute skew from now, in seconds.
        skew_secs: i64,
    },

    /// The signature is absent or does not match the canonical string.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The nonce store failed.
    #[error("Nonce store error: {0}")]
    Store(String),
}

impl From<WebhookError> for AppError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::ReplayedNonce => Self::Conflict(err.to_string()),
            WebhookError::MissingNonce
            | WebhookError::InvalidTimestamp(_)
            | WebhookError::TimestampOutOfWindow { .. }
            | WebhookError::InvalidSignature => Self::Validation(err.to_string()),
            WebhookError::Store(msg) => Self::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_maps_to_conflict() {
        let app: AppError = WebhookError::ReplayedNonce.into();
        assert_eq!(app.error_code(), "CONFLICT");
    }

    #[test]
    fn test_signature_maps_to_validation() {
        let app: AppError = WebhookError::InvalidSignature.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
        assert!(!app.is_retriable());
    }
}
