//! E-invoice lifecycle error types.

use thiserror::Error;
use uuid::Uuid;

use gstbooks_shared::AppError;

use crate::gateway::GatewayError;
use crate::queue::QueueError;
use crate::storage::StorageError;

use super::status::EInvoiceStatus;

/// Errors that can occur during e-invoice lifecycle operations.
#[derive(Debug, Error)]
pub enum EInvoiceError {
    /// Invoice not found by id.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// No invoice holds the given IRN.
    #[error("Invoice not found for IRN: {0}")]
    InvoiceNotFoundForIrn(String),

    /// The invoice number is already taken.
    #[error("Invoice number already exists: {0}")]
    DuplicateInvoiceNumber(String),

    /// The requested lifecycle transition is not allowed.
    #[error("Invalid e-invoice transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status.
        from: EInvoiceStatus,
        /// Requested status.
        to: EInvoiceStatus,
    },

    /// The status string is not a known lifecycle state.
    #[error("Unknown e-invoice status: {0}")]
    UnknownStatus(String),

    /// The authority accepted the submission but assigned no IRN.
    #[error("Authority returned no IRN (status: {status})")]
    IrnNotAssigned {
        /// Status the authority reported instead.
        status: String,
    },

    /// Gateway failure; the invoice stays in its pre-submission state.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Object storage failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Work queue failure.
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl EInvoiceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::InvoiceNotFoundForIrn(_) => "INVOICE_NOT_FOUND_FOR_IRN",
            Self::DuplicateInvoiceNumber(_) => "DUPLICATE_INVOICE_NUMBER",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::UnknownStatus(_) => "UNKNOWN_STATUS",
            Self::IrnNotAssigned { .. } => "IRN_NOT_ASSIGNED",
            Self::Gateway(_) => "GATEWAY_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Queue(_) => "QUEUE_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<EInvoiceError> for AppError {
    fn from(err: EInvoiceError) -> Self {
        match err {
            EInvoiceError::InvoiceNotFound(_) | EInvoiceError::InvoiceNotFoundForIrn(_) => {
                Self::NotFound(err.to_string())
            }
            EInvoiceError::DuplicateInvoiceNumber(_) => Self::Conflict(err.to_string()),
            EInvoiceError::InvalidTransition { .. }
            | EInvoiceError::UnknownStatus(_)
            | EInvoiceError::IrnNotAssigned { .. } => Self::Validation(err.to_string()),
            EInvoiceError::Gateway(gateway) => gateway.into(),
            EInvoiceError::Storage(storage) => Self::Configuration(storage.to_string()),
            EInvoiceError::Queue(queue) => Self::Internal(queue.to_string()),
            EInvoiceError::Database(msg) => Self::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EInvoiceError::InvoiceNotFoundForIrn("IRN-1".into()).error_code(),
            "INVOICE_NOT_FOUND_FOR_IRN"
        );
        assert_eq!(
            EInvoiceError::InvalidTransition {
                from: EInvoiceStatus::Valid,
                to: EInvoiceStatus::Draft,
            }
            .error_code(),
            "INVALID_TRANSITION"
        );
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = EInvoiceError::DuplicateInvoiceNumber("INV-1".into()).into();
        assert_eq!(app.error_code(), "CONFLICT");

        let app: AppError = EInvoiceError::Gateway(GatewayError::SubmissionFailed {
            attempts: 3,
            last: "timeout".into(),
        })
        .into();
        assert_eq!(app.error_code(), "TRANSPORT_ERROR");
    }
}
