//! Ledger error types for validation and state errors.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use gstbooks_shared::AppError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Journal must have at least 2 lines.
    #[error("Journal must have at least 2 lines")]
    InsufficientLines,

    /// Journal is not balanced (debits != credits at 2-decimal precision).
    #[error("Journal not balanced: debits must equal credits. Debit: {debit}, Credit: {credit}")]
    UnbalancedJournal {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Line amounts cannot be negative.
    #[error("Ledger line amounts cannot be negative")]
    NegativeAmount,

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    JournalNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::UnbalancedJournal { .. } => "UNBALANCED_JOURNAL",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::JournalNotFound(_) => "JOURNAL_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientLines
            | LedgerError::UnbalancedJournal { .. }
            | LedgerError::NegativeAmount => Self::Validation(err.to_string()),
            LedgerError::AccountNotFound(_) | LedgerError::JournalNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            LedgerError::Database(msg) => Self::Database(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            LedgerError::InsufficientLines.error_code(),
            "INSUFFICIENT_LINES"
        );
        assert_eq!(
            LedgerError::UnbalancedJournal {
                debit: dec!(100),
                credit: dec!(90),
            }
            .error_code(),
            "UNBALANCED_JOURNAL"
        );
    }

    #[test]
    fn test_display_carries_totals() {
        let err = LedgerError::UnbalancedJournal {
            debit: dec!(100.00),
            credit: dec!(90.00),
        };
        assert_eq!(
            err.to_string(),
            "Journal not balanced: debits must equal credits. Debit: 100.00, Credit: 90.00"
        );
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = LedgerError::InsufficientLines.into();
        assert_eq!(app.error_code(), "VALIDATION_ERROR");

        let app: AppError = LedgerError::AccountNotFound(Uuid::nil()).into();
        assert_eq!(app.error_code(), "NOT_FOUND");

        let app: AppError = LedgerError::Database("boom".into()).into();
        assert_eq!(app.error_code(), "DATABASE_ERROR");
    }
}
