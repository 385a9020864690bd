//! FX realization repository.
//!
//! A settlement realizes in one transaction: sum the invoice, convert the
//! total into the settlement currency, record the immutable realization
//! row, and post the balancing journal entry against the FX gain/loss
//! account. A missing rate aborts the whole settlement — money is never
//! booked off an unconverted amount.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use gstbooks_core::fx::{self, FX_GAIN_LOSS_ACCOUNT};
use gstbooks_core::ledger::{AccountType, CreateJournalInput, LedgerError};

use crate::entities::{accounts, fx_realizations, invoice_lines, invoices};

use super::currency::{CurrencyError, convert_on};
use super::journal::post_journal_on;

/// Error types for FX realization.
#[derive(Debug, thiserror::Error)]
pub enum FxError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Rate lookup or conversion failed; nothing was booked.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// The realization posting failed ledger validation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result of a settlement realization.
#[derive(Debug)]
pub struct FxOutcome {
    /// The immutable realization row.
    pub realization: fx_realizations::Model,
    /// The journal entry posted for the gain/loss.
    pub journal_id: Uuid,
}

/// FX realization repository.
#[derive(Debug, Clone)]
pub struct FxRealizationRepository {
    db: DatabaseConnection,
}

impl FxRealizationRepository {
    /// Creates a new FX realization repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Realizes a settlement of an invoice.
    ///
    /// Converts the invoice total into `payment_currency`, computes
    /// `gain_loss = payment_amount − converted`, records the realization,
    /// and posts the gain/loss journal — all in one transaction.
    ///
    /// The posting is a single-account placeholder: both legs target the
    /// `FX Gain/Loss` account (debit |g| / credit |g|), which keeps the
    /// entry balanced. A production chart of accounts would post bank and
    /// gain/loss legs separately.
    ///
    /// # Errors
    ///
    /// Returns `FxError::Currency` when no usable rate exists; nothing is
    /// persisted in that case.
    pub async fn realize(
        &self,
        invoice_id: Uuid,
        payment_amount: Decimal,
        payment_currency: &str,
    ) -> Result<FxOutcome, FxError> {
        let payment_currency = payment_currency.to_uppercase();
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(invoice_id)
            .one(&txn)
            .await?
            .ok_or(FxError::InvoiceNotFound(invoice_id))?;

        let lines = invoice_lines::Entity::find()
            .filter(invoice_lines::Column::InvoiceId.eq(invoice_id))
            .all(&txn)
            .await?;
        let invoice_total: Decimal = lines.iter().map(|l| l.amount).sum();

        let converted = convert_on(&txn, invoice_total, &invoice.currency, &payment_currency).await?;
        let computation = fx::compute_realization(invoice_total, converted, payment_amount);

        let realization = fx_realizations::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice_id),
            base_currency: Set(invoice.currency.clone()),
            realized_currency: Set(payment_currency.clone()),
            original_amount: Set(invoice_total),
            realized_amount: Set(payment_amount),
            gain_loss: Set(computation.gain_loss),
            realized_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        let fx_account = find_or_create_fx_account(&txn, &payment_currency).await?;
        let journal_id = post_journal_on(
            &txn,
            &CreateJournalInput {
                entry_date: Utc::now().date_naive(),
                narration: Some(format!(
                    "FX realization for invoice {}",
                    invoice.invoice_number
                )),
                lines: fx::realization_lines(fx_account.id, computation.gain_loss),
            },
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            %invoice_id,
            gain_loss = %computation.gain_loss,
            currency = %realization.realized_currency,
            "FX settlement realized"
        );
        Ok(FxOutcome {
            realization,
            journal_id,
        })
    }
}

/// Finds the FX gain/loss account, creating it on first use.
async fn find_or_create_fx_account<C: ConnectionTrait>(
    conn: &C,
    currency: &str,
) -> Result<accounts::Model, DbErr> {
    let existing = accounts::Entity::find()
        .filter(accounts::Column::Name.eq(FX_GAIN_LOSS_ACCOUNT))
        .one(conn)
        .await?;
    if let Some(account) = existing {
        return Ok(account);
    }

    accounts::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(FX_GAIN_LOSS_ACCOUNT.to_string()),
        account_type: Set(AccountType::Expense.as_str().to_string()),
        currency: Set(currency.to_string()),
    }
    .insert(conn)
    .await
}
