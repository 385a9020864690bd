//! Account repository: creation, balances, and the trial balance report.
//!
//! Balances are derived from ledger lines on every read; nothing is
//! cached or stored. Conversion into a requested currency reports a
//! missing rate explicitly.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use gstbooks_core::currency::ConvertedAmount;
use gstbooks_core::ledger::{AccountBalance, AccountType, LedgerError, LedgerService, TrialBalanceRow};

use crate::entities::{accounts, ledger_lines};

use super::currency::{CurrencyError, convert_indicated_on};

/// Account repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account. Currency codes are stored uppercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_account(
        &self,
        name: &str,
        account_type: AccountType,
        currency: &str,
    ) -> Result<accounts::Model, LedgerError> {
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            account_type: Set(account_type.as_str().to_string()),
            currency: Set(currency.to_uppercase()),
        };
        account.insert(&self.db).await.map_err(db_err)
    }

    /// Balance of one account, optionally converted.
    ///
    /// Balance = Σdebit − Σcredit over the account's lines. When a target
    /// currency is requested and no rate exists, the result carries
    /// [`ConvertedAmount::NoRateAvailable`] instead of echoing the native
    /// amount.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AccountNotFound` for unknown accounts.
    pub async fn account_balance(
        &self,
        account_id: Uuid,
        target_currency: Option<&str>,
    ) -> Result<AccountBalance, LedgerError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(LedgerError::AccountNotFound(account_id))?;

        let balance = balance_on(&self.db, account_id).await.map_err(db_err)?;
        let converted = self
            .maybe_convert(balance, &account.currency, target_currency)
            .await?;

        Ok(AccountBalance {
            account_id,
            currency: account.currency,
            balance,
            converted,
        })
    }

    /// One row per account, native and optionally converted.
    ///
    /// The engine enforces per-journal balance only; the overall zero-sum
    /// of this report is a property checked by tests, not a write-time
    /// invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn trial_balance(
        &self,
        target_currency: Option<&str>,
    ) -> Result<Vec<TrialBalanceRow>, LedgerError> {
        let accounts = accounts::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut report = Vec::with_capacity(accounts.len());
        for account in accounts {
            let balance = balance_on(&self.db, account.id).await.map_err(db_err)?;
            let converted = self
                .maybe_convert(balance, &account.currency, target_currency)
                .await?;
            report.push(TrialBalanceRow {
                account_id: account.id,
                account_name: account.name,
                currency: account.currency,
                balance,
                converted,
            });
        }
        Ok(report)
    }

    async fn maybe_convert(
        &self,
        balance: Decimal,
        native: &str,
        target_currency: Option<&str>,
    ) -> Result<Option<ConvertedAmount>, LedgerError> {
        let Some(target) = target_currency else {
            return Ok(None);
        };
        let target = target.to_uppercase();
        let converted = convert_indicated_on(&self.db, balance, native, &target)
            .await
            .map_err(currency_err)?;
        Ok(Some(converted))
    }
}

/// Debit/credit sums for an account on any connection.
pub(crate) async fn balance_on<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
) -> Result<Decimal, DbErr> {
    let lines = ledger_lines::Entity::find()
        .filter(ledger_lines::Column::AccountId.eq(account_id))
        .all(conn)
        .await?;

    let debit: Decimal = lines.iter().map(|l| l.debit).sum();
    let credit: Decimal = lines.iter().map(|l| l.credit).sum();
    Ok(LedgerService::balance_of(debit, credit))
}

fn db_err(err: DbErr) -> LedgerError {
    LedgerError::Database(err.to_string())
}

fn currency_err(err: CurrencyError) -> LedgerError {
    LedgerError::Database(err.to_string())
}
