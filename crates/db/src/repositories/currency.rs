//! Currency and exchange-rate repository.
//!
//! Rates are append-only; lookups resolve the most recent direct rate,
//! then the most recent inverse rate, and otherwise fail. Resolution
//! priority itself lives in `gstbooks_core::currency` — this repository
//! only fetches the candidates.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use gstbooks_core::currency::{self, ConvertedAmount, ExchangeRate, RateError};

use crate::entities::{currencies, exchange_rates};

/// Error types for currency and rate operations.
#[derive(Debug, thiserror::Error)]
pub enum CurrencyError {
    /// Rate must be positive.
    #[error("Exchange rate must be positive")]
    NonPositiveRate,

    /// Currencies must be different.
    #[error("Base and target currencies must be different")]
    SameCurrency,

    /// Currency not found.
    #[error("Currency '{0}' not found")]
    CurrencyNotFound(String),

    /// Rate resolution failed.
    #[error(transparent)]
    Rate(#[from] RateError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Currency repository for currencies and exchange rates.
#[derive(Debug, Clone)]
pub struct CurrencyRepository {
    db: DatabaseConnection,
}

impl CurrencyRepository {
    /// Creates a new currency repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a currency. Codes are stored uppercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_currency(
        &self,
        code: &str,
        name: Option<&str>,
    ) -> Result<currencies::Model, CurrencyError> {
        let currency = currencies::ActiveModel {
            code: Set(code.to_uppercase()),
            name: Set(name.map(String::from)),
        };
        Ok(currency.insert(&self.db).await?)
    }

    /// Appends an exchange rate captured now.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the rate is not positive
    /// - base and target are the same currency
    /// - either currency does not exist
    pub async fn create_rate(
        &self,
        base: &str,
        target: &str,
        rate: Decimal,
    ) -> Result<exchange_rates::Model, CurrencyError> {
        if rate <= Decimal::ZERO {
            return Err(CurrencyError::NonPositiveRate);
        }

        let base = base.to_uppercase();
        let target = target.to_uppercase();
        if base == target {
            return Err(CurrencyError::SameCurrency);
        }

        for code in [&base, &target] {
            let exists = currencies::Entity::find_by_id(code.clone())
                .one(&self.db)
                .await?;
            if exists.is_none() {
                return Err(CurrencyError::CurrencyNotFound(code.clone()));
            }
        }

        let row = exchange_rates::ActiveModel {
            id: Set(Uuid::new_v4()),
            base: Set(base),
            target: Set(target),
            rate: Set(rate),
            captured_at: Set(Utc::now().into()),
        };
        Ok(row.insert(&self.db).await?)
    }

    /// Most recent rate for the exact pair, or none.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn latest_rate(
        &self,
        base: &str,
        target: &str,
    ) -> Result<Option<exchange_rates::Model>, CurrencyError> {
        Ok(latest_rate_on(&self.db, base, target).await?)
    }

    /// Converts an amount between currencies; a missing rate is an error.
    ///
    /// # Errors
    ///
    /// Returns `CurrencyError::Rate` when no usable rate exists.
    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Result<Decimal, CurrencyError> {
        convert_on(&self.db, amount, from, to).await
    }

    /// Converts an amount, reporting a missing rate as an explicit
    /// indicator instead of an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for database failures.
    pub async fn convert_indicated(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
    ) -> Result<ConvertedAmount, CurrencyError> {
        convert_indicated_on(&self.db, amount, from, to).await
    }
}

/// Most recent rate row for the exact pair on any connection.
pub(crate) async fn latest_rate_on<C: ConnectionTrait>(
    conn: &C,
    base: &str,
    target: &str,
) -> Result<Option<exchange_rates::Model>, DbErr> {
    exchange_rates::Entity::find()
        .filter(exchange_rates::Column::Base.eq(base))
        .filter(exchange_rates::Column::Target.eq(target))
        .order_by_desc(exchange_rates::Column::CapturedAt)
        .one(conn)
        .await
}

/// Fetches the latest direct and inverse candidates for a pair.
pub(crate) async fn candidate_rates_on<C: ConnectionTrait>(
    conn: &C,
    from: &str,
    to: &str,
) -> Result<Vec<ExchangeRate>, DbErr> {
    let mut candidates = Vec::with_capacity(2);
    if let Some(direct) = latest_rate_on(conn, from, to).await? {
        candidates.push(to_core_rate(direct));
    }
    if let Some(inverse) = latest_rate_on(conn, to, from).await? {
        candidates.push(to_core_rate(inverse));
    }
    Ok(candidates)
}

/// Converts on any connection; a missing rate is an error.
pub(crate) async fn convert_on<C: ConnectionTrait>(
    conn: &C,
    amount: Decimal,
    from: &str,
    to: &str,
) -> Result<Decimal, CurrencyError> {
    if from == to {
        return Ok(amount);
    }
    let candidates = candidate_rates_on(conn, from, to).await?;
    Ok(currency::convert_amount(amount, from, to, &candidates)?)
}

/// Converts on any connection, folding rate errors into the explicit
/// no-rate indicator.
pub(crate) async fn convert_indicated_on<C: ConnectionTrait>(
    conn: &C,
    amount: Decimal,
    from: &str,
    to: &str,
) -> Result<ConvertedAmount, CurrencyError> {
    match convert_on(conn, amount, from, to).await {
        Ok(converted) => Ok(ConvertedAmount::Converted {
            currency: to.to_string(),
            amount: converted,
        }),
        Err(CurrencyError::Rate(_)) => Ok(ConvertedAmount::NoRateAvailable {
            currency: to.to_string(),
        }),
        Err(other) => Err(other),
    }
}

fn to_core_rate(model: exchange_rates::Model) -> ExchangeRate {
    ExchangeRate::new(
        model.base,
        model.target,
        model.rate,
        model.captured_at.with_timezone(&Utc),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_core_rate_preserves_pair_and_timestamp() {
        let now = Utc::now();
        let model = exchange_rates::Model {
            id: Uuid::new_v4(),
            base: "USD".to_string(),
            target: "INR".to_string(),
            rate: dec!(83.5),
            captured_at: now.into(),
        };
        let rate = to_core_rate(model);
        assert!(rate.covers("USD", "INR"));
        assert_eq!(rate.rate, dec!(83.5));
        assert_eq!(rate.captured_at, now);
    }
}
