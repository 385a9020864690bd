//! Balance report types.
//!
//! Balances are always derived from ledger lines, never stored. Conversion
//! into a requested target currency is optional and carries an explicit
//! no-rate indicator rather than silently echoing the native amount.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::currency::ConvertedAmount;

/// Balance of a single account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: Uuid,
    /// The account's native currency.
    pub currency: String,
    /// Balance in native currency (Σdebit − Σcredit).
    pub balance: Decimal,
    /// Conversion into the requested target currency, when one was asked for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted: Option<ConvertedAmount>,
}

/// One row of a trial balance report.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceRow {
    /// The account ID.
    pub account_id: Uuid,
    /// The account name.
    pub account_name: String,
    /// The account's native currency.
    pub currency: String,
    /// Balance in native currency.
    pub balance: Decimal,
    /// Conversion into the requested target currency, when one was asked for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted: Option<ConvertedAmount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_no_rate_indicator_serializes_explicitly() {
        let balance = AccountBalance {
            account_id: Uuid::nil(),
            currency: "USD".to_string(),
            balance: dec!(100),
            converted: Some(ConvertedAmount::NoRateAvailable {
                currency: "JPY".to_string(),
            }),
        };
        let json = serde_json::to_string(&balance).unwrap();
        assert!(json.contains("no_rate_available"));
        assert!(json.contains("JPY"));
    }

    #[test]
    fn test_native_only_omits_conversion() {
        let row = TrialBalanceRow {
            account_id: Uuid::nil(),
            account_name: "Cash".to_string(),
            currency: "USD".to_string(),
            balance: dec!(100),
            converted: None,
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("conversion"));
    }
}
