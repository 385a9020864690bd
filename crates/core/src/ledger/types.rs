//! Ledger domain types for journal posting and validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::round_money;

/// Account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset account.
    Asset,
    /// Liability account.
    Liability,
    /// Equity account.
    Equity,
    /// Revenue account.
    Revenue,
    /// Expense account.
    Expense,
}

impl AccountType {
    /// Returns the canonical lowercase string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown account type: {other}")),
        }
    }
}

/// Input for a single ledger line in a journal entry.
///
/// A line carries a debit or a credit amount (or both at zero for
/// placeholder legs); negative amounts are rejected during validation.
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: Uuid,
    /// Debit amount (>= 0).
    pub debit: Decimal,
    /// Credit amount (>= 0).
    pub credit: Decimal,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub const fn debit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub const fn credit(account_id: Uuid, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }
}

/// Input for posting a new journal entry.
#[derive(Debug, Clone)]
pub struct CreateJournalInput {
    /// The date of the journal entry.
    pub entry_date: NaiveDate,
    /// Narration describing the entry.
    pub narration: Option<String>,
    /// The ledger lines (must have at least 2).
    pub lines: Vec<JournalLineInput>,
}

/// Journal totals for validation and display.
#[derive(Debug, Clone)]
pub struct JournalTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
    /// Whether debits equal credits at 2-decimal precision.
    pub is_balanced: bool,
}

impl JournalTotals {
    /// Creates journal totals from debit and credit sums.
    ///
    /// Balance is judged after banker's-rounding both sides to 2 decimal
    /// places, matching the precision money is stored at.
    #[must_use]
    pub fn new(debit: Decimal, credit: Decimal) -> Self {
        Self {
            debit,
            credit,
            is_balanced: round_money(debit) == round_money(credit),
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_totals_balanced() {
        let totals = JournalTotals::new(dec!(100.00), dec!(100.00));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), Decimal::ZERO);
    }

    #[test]
    fn test_totals_balanced_at_two_decimals() {
        // Sub-cent drift disappears at the 2-decimal boundary.
        let totals = JournalTotals::new(dec!(100.001), dec!(100.0009));
        assert!(totals.is_balanced);
    }

    #[test]
    fn test_totals_unbalanced() {
        let totals = JournalTotals::new(dec!(100), dec!(90));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(10));
    }

    #[test]
    fn test_account_type_round_trip() {
        for t in [
            AccountType::Asset,
            AccountType::Liability,
            AccountType::Equity,
            AccountType::Revenue,
            AccountType::Expense,
        ] {
            assert_eq!(t.as_str().parse::<AccountType>().unwrap(), t);
        }
        assert!("bank".parse::<AccountType>().is_err());
    }
}
