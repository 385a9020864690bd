//! Ledger service for journal validation.
//!
//! Pure business logic with no database dependencies: the repository layer
//! runs this validation inside its transaction before any line is written,
//! so a failed check leaves zero rows persisted.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{JournalLineInput, JournalTotals};

/// Ledger service for journal validation.
pub struct LedgerService;

impl LedgerService {
    /// Validates the lines of a journal entry before persistence.
    ///
    /// Checks, in order:
    /// 1. at least 2 lines
    /// 2. no negative debit or credit on any line
    /// 3. round(Σdebit, 2) == round(Σcredit, 2) (banker's rounding)
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` when any check fails; nothing may be persisted
    /// in that case.
    pub fn validate_lines(lines: &[JournalLineInput]) -> Result<JournalTotals, LedgerError> {
        if lines.len() < 2 {
            return Err(LedgerError::InsufficientLines);
        }

        for line in lines {
            if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
                return Err(LedgerError::NegativeAmount);
            }
        }

        let totals = Self::calculate_totals(lines);
        if !totals.is_balanced {
            return Err(LedgerError::UnbalancedJournal {
                debit: totals.debit,
                credit: totals.credit,
            });
        }

        Ok(totals)
    }

    /// Calculates journal totals from lines.
    #[must_use]
    pub fn calculate_totals(lines: &[JournalLineInput]) -> JournalTotals {
        let debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let credit: Decimal = lines.iter().map(|l| l.credit).sum();
        JournalTotals::new(debit, credit)
    }

    /// Computes an account balance from its debit and credit sums.
    ///
    /// Balance = Σdebit − Σcredit, for every account type; presentation
    /// sign conventions are a reporting concern.
    #[must_use]
    pub fn balance_of(total_debit: Decimal, total_credit: Decimal) -> Decimal {
        total_debit - total_credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn debit(amount: Decimal) -> JournalLineInput {
        JournalLineInput::debit(Uuid::new_v4(), amount)
    }

    fn credit(amount: Decimal) -> JournalLineInput {
        JournalLineInput::credit(Uuid::new_v4(), amount)
    }

    #[test]
    fn test_balanced_journal_accepted() {
        let lines = vec![debit(dec!(100)), credit(dec!(100))];
        let totals = LedgerService::validate_lines(&lines).unwrap();
        assert!(totals.is_balanced);
        assert_eq!(totals.debit, dec!(100));
        assert_eq!(totals.credit, dec!(100));
    }

    #[test]
    fn test_unbalanced_journal_rejected() {
        let lines = vec![debit(dec!(100)), credit(dec!(90))];
        assert!(matches!(
            LedgerService::validate_lines(&lines),
            Err(LedgerError::UnbalancedJournal { .. })
        ));
    }

    #[test]
    fn test_single_line_rejected() {
        let lines = vec![debit(dec!(100))];
        assert!(matches!(
            LedgerService::validate_lines(&lines),
            Err(LedgerError::InsufficientLines)
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let lines = vec![debit(dec!(-100)), credit(dec!(-100))];
        assert!(matches!(
            LedgerService::validate_lines(&lines),
            Err(LedgerError::NegativeAmount)
        ));
    }

    #[test]
    fn test_zero_zero_lines_allowed() {
        // Placeholder legs with both sides at zero are legal as long as the
        // journal still balances.
        let lines = vec![
            debit(dec!(50)),
            credit(dec!(50)),
            JournalLineInput {
                account_id: Uuid::new_v4(),
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
            },
        ];
        assert!(LedgerService::validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_balance_judged_at_two_decimals() {
        // 33.333 + 33.333 + 33.334 = 100.000 vs a 100.00 credit
        let lines = vec![
            debit(dec!(33.333)),
            debit(dec!(33.333)),
            debit(dec!(33.334)),
            credit(dec!(100.00)),
        ];
        assert!(LedgerService::validate_lines(&lines).is_ok());
    }

    #[test]
    fn test_split_legs_balance() {
        let lines = vec![debit(dec!(60)), debit(dec!(40)), credit(dec!(100))];
        let totals = LedgerService::validate_lines(&lines).unwrap();
        assert_eq!(totals.debit, dec!(100));
    }

    #[test]
    fn test_balance_of() {
        assert_eq!(LedgerService::balance_of(dec!(100), dec!(0)), dec!(100));
        assert_eq!(LedgerService::balance_of(dec!(0), dec!(100)), dec!(-100));
        assert_eq!(LedgerService::balance_of(dec!(75), dec!(25)), dec!(50));
    }
}
