//! FX realization arithmetic.
//!
//! When a receivable settles in a different currency than it was invoiced
//! in, the difference between the payment and the rate-converted invoice
//! total is recognized as FX gain or loss and booked to a dedicated
//! account.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ledger::JournalLineInput;

/// Account that absorbs realized FX differences.
///
/// The realization posting is a single-account placeholder: both legs of
/// the journal target this account. A production chart of accounts would
/// split bank and gain/loss legs; the simplification is intentional and
/// kept balanced.
pub const FX_GAIN_LOSS_ACCOUNT: &str = "FX Gain/Loss";

/// Result of an FX realization computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FxComputation {
    /// Invoice total in the invoice currency.
    pub invoice_total: Decimal,
    /// Invoice total converted into the settlement currency.
    pub converted_total: Decimal,
    /// Realized gain (positive) or loss (negative).
    pub gain_loss: Decimal,
}

/// Computes the realized gain or loss for a settlement.
///
/// `gain_loss = payment_amount − converted_total`.
#[must_use]
pub fn compute_realization(
    invoice_total: Decimal,
    converted_total: Decimal,
    payment_amount: Decimal,
) -> FxComputation {
    FxComputation {
        invoice_total,
        converted_total,
        gain_loss: payment_amount - converted_total,
    }
}

/// Builds the realization journal lines.
///
/// Both legs target the FX gain/loss account with the absolute gain/loss
/// amount, so the entry satisfies the ledger's balance invariant.
#[must_use]
pub fn realization_lines(fx_account_id: Uuid, gain_loss: Decimal) -> Vec<JournalLineInput> {
    let amount = gain_loss.abs();
    vec![
        JournalLineInput::debit(fx_account_id, amount),
        JournalLineInput::credit(fx_account_id, amount),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerService;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_settlement_has_zero_gain_loss() {
        // 1000 USD invoiced, rate 83.5 -> 83500 INR converted, paid 83500.
        let fx = compute_realization(dec!(1000), dec!(83500), dec!(83500));
        assert_eq!(fx.gain_loss, Decimal::ZERO);
    }

    #[test]
    fn test_overpayment_is_gain() {
        let fx = compute_realization(dec!(1000), dec!(83500), dec!(84000));
        assert_eq!(fx.gain_loss, dec!(500));
    }

    #[test]
    fn test_underpayment_is_loss() {
        let fx = compute_realization(dec!(1000), dec!(83500), dec!(83000));
        assert_eq!(fx.gain_loss, dec!(-500));
    }

    #[test]
    fn test_realization_lines_balance() {
        let account = Uuid::new_v4();
        for gain_loss in [dec!(500), dec!(-500), Decimal::ZERO] {
            let lines = realization_lines(account, gain_loss);
            assert_eq!(lines.len(), 2);
            assert!(LedgerService::validate_lines(&lines).is_ok());
            assert_eq!(lines[0].debit, gain_loss.abs());
            assert_eq!(lines[1].credit, gain_loss.abs());
        }
    }

    #[test]
    fn test_both_legs_hit_the_fx_account() {
        let account = Uuid::new_v4();
        let lines = realization_lines(account, dec!(250));
        assert!(lines.iter().all(|l| l.account_id == account));
    }
}
