//! Property tests for journal validation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::service::LedgerService;
use super::types::JournalLineInput;

/// Strategy for non-negative money amounts in cents.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A journal whose credit leg mirrors its debit legs always validates.
    #[test]
    fn prop_mirrored_journal_always_balances(amounts in prop::collection::vec(amount_strategy(), 1..8)) {
        let mut lines: Vec<JournalLineInput> = amounts
            .iter()
            .map(|a| JournalLineInput::debit(Uuid::new_v4(), *a))
            .collect();
        let total: Decimal = amounts.iter().copied().sum();
        lines.push(JournalLineInput::credit(Uuid::new_v4(), total));

        prop_assert!(LedgerService::validate_lines(&lines).is_ok());
    }

    /// Skewing any balanced journal by a visible cent breaks validation.
    #[test]
    fn prop_skewed_journal_never_balances(amount in amount_strategy(), skew_cents in 1i64..100_000i64) {
        let skew = Decimal::new(skew_cents, 2);
        let lines = vec![
            JournalLineInput::debit(Uuid::new_v4(), amount + skew),
            JournalLineInput::credit(Uuid::new_v4(), amount),
        ];

        prop_assert!(LedgerService::validate_lines(&lines).is_err());
    }

    /// Totals are order-independent.
    #[test]
    fn prop_totals_order_independent(amounts in prop::collection::vec(amount_strategy(), 2..8)) {
        let lines: Vec<JournalLineInput> = amounts
            .iter()
            .map(|a| JournalLineInput::debit(Uuid::new_v4(), *a))
            .collect();
        let mut reversed = lines.clone();
        reversed.reverse();

        let forward = LedgerService::calculate_totals(&lines);
        let backward = LedgerService::calculate_totals(&reversed);
        prop_assert_eq!(forward.debit, backward.debit);
        prop_assert_eq!(forward.credit, backward.credit);
    }
}
