//! Property-based tests for settlement matching.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tallyup_shared::types::MemberId;

use super::{SettlementMatcher, SettlementPolicy};
use crate::balance::Balances;

/// Zero-sum balances in cents over up to eight members.
fn zero_sum_balances() -> impl Strategy<Value = Balances> {
    prop::collection::vec(-1_000_000i64..1_000_000i64, 1..8).prop_map(|mut cents| {
        let sum: i64 = cents.iter().sum();
        cents.push(-sum);
        Balances::from_entries(
            cents
                .into_iter()
                .enumerate()
                .map(|(i, c)| (MemberId::new(format!("m{i}")), Decimal::new(c, 2))),
        )
        .unwrap()
    })
}

fn apply(balances: &Balances, matcher: &SettlementMatcher) -> Balances {
    let mut after = balances.clone();
    for settlement in matcher.settle(balances) {
        after.adjust(&settlement.from, settlement.amount).unwrap();
        after.adjust(&settlement.to, -settlement.amount).unwrap();
    }
    after
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// After applying every transfer, nobody is left meaningfully owed.
    #[test]
    fn prop_transfers_settle_everyone(balances in zero_sum_balances()) {
        let matcher = SettlementMatcher::default();
        let after = apply(&balances, &matcher);
        let bound = SettlementPolicy::default().tolerance()
            * Decimal::from(u64::try_from(balances.len()).unwrap_or(u64::MAX));
        for entry in &after {
            prop_assert!(
                entry.balance.abs() <= bound,
                "{} left at {}",
                entry.member_id,
                entry.balance
            );
        }
    }

    /// Settling an already settled group produces nothing.
    #[test]
    fn prop_settlement_is_idempotent(balances in zero_sum_balances()) {
        let matcher = SettlementMatcher::default();
        let after = apply(&balances, &matcher);
        prop_assert!(matcher.settle(&after).is_empty());
    }

    /// Every transfer is positive and between two different members.
    #[test]
    fn prop_transfers_are_well_formed(balances in zero_sum_balances()) {
        let tolerance = SettlementPolicy::default().tolerance();
        for settlement in SettlementMatcher::default().settle(&balances) {
            prop_assert!(settlement.amount >= tolerance);
            prop_assert_ne!(&settlement.from, &settlement.to);
            prop_assert!(balances.get(settlement.from.as_str()).unwrap_or_default() < Decimal::ZERO);
            prop_assert!(balances.get(settlement.to.as_str()).unwrap_or_default() > Decimal::ZERO);
        }
    }

    /// At most one transfer fewer than the number of non-zero balances.
    #[test]
    fn prop_transfer_count_is_bounded(balances in zero_sum_balances()) {
        let nonzero = balances.iter().filter(|e| !e.balance.is_zero()).count();
        let transfers = SettlementMatcher::default().settle(&balances).len();
        prop_assert!(transfers <= nonzero.saturating_sub(1));
    }

    /// Same input, same output.
    #[test]
    fn prop_settlement_is_deterministic(balances in zero_sum_balances()) {
        let matcher = SettlementMatcher::default();
        prop_assert_eq!(matcher.settle(&balances), matcher.settle(&balances));
    }
}
