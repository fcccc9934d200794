//! Property-based tests for balance accumulation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tallyup_shared::types::{Currency, MemberId};

use super::accumulator::compute_balances;
use crate::currency::RateTable;
use crate::expense::{Expense, Member};

/// Rounding noise allowed by repeated division, far below a cent.
fn noise() -> Decimal {
    Decimal::new(1, 12)
}

fn members(count: usize) -> Vec<Member> {
    (0..count)
        .map(|i| Member::new(format!("m{i}"), format!("Member {i}")))
        .collect()
}

/// Strategy for an expense over `count` members: payer index, cents,
/// currency, and a subset mask for the split group (empty = everyone).
fn expense(count: usize) -> impl Strategy<Value = Expense> {
    (
        0..count,
        1i64..10_000_000i64,
        prop::sample::select(Currency::ALL.to_vec()),
        prop::collection::vec(any::<bool>(), count),
    )
        .prop_map(|(payer, cents, currency, mask)| {
            let split: Vec<MemberId> = mask
                .iter()
                .enumerate()
                .filter(|(_, included)| **included)
                .map(|(i, _)| MemberId::new(format!("m{i}")))
                .collect();
            Expense::new(format!("m{payer}"), Decimal::new(cents, 2), currency).split_with(split)
        })
}

fn scenario() -> impl Strategy<Value = (Vec<Member>, Vec<Expense>)> {
    (1usize..8).prop_flat_map(|count| {
        (
            Just(members(count)),
            prop::collection::vec(expense(count), 0..20),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every expense is fully distributed, so balances sum to zero.
    #[test]
    fn prop_balances_sum_to_zero((members, expenses) in scenario()) {
        let balances = compute_balances(&RateTable::standard(), &expenses, &members).unwrap();
        let total = balances.total().unwrap();
        prop_assert!(total.abs() <= noise(), "balances sum to {}", total);
    }

    /// Every known member appears exactly once, in member order.
    #[test]
    fn prop_every_member_has_a_balance((members, expenses) in scenario()) {
        let balances = compute_balances(&RateTable::standard(), &expenses, &members).unwrap();
        let ids: Vec<&MemberId> = balances.iter().map(|entry| &entry.member_id).collect();
        let expected: Vec<&MemberId> = members.iter().map(|member| &member.id).collect();
        prop_assert_eq!(ids, expected);
    }

    /// Recomputing from the same snapshot yields the same balances.
    #[test]
    fn prop_balances_are_deterministic((members, expenses) in scenario()) {
        let rates = RateTable::standard();
        let first = compute_balances(&rates, &expenses, &members).unwrap();
        let second = compute_balances(&rates, &expenses, &members).unwrap();
        prop_assert_eq!(first, second);
    }
}
