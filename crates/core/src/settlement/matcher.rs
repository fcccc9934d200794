//! Greedy largest-first matching of debtors to creditors.

use rust_decimal::Decimal;
use tallyup_shared::types::{Currency, MemberId};
use tracing::debug;

use super::types::{Settlement, SettlementPolicy};
use crate::balance::Balances;
use crate::currency::round_amount;

/// Outstanding magnitude for one side of the matching.
#[derive(Debug)]
struct Position {
    member_id: MemberId,
    remaining: Decimal,
}

/// Turns balances into transfers.
#[derive(Debug, Clone, Copy)]
pub struct SettlementMatcher {
    currency: Currency,
    policy: SettlementPolicy,
}

impl SettlementMatcher {
    /// Creates a matcher emitting amounts in `currency`.
    #[must_use]
    pub const fn new(currency: Currency, policy: SettlementPolicy) -> Self {
        Self { currency, policy }
    }

    /// Computes the transfers settling `balances`.
    ///
    /// Debtors are served largest debt first and creditors largest credit
    /// first; equal balances keep member order, so the output is
    /// deterministic. Remainders below the tolerance are dropped. Emitted
    /// amounts are rounded, intermediate remainders are not.
    #[must_use]
    pub fn settle(&self, balances: &Balances) -> Vec<Settlement> {
        let tolerance = self.policy.tolerance();

        let mut debtors: Vec<Position> = balances
            .iter()
            .filter(|entry| entry.balance < -tolerance)
            .map(|entry| Position {
                member_id: entry.member_id.clone(),
                remaining: -entry.balance,
            })
            .collect();
        let mut creditors: Vec<Position> = balances
            .iter()
            .filter(|entry| entry.balance > tolerance)
            .map(|entry| Position {
                member_id: entry.member_id.clone(),
                remaining: entry.balance,
            })
            .collect();

        // Stable: ties keep member order.
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut settlements = Vec::with_capacity(debtors.len().max(creditors.len()));
        let (mut d, mut c) = (0, 0);

        while d < debtors.len() && c < creditors.len() {
            let debtor = &mut debtors[d];
            let creditor = &mut creditors[c];
            let amount = debtor.remaining.min(creditor.remaining);

            if amount >= tolerance {
                settlements.push(Settlement {
                    from: debtor.member_id.clone(),
                    to: creditor.member_id.clone(),
                    amount: round_amount(amount, self.policy.decimal_places()),
                    currency: self.currency,
                });
            }

            debtor.remaining -= amount;
            creditor.remaining -= amount;

            if debtor.remaining < tolerance {
                d += 1;
            }
            if creditor.remaining < tolerance {
                c += 1;
            }
        }

        debug!(
            debtors = debtors.len(),
            creditors = creditors.len(),
            transfers = settlements.len(),
            "Computed settlement"
        );

        settlements
    }
}

impl Default for SettlementMatcher {
    fn default() -> Self {
        Self::new(Currency::Usd, SettlementPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn balances(entries: &[(&str, Decimal)]) -> Balances {
        Balances::from_entries(
            entries
                .iter()
                .map(|(id, balance)| (MemberId::from(*id), *balance)),
        )
        .unwrap()
    }

    fn transfer(from: &str, to: &str, amount: Decimal) -> Settlement {
        Settlement {
            from: MemberId::from(from),
            to: MemberId::from(to),
            amount,
            currency: Currency::Usd,
        }
    }

    #[test]
    fn test_single_creditor_two_debtors() {
        let input = balances(&[("a", dec!(60)), ("b", dec!(-30)), ("c", dec!(-30))]);
        let result = SettlementMatcher::default().settle(&input);
        assert_eq!(
            result,
            vec![transfer("b", "a", dec!(30)), transfer("c", "a", dec!(30))]
        );
    }

    #[test]
    fn test_largest_debtor_pays_largest_creditor_first() {
        let input = balances(&[
            ("a", dec!(10)),
            ("b", dec!(-70)),
            ("c", dec!(40)),
            ("d", dec!(20)),
            ("e", dec!(0)),
        ]);
        let result = SettlementMatcher::default().settle(&input);
        assert_eq!(
            result,
            vec![
                transfer("b", "c", dec!(40)),
                transfer("b", "d", dec!(20)),
                transfer("b", "a", dec!(10)),
            ]
        );
    }

    #[test]
    fn test_both_sides_drop_in_one_step() {
        let input = balances(&[("a", dec!(-25)), ("b", dec!(25)), ("c", dec!(-5)), ("d", dec!(5))]);
        let result = SettlementMatcher::default().settle(&input);
        assert_eq!(
            result,
            vec![transfer("a", "b", dec!(25)), transfer("c", "d", dec!(5))]
        );
    }

    #[test]
    fn test_ties_follow_member_order() {
        let input = balances(&[("x", dec!(-10)), ("y", dec!(-10)), ("z", dec!(20))]);
        let result = SettlementMatcher::default().settle(&input);
        assert_eq!(
            result,
            vec![transfer("x", "z", dec!(10)), transfer("y", "z", dec!(10))]
        );
    }

    #[test]
    fn test_balances_within_tolerance_are_settled() {
        let input = balances(&[("a", dec!(0.004)), ("b", dec!(-0.01)), ("c", dec!(0.006))]);
        assert!(SettlementMatcher::default().settle(&input).is_empty());
    }

    #[test]
    fn test_all_zero_is_noop() {
        let input = balances(&[("a", dec!(0)), ("b", dec!(0))]);
        assert!(SettlementMatcher::default().settle(&input).is_empty());
    }

    #[test]
    fn test_empty_balances() {
        assert!(SettlementMatcher::default().settle(&Balances::default()).is_empty());
    }

    #[test]
    fn test_amounts_rounded_only_on_emission() {
        // Thirds: each debtor owes 33.333..., the creditor is owed 66.666...
        let third = dec!(100) / dec!(3);
        let input = balances(&[("a", third * dec!(2)), ("b", -third), ("c", -third)]);
        let result = SettlementMatcher::default().settle(&input);
        assert_eq!(
            result,
            vec![transfer("b", "a", dec!(33.33)), transfer("c", "a", dec!(33.33))]
        );
    }

    #[test]
    fn test_sub_tolerance_residual_is_discarded() {
        let input = balances(&[("a", dec!(10.005)), ("b", dec!(-10))]);
        let result = SettlementMatcher::default().settle(&input);
        assert_eq!(result, vec![transfer("b", "a", dec!(10))]);
    }

    #[test]
    fn test_custom_policy_and_currency() {
        let policy = SettlementPolicy::new(dec!(1), 0).unwrap();
        let matcher = SettlementMatcher::new(Currency::Eur, policy);
        let input = balances(&[("a", dec!(10.6)), ("b", dec!(-10.6)), ("c", dec!(0.5))]);
        let result = matcher.settle(&input);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].amount, dec!(11));
        assert_eq!(result[0].currency, Currency::Eur);
    }

    #[test]
    fn test_input_balances_untouched() {
        let input = balances(&[("a", dec!(5)), ("b", dec!(-5))]);
        let snapshot = input.clone();
        let _ = SettlementMatcher::default().settle(&input);
        assert_eq!(input, snapshot);
    }
}
