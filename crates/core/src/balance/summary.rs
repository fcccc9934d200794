//! Per-member paid / owed totals in a chosen display currency.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tallyup_shared::types::{Currency, MemberId};

use super::accumulator::split_group;
use crate::currency::{CurrencyError, RateTable, round_amount};
use crate::expense::{Expense, Member};

/// What a member paid, what their shares add up to, and the difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    /// The member.
    pub member_id: MemberId,
    /// Display name.
    pub name: String,
    /// Total of expenses this member paid.
    pub paid: Decimal,
    /// Total of this member's shares.
    pub owed: Decimal,
    /// `paid - owed`; positive means the group owes them.
    pub net: Decimal,
    /// Currency all three amounts are expressed in.
    pub currency: Currency,
}

#[derive(Default)]
struct Totals {
    paid: Decimal,
    owed: Decimal,
}

/// Summarizes every member in `target` currency.
///
/// Amounts are accumulated at full precision and rounded to 2 decimal
/// places once at the end.
///
/// # Errors
///
/// Returns an error if a currency involved has no rate or a total overflows.
pub fn summarize_members(
    rates: &RateTable,
    expenses: &[Expense],
    members: &[Member],
    target: Currency,
) -> Result<Vec<MemberSummary>, CurrencyError> {
    let mut totals: HashMap<&MemberId, Totals> = HashMap::with_capacity(members.len());

    for expense in expenses {
        let amount = rates.convert_exact(expense.amount, expense.currency, target)?;
        let overflow = || CurrencyError::Overflow {
            amount: expense.amount,
            currency: expense.currency,
        };

        let payer = totals.entry(&expense.paid_by).or_default();
        payer.paid = payer.paid.checked_add(amount).ok_or_else(overflow)?;

        let group = split_group(expense, members);
        if group.is_empty() {
            continue;
        }
        let share = amount / Decimal::from(group.len());
        for member_id in group {
            let member_totals = totals.entry(member_id).or_default();
            member_totals.owed = member_totals.owed.checked_add(share).ok_or_else(overflow)?;
        }
    }

    members
        .iter()
        .map(|member| -> Result<MemberSummary, CurrencyError> {
            let (paid, owed) = totals
                .get(&member.id)
                .map_or((Decimal::ZERO, Decimal::ZERO), |t| (t.paid, t.owed));
            let net = paid.checked_sub(owed).ok_or(CurrencyError::Overflow {
                amount: paid,
                currency: target,
            })?;
            Ok(MemberSummary {
                member_id: member.id.clone(),
                name: member.name.clone(),
                paid: round_amount(paid, 2),
                owed: round_amount(owed, 2),
                net: round_amount(net, 2),
                currency: target,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn members() -> Vec<Member> {
        vec![
            Member::new("a", "Alice"),
            Member::new("b", "Bob"),
            Member::new("c", "Carol"),
        ]
    }

    #[test]
    fn test_summary_matches_balances() {
        let expenses = vec![
            Expense::new("a", dec!(90), Currency::Usd),
            Expense::new("b", dec!(30), Currency::Usd).split_with(["b", "c"]),
        ];
        let summaries =
            summarize_members(&RateTable::standard(), &expenses, &members(), Currency::Usd)
                .unwrap();

        assert_eq!(summaries[0].paid, dec!(90));
        assert_eq!(summaries[0].owed, dec!(30));
        assert_eq!(summaries[0].net, dec!(60));
        assert_eq!(summaries[1].paid, dec!(30));
        assert_eq!(summaries[1].owed, dec!(45));
        assert_eq!(summaries[1].net, dec!(-15));
        assert_eq!(summaries[2].paid, dec!(0));
        assert_eq!(summaries[2].owed, dec!(45));
        assert_eq!(summaries[2].net, dec!(-45));
    }

    #[test]
    fn test_summary_in_target_currency() {
        let expenses = vec![Expense::new("a", dec!(100), Currency::Usd).split_with(["a", "b"])];
        let summaries =
            summarize_members(&RateTable::standard(), &expenses, &members(), Currency::Eur)
                .unwrap();
        assert_eq!(summaries[0].paid, dec!(91));
        assert_eq!(summaries[0].net, dec!(45.5));
        assert_eq!(summaries[1].net, dec!(-45.5));
        assert!(summaries.iter().all(|s| s.currency == Currency::Eur));
    }

    #[test]
    fn test_summary_overflow_is_an_error() {
        let huge = dec!(50000000000000000000000000000);
        let expenses = vec![
            Expense::new("a", huge, Currency::Usd).split_with(["b"]),
            Expense::new("a", huge, Currency::Usd).split_with(["b"]),
        ];
        let err = summarize_members(&RateTable::standard(), &expenses, &members(), Currency::Usd)
            .unwrap_err();
        assert_eq!(
            err,
            CurrencyError::Overflow {
                amount: huge,
                currency: Currency::Usd,
            }
        );
    }

    #[test]
    fn test_summary_rounds_once_at_the_end() {
        // Three thirds of 10 would drift if each share were rounded first.
        let expenses = vec![
            Expense::new("a", dec!(10), Currency::Usd),
            Expense::new("a", dec!(10), Currency::Usd),
            Expense::new("a", dec!(10), Currency::Usd),
        ];
        let summaries =
            summarize_members(&RateTable::standard(), &expenses, &members(), Currency::Usd)
                .unwrap();
        assert_eq!(summaries[1].owed, dec!(10.00));
        assert_eq!(summaries[0].net, dec!(20.00));
    }
}
