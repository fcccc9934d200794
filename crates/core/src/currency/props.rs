//! Property-based tests for currency normalization and conversion.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tallyup_shared::types::Currency;

use super::conversion::{convert_currency, normalize_amount};
use super::rates::RateTable;

/// Strategy to generate positive decimal amounts (0.01 to 1,000,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to pick any supported currency.
fn currency() -> impl Strategy<Value = Currency> {
    prop::sample::select(Currency::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Normalizing a reference-currency amount returns it unchanged.
    #[test]
    fn prop_reference_normalization_is_identity(amount in positive_amount()) {
        let rates = RateTable::standard();
        prop_assert_eq!(normalize_amount(&rates, amount, Currency::Usd).unwrap(), amount);
    }

    /// Normalization is deterministic.
    #[test]
    fn prop_normalize_is_deterministic(amount in positive_amount(), from in currency()) {
        let rates = RateTable::standard();
        let first = normalize_amount(&rates, amount, from).unwrap();
        let second = normalize_amount(&rates, amount, from).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Positive amounts stay positive after normalization.
    #[test]
    fn prop_positive_inputs_positive_output(amount in positive_amount(), from in currency()) {
        let rates = RateTable::standard();
        prop_assert!(normalize_amount(&rates, amount, from).unwrap() > Decimal::ZERO);
    }

    /// Converting out of the reference currency and back lands within one cent.
    #[test]
    fn prop_round_trip_within_a_cent(amount in positive_amount(), to in currency()) {
        let rates = RateTable::standard();
        let foreign = rates.convert_exact(amount, Currency::Usd, to).unwrap();
        let back = convert_currency(&rates, foreign, to, Currency::Usd).unwrap();
        prop_assert!(
            (back - amount).abs() <= Decimal::new(1, 2),
            "{} USD came back as {}",
            amount,
            back
        );
    }

    /// Converted amounts never carry more than 2 decimal places.
    #[test]
    fn prop_convert_rounds_to_2_decimals(
        amount in positive_amount(),
        from in currency(),
        to in currency(),
    ) {
        let rates = RateTable::standard();
        let result = convert_currency(&rates, amount, from, to).unwrap();
        let scaled = result * Decimal::from(100);
        prop_assert_eq!(scaled, scaled.round());
    }
}
