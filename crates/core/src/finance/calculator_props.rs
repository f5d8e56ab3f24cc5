//! Property-based tests for the order financial breakdown.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::{DiscountType, FinancialCalculator};
use weft_shared::types::round_currency;

/// Strategy for money amounts with two decimals.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for percentages in `[0, 100]` with two decimals.
fn arb_percentage() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_discount_type() -> impl Strategy<Value = DiscountType> {
    prop_oneof![
        Just(DiscountType::None),
        Just(DiscountType::Percentage),
        Just(DiscountType::FlatAmount),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The breakdown always adds up, whatever the inputs.
    #[test]
    fn prop_breakdown_is_internally_consistent(
        item_total in arb_amount(),
        discount_type in arb_discount_type(),
        discount_value in arb_amount(),
        gst_rate in arb_percentage(),
    ) {
        let f = FinancialCalculator::compute_order_financials(
            item_total, discount_type, discount_value, gst_rate,
        );

        prop_assert_eq!(f.discounted_total, f.item_total - f.discount_amount);
        prop_assert_eq!(f.total_amount, f.discounted_total + f.gst_amount);
        prop_assert_eq!(f.gst_amount, f.discounted_total * gst_rate / Decimal::ONE_HUNDRED);
    }

    /// In-range percentage discounts never flag and never exceed the item total.
    #[test]
    fn prop_in_range_percentage_is_clean(
        item_total in arb_amount(),
        percentage in arb_percentage(),
        gst_rate in arb_percentage(),
    ) {
        let f = FinancialCalculator::compute_order_financials(
            item_total, DiscountType::Percentage, percentage, gst_rate,
        );

        prop_assert!(f.discount_amount <= f.item_total);
        prop_assert!(f.discounted_total >= Decimal::ZERO);
        prop_assert!(f.warnings().is_empty());
    }

    /// The calculator is a pure function of its inputs.
    #[test]
    fn prop_compute_is_deterministic(
        item_total in arb_amount(),
        discount_type in arb_discount_type(),
        discount_value in arb_amount(),
        gst_rate in arb_percentage(),
    ) {
        let a = FinancialCalculator::compute_order_financials(
            item_total, discount_type, discount_value, gst_rate,
        );
        let b = FinancialCalculator::compute_order_financials(
            item_total, discount_type, discount_value, gst_rate,
        );
        prop_assert_eq!(a, b);
    }

    /// Rounded values are within half a paisa of the exact ones.
    #[test]
    fn prop_rounding_error_is_bounded(
        item_total in arb_amount(),
        percentage in arb_percentage(),
        gst_rate in arb_percentage(),
    ) {
        let f = FinancialCalculator::compute_order_financials(
            item_total, DiscountType::Percentage, percentage, gst_rate,
        );
        let half_unit = Decimal::new(5, 3);

        prop_assert!((round_currency(f.total_amount) - f.total_amount).abs() <= half_unit);
        prop_assert!(f.rounded().total_amount.scale() <= 2);
    }
}
