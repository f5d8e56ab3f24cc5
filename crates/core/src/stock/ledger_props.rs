//! Property-based tests for the stock ledger.

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use weft_shared::types::{StockUnitId, UserId, WarehouseId};

use super::ledger::StockLedger;
use super::types::{AdjustmentDraft, StockType, StockUnit};
use super::validation::ReasonRules;
use crate::context::{FixedClock, RequestContext};

/// Signed adjustments with up to two decimals, zero included.
fn arb_adjustment() -> impl Strategy<Value = Decimal> {
    (-50_000i64..50_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn arb_base() -> impl Strategy<Value = Decimal> {
    (0i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn ctx() -> RequestContext {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap());
    RequestContext::new(UserId::new(), WarehouseId::new(), &clock)
}

fn setup(base: Decimal) -> (StockUnitId, StockLedger) {
    let unit = StockUnit {
        id: StockUnitId::new(),
        warehouse_id: WarehouseId::new(),
        stock_type: StockType::Batch,
        sequence_number: 7,
        base_quantity: base,
    };
    let id = unit.id;
    let mut ledger = StockLedger::new(ReasonRules::default());
    ledger.register_unit(unit).unwrap();
    (id, ledger)
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Quantity is base plus committed adjustments and never goes negative.
    #[test]
    fn prop_quantity_is_base_plus_committed(
        base in arb_base(),
        changes in prop::collection::vec(arb_adjustment(), 0..30),
    ) {
        let ctx = ctx();
        let (id, mut ledger) = setup(base);
        let mut expected = base;

        for change in changes {
            match ledger.record_adjustment(&ctx, id, change, "recount", date()) {
                Ok(_) => expected += change,
                Err(_) => prop_assert!(change.is_zero() || expected + change < Decimal::ZERO),
            }
            let quantity = ledger.quantity_of(id).unwrap();
            prop_assert_eq!(quantity, expected);
            prop_assert!(quantity >= Decimal::ZERO);
        }
    }

    /// Replayed history chains and ends at the current quantity.
    #[test]
    fn prop_history_is_a_chain(
        base in arb_base(),
        changes in prop::collection::vec(arb_adjustment(), 0..30),
    ) {
        let ctx = ctx();
        let (id, mut ledger) = setup(base);
        for change in changes {
            let _ = ledger.record_adjustment(&ctx, id, change, "recount", date());
        }

        let history = ledger.history(id).unwrap();
        let mut before = base;
        for (i, step) in history.iter().enumerate() {
            prop_assert_eq!(step.sequence, i + 1);
            prop_assert_eq!(step.quantity_before, before);
            prop_assert_eq!(step.quantity_after, step.quantity_before + step.quantity_adjusted);
            prop_assert!(step.quantity_after >= Decimal::ZERO);
            before = step.quantity_after;
        }
        prop_assert_eq!(before, ledger.quantity_of(id).unwrap());
    }

    /// A rejected batch leaves the ledger untouched.
    #[test]
    fn prop_batch_all_or_nothing(
        base in arb_base(),
        changes in prop::collection::vec(arb_adjustment(), 1..8),
    ) {
        let ctx = ctx();
        let (id, mut ledger) = setup(base);
        let drafts = changes
            .iter()
            .map(|&q| AdjustmentDraft::manual(id, q, "cut for order", date()))
            .collect();

        let before = ledger.adjustments().len();
        match ledger.apply_batch(&ctx, drafts).map(<[_]>::len) {
            Ok(posted) => prop_assert_eq!(posted, changes.len()),
            Err(_) => {
                prop_assert_eq!(ledger.adjustments().len(), before);
                prop_assert_eq!(ledger.quantity_of(id).unwrap(), base);
            }
        }
    }
}
