//! Append-only stock adjustment ledger.
//!
//! Units and adjustments live in arenas; adjustments are indexed by unit in
//! posting order. Posting validates every draft against a scratch running
//! total first and appends nothing unless all of them pass.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};
use weft_shared::types::{AdjustmentId, StockUnitId};

use super::error::StockError;
use super::types::{AdjustmentDraft, AdjustmentSource, QuantityChange, StockAdjustment, StockUnit};
use super::validation::{validate_quantity, ReasonRules};
use crate::context::RequestContext;

/// Stock units plus their adjustment history.
#[derive(Debug, Clone, Default)]
pub struct StockLedger {
    rules: ReasonRules,
    units: HashMap<StockUnitId, StockUnit>,
    adjustments: Vec<StockAdjustment>,
    by_unit: HashMap<StockUnitId, Vec<usize>>,
}

impl StockLedger {
    /// Creates an empty ledger enforcing `rules` on new adjustments.
    #[must_use]
    pub fn new(rules: ReasonRules) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Rebuilds a ledger from persisted units and adjustments.
    ///
    /// Adjustments are replayed in the order given. Each must be non-zero and
    /// keep its unit at or above zero. Reasons are not re-checked, since the
    /// rules in force may differ from those at posting time.
    pub fn from_parts(
        rules: ReasonRules,
        units: impl IntoIterator<Item = StockUnit>,
        adjustments: impl IntoIterator<Item = StockAdjustment>,
    ) -> Result<Self, StockError> {
        let mut ledger = Self::new(rules);
        for unit in units {
            ledger.register_unit(unit)?;
        }

        let mut running: HashMap<StockUnitId, Decimal> = HashMap::new();
        for adjustment in adjustments {
            let unit = ledger
                .units
                .get(&adjustment.stock_unit_id)
                .ok_or(StockError::UnitNotFound(adjustment.stock_unit_id))?;
            validate_quantity(adjustment.quantity_adjusted)?;

            let available = running
                .get(&unit.id)
                .copied()
                .unwrap_or(unit.base_quantity);
            let after = available + adjustment.quantity_adjusted;
            if after < Decimal::ZERO {
                return Err(StockError::InsufficientStock {
                    stock_unit_id: unit.id,
                    available,
                    adjustment: adjustment.quantity_adjusted,
                });
            }
            running.insert(unit.id, after);
            ledger.push(adjustment);
        }
        Ok(ledger)
    }

    /// Adds a unit with no adjustments.
    pub fn register_unit(&mut self, unit: StockUnit) -> Result<(), StockError> {
        if self.units.contains_key(&unit.id) {
            return Err(StockError::DuplicateUnit(unit.id));
        }
        self.units.insert(unit.id, unit);
        Ok(())
    }

    fn push(&mut self, adjustment: StockAdjustment) {
        self.by_unit
            .entry(adjustment.stock_unit_id)
            .or_default()
            .push(self.adjustments.len());
        self.adjustments.push(adjustment);
    }

    /// The reason rules in force.
    #[must_use]
    pub fn rules(&self) -> ReasonRules {
        self.rules
    }

    /// Looks up a unit.
    #[must_use]
    pub fn unit(&self, id: StockUnitId) -> Option<&StockUnit> {
        self.units.get(&id)
    }

    /// All registered units, in no particular order.
    pub fn units(&self) -> impl Iterator<Item = &StockUnit> {
        self.units.values()
    }

    /// All adjustments in posting order.
    #[must_use]
    pub fn adjustments(&self) -> &[StockAdjustment] {
        &self.adjustments
    }

    /// Adjustments posted against a unit, oldest first.
    pub fn adjustments_for(&self, id: StockUnitId) -> impl Iterator<Item = &StockAdjustment> {
        self.by_unit
            .get(&id)
            .into_iter()
            .flatten()
            .map(|&i| &self.adjustments[i])
    }

    /// Current quantity: base quantity plus every adjustment.
    pub fn quantity_of(&self, id: StockUnitId) -> Result<Decimal, StockError> {
        let unit = self.units.get(&id).ok_or(StockError::UnitNotFound(id))?;
        let adjusted: Decimal = self.adjustments_for(id).map(|a| a.quantity_adjusted).sum();
        Ok(unit.base_quantity + adjusted)
    }

    /// Replays a unit's adjustments with running before/after quantities.
    pub fn history(&self, id: StockUnitId) -> Result<Vec<QuantityChange>, StockError> {
        let unit = self.units.get(&id).ok_or(StockError::UnitNotFound(id))?;
        let mut steps: Vec<QuantityChange> = Vec::new();
        for adjustment in self.adjustments_for(id) {
            let step = match steps.last() {
                Some(previous) => QuantityChange::next(previous, adjustment),
                None => QuantityChange::first(unit.base_quantity, adjustment),
            };
            steps.push(step);
        }
        Ok(steps)
    }

    /// Posts one hand-entered adjustment.
    pub fn record_adjustment(
        &mut self,
        ctx: &RequestContext,
        stock_unit_id: StockUnitId,
        quantity_adjusted: Decimal,
        reason: &str,
        adjustment_date: NaiveDate,
    ) -> Result<&StockAdjustment, StockError> {
        let draft =
            AdjustmentDraft::manual(stock_unit_id, quantity_adjusted, reason, adjustment_date);
        let posted = self.apply_batch(ctx, vec![draft])?;
        // apply_batch appends exactly one record per draft
        Ok(&posted[0])
    }

    /// Validates and posts a group of adjustments as one unit.
    ///
    /// Drafts are checked in order against a running total per unit, so two
    /// drafts on the same unit see each other. On any failure nothing is
    /// appended.
    pub fn apply_batch(
        &mut self,
        ctx: &RequestContext,
        drafts: Vec<AdjustmentDraft>,
    ) -> Result<&[StockAdjustment], StockError> {
        let records = self.prepare(ctx, drafts).inspect_err(|e| {
            warn!(error = %e, user_id = %ctx.user_id, "Stock adjustment rejected");
        })?;

        let start = self.adjustments.len();
        for record in records {
            debug!(
                adjustment_id = %record.id,
                stock_unit_id = %record.stock_unit_id,
                quantity_adjusted = %record.quantity_adjusted,
                "Stock adjustment posted"
            );
            self.push(record);
        }
        Ok(&self.adjustments[start..])
    }

    fn prepare(
        &self,
        ctx: &RequestContext,
        drafts: Vec<AdjustmentDraft>,
    ) -> Result<Vec<StockAdjustment>, StockError> {
        let mut running: HashMap<StockUnitId, Decimal> = HashMap::new();
        let mut records = Vec::with_capacity(drafts.len());

        for draft in drafts {
            validate_quantity(draft.quantity_adjusted)?;
            // Length rules bind what a user types, not reasons written by transfers.
            let reason = match draft.source {
                AdjustmentSource::Manual => self.rules.validate(&draft.reason)?,
                AdjustmentSource::TransferDispatch(_)
                | AdjustmentSource::TransferReceipt(_)
                | AdjustmentSource::TransferCancellation(_) => draft.reason.trim().to_string(),
            };

            let available = match running.get(&draft.stock_unit_id) {
                Some(&quantity) => quantity,
                None => self.quantity_of(draft.stock_unit_id)?,
            };
            let after = available + draft.quantity_adjusted;
            if after < Decimal::ZERO {
                return Err(StockError::InsufficientStock {
                    stock_unit_id: draft.stock_unit_id,
                    available,
                    adjustment: draft.quantity_adjusted,
                });
            }
            running.insert(draft.stock_unit_id, after);

            records.push(StockAdjustment {
                id: AdjustmentId::new(),
                stock_unit_id: draft.stock_unit_id,
                quantity_adjusted: draft.quantity_adjusted,
                reason,
                adjustment_date: draft.adjustment_date,
                created_by: ctx.user_id,
                created_at: ctx.now,
                source: draft.source,
            });
        }

        Ok(records)
    }
}
