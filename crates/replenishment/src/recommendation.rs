use serde::{Deserialize, Serialize};

use crate::calculator::CalculationBreakdown;
use crate::planner::ShipmentBatch;

/// What to send for one SKU, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplenishmentRecommendation {
    pub sku: String,
    pub title: String,
    pub channel: String,
    pub needed_units: u64,
    pub days_of_stock: f64,
    pub urgent: bool,
    /// Planned batches, in ship-date order. Quantities sum to at most `needed_units`.
    pub batches: Vec<ShipmentBatch>,
    /// Needed units not covered by a batch this run (below minimum or past the horizon).
    pub unscheduled_units: u64,
    pub breakdown: CalculationBreakdown,
}

impl ReplenishmentRecommendation {
    pub fn planned_units(&self) -> u64 {
        self.batches.iter().map(|b| b.quantity).sum()
    }
}
