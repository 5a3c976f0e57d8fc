//! Needed-units calculation with a full audit trail.

use serde::{Deserialize, Serialize};

use crate::config::UNKNOWN_DAYS_OF_STOCK;
use crate::profile::{InventoryPosition, SkuDemandProfile, VelocitySource};
use crate::seasonality::SeasonalAdjustment;

/// Every intermediate value behind a recommendation, so an operator can
/// reproduce the number by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationBreakdown {
    pub velocity: f64,
    pub velocity_source: VelocitySource,
    pub target_days: u32,
    pub base_demand: f64,
    pub seasonality_multiplier: f64,
    pub seasonality_note: Option<String>,
    pub adjusted_demand: f64,
    pub current_inventory: i64,
    pub inventory: InventoryPosition,
    pub needed_units: u64,
    pub days_of_stock: f64,
    pub lead_time_days: u32,
    pub units_sold_30d: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub needed_units: u64,
    pub days_of_stock: f64,
    /// Whether the SKU belongs in the output at all.
    pub include: bool,
    pub breakdown: CalculationBreakdown,
}

#[derive(Debug, Clone, Copy)]
pub struct ReplenishmentCalculator {
    target_days: u32,
}

impl ReplenishmentCalculator {
    pub fn new(target_days: u32) -> Self {
        Self { target_days }
    }

    /// Needed units = max(0, velocity × target × multiplier − inventory), rounded.
    ///
    /// A SKU is included when it needs units or when it is under target
    /// coverage; a SKU whose need rounds to zero can still be short on days.
    pub fn calculate(&self, profile: &SkuDemandProfile, seasonality: &SeasonalAdjustment) -> Calculation {
        let velocity = profile.velocity;
        let current_inventory = profile.current_inventory();

        let base_demand = velocity * f64::from(self.target_days);
        let adjusted_demand = base_demand * seasonality.multiplier;
        let shortfall = (adjusted_demand - current_inventory as f64).round();
        let needed_units = if shortfall.is_finite() && shortfall > 0.0 {
            shortfall as u64
        } else {
            0
        };

        let days_of_stock = if velocity > 0.0 {
            current_inventory as f64 / velocity
        } else {
            UNKNOWN_DAYS_OF_STOCK
        };

        let include = needed_units > 0 || days_of_stock < f64::from(self.target_days);

        Calculation {
            needed_units,
            days_of_stock,
            include,
            breakdown: CalculationBreakdown {
                velocity,
                velocity_source: profile.velocity_source,
                target_days: self.target_days,
                base_demand,
                seasonality_multiplier: seasonality.multiplier,
                seasonality_note: seasonality.note.clone(),
                adjusted_demand,
                current_inventory,
                inventory: profile.inventory,
                needed_units,
                days_of_stock,
                lead_time_days: profile.lead_time_days,
                units_sold_30d: profile.units_sold_30d,
            },
        }
    }
}
