//! Splits a SKU's needed units into equalized, time-spaced shipment batches.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::{BATCH_INTERVAL_DAYS, SCHEDULING_HORIZON_DAYS};

/// One planned shipment to the fulfillment network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentBatch {
    pub ship_date: NaiveDate,
    pub quantity: u64,
    /// Estimated inventory right after this shipment lands, assuming linear
    /// depletion at the SKU's velocity.
    pub projected_inventory: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct BatchPlanner {
    preferred_batch_size: u64,
    min_shipment_size: u64,
    interval_days: u64,
    horizon_days: u64,
}

impl BatchPlanner {
    /// Sizes are expected to be validated (>= 1) by `ForecastConfig::validate`.
    pub fn new(preferred_batch_size: u64, min_shipment_size: u64) -> Self {
        Self {
            preferred_batch_size: preferred_batch_size.max(1),
            min_shipment_size: min_shipment_size.max(1),
            interval_days: BATCH_INTERVAL_DAYS as u64,
            horizon_days: SCHEDULING_HORIZON_DAYS as u64,
        }
    }

    /// Plan batches for `needed_units`, starting today.
    ///
    /// Batches are equalized (`ceil(needed / ceil(needed / preferred))`, never
    /// below the minimum shipment size) and spaced by the batch interval up to
    /// and including the horizon. A trailing batch below the minimum is dropped,
    /// and whatever does not fit before the horizon is left for the next run.
    pub fn plan(
        &self,
        needed_units: u64,
        velocity: f64,
        current_inventory: i64,
        today: NaiveDate,
    ) -> Vec<ShipmentBatch> {
        if needed_units == 0 {
            return Vec::new();
        }

        let total_batches = needed_units.div_ceil(self.preferred_batch_size);
        let batch_size = needed_units
            .div_ceil(total_batches)
            .max(self.min_shipment_size);

        let mut batches = Vec::new();
        let mut remaining = needed_units;
        let mut shipped: u64 = 0;
        let mut offset: u64 = 0;

        while remaining > 0 && offset <= self.horizon_days {
            let quantity = batch_size.min(remaining);

            if quantity >= self.min_shipment_size {
                let Some(ship_date) = today.checked_add_days(Days::new(offset)) else {
                    break;
                };
                let on_hand = current_inventory as f64 + shipped as f64 - velocity * offset as f64;
                batches.push(ShipmentBatch {
                    ship_date,
                    quantity,
                    projected_inventory: on_hand.max(0.0).round() as u64 + quantity,
                });
                shipped += quantity;
            }

            remaining -= quantity;
            offset += self.interval_days;
        }

        batches
    }
}
