use serde::{Deserialize, Serialize};

use crate::snapshot::InventoryRecord;

/// Where a profile's velocity figure came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocitySource {
    Channel,
    Global,
}

/// Fulfillment-network inventory, split by state.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryPosition {
    pub available: i64,
    pub inbound_working: i64,
    pub inbound_shipped: i64,
    pub inbound_receiving: i64,
}

impl InventoryPosition {
    /// Available plus everything inbound, floored at zero.
    pub fn total(&self) -> i64 {
        self.available
            .saturating_add(self.inbound_working)
            .saturating_add(self.inbound_shipped)
            .saturating_add(self.inbound_receiving)
            .max(0)
    }
}

impl From<&InventoryRecord> for InventoryPosition {
    fn from(r: &InventoryRecord) -> Self {
        Self {
            available: r.available,
            inbound_working: r.inbound_working,
            inbound_shipped: r.inbound_shipped,
            inbound_receiving: r.inbound_receiving,
        }
    }
}

/// Demand-side view of one sellable SKU on one channel, built fresh per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuDemandProfile {
    pub sku: String,
    pub channel: String,
    pub title: String,
    /// Units/day; always > 0 for a loaded profile.
    pub velocity: f64,
    pub velocity_source: VelocitySource,
    pub inventory: InventoryPosition,
    pub lead_time_days: u32,
    pub units_sold_30d: Option<i64>,
}

impl SkuDemandProfile {
    pub fn current_inventory(&self) -> i64 {
        self.inventory.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_all_states() {
        let p = InventoryPosition {
            available: 10,
            inbound_working: 5,
            inbound_shipped: 3,
            inbound_receiving: 2,
        };
        assert_eq!(p.total(), 20);
    }

    #[test]
    fn negative_adjustments_floor_at_zero() {
        let p = InventoryPosition {
            available: -8,
            inbound_working: 2,
            ..InventoryPosition::default()
        };
        assert_eq!(p.total(), 0);
    }

    #[test]
    fn extreme_store_values_saturate_instead_of_overflowing() {
        let p = InventoryPosition {
            available: i64::MAX,
            inbound_working: i64::MAX,
            inbound_shipped: 1,
            inbound_receiving: 0,
        };
        assert_eq!(p.total(), i64::MAX);

        let p = InventoryPosition {
            available: i64::MIN,
            inbound_working: -1,
            ..InventoryPosition::default()
        };
        assert_eq!(p.total(), 0);
    }
}
