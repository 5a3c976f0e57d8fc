//! Capacity leveling across all SKUs' batches.
//!
//! Single-pass, greedy, FIFO by discovery order: a day over its ceiling fills
//! batches in the order they were planned and pushes each unallocated remainder
//! one day forward, where it is re-evaluated with that day's own load. Overflow
//! can cascade over several days. Nothing moves past the horizon end; what would
//! is dropped and reported, to be recomputed on the next run.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::planner::ShipmentBatch;

/// A batch after leveling. Date and quantity may differ from the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityAdjustedShipment {
    pub sku: String,
    #[serde(flatten)]
    pub batch: ShipmentBatch,
    pub planned_date: NaiveDate,
    pub deferred_days: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Chronological; same-day shipments keep allocation order.
    pub shipments: Vec<CapacityAdjustedShipment>,
    /// Units per SKU that would have been deferred past the horizon end.
    pub dropped: BTreeMap<String, u64>,
}

impl Allocation {
    pub fn dropped_units(&self) -> u64 {
        self.dropped.values().sum()
    }
}

#[derive(Debug, Clone)]
struct Pending {
    sku: String,
    planned: ShipmentBatch,
    quantity: u64,
    /// Units of this batch already granted on earlier days.
    shipped: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct CapacityAllocator {
    daily_capacity: u64,
    horizon_end: NaiveDate,
}

impl CapacityAllocator {
    pub fn new(daily_capacity: u64, horizon_end: NaiveDate) -> Self {
        Self {
            daily_capacity,
            horizon_end,
        }
    }

    /// Level `batches` (in discovery order) against the daily ceiling.
    pub fn allocate<'a, I>(&self, batches: I) -> Allocation
    where
        I: IntoIterator<Item = (&'a str, &'a ShipmentBatch)>,
    {
        let mut queue: BTreeMap<NaiveDate, Vec<Pending>> = BTreeMap::new();
        for (sku, batch) in batches {
            queue.entry(batch.ship_date).or_default().push(Pending {
                sku: sku.to_string(),
                planned: *batch,
                quantity: batch.quantity,
                shipped: 0,
            });
        }

        let mut out = Allocation::default();

        while let Some((date, entries)) = queue.pop_first() {
            let requested: u64 = entries.iter().map(|e| e.quantity).sum();

            if requested <= self.daily_capacity {
                for e in entries {
                    out.shipments.push(shipment(&e, date, e.quantity));
                }
                continue;
            }

            debug!(%date, requested, capacity = self.daily_capacity, "day over capacity; deferring overflow");

            let mut room = self.daily_capacity;
            for e in entries {
                let granted = e.quantity.min(room);
                room -= granted;
                if granted > 0 {
                    out.shipments.push(shipment(&e, date, granted));
                }

                let overflow = e.quantity - granted;
                if overflow == 0 {
                    continue;
                }

                match date.succ_opt().filter(|next| *next <= self.horizon_end) {
                    Some(next) => queue.entry(next).or_default().push(Pending {
                        quantity: overflow,
                        shipped: e.shipped + granted,
                        ..e
                    }),
                    None => {
                        debug!(sku = %e.sku, overflow, "overflow falls past horizon; dropped this run");
                        *out.dropped.entry(e.sku).or_default() += overflow;
                    }
                }
            }
        }

        // Already chronological by construction; keep it explicit and stable.
        out.shipments.sort_by_key(|s| s.batch.ship_date);
        out
    }
}

fn shipment(pending: &Pending, date: NaiveDate, quantity: u64) -> CapacityAdjustedShipment {
    // Pre-batch estimate plus every unit of this batch shipped so far.
    let projected_inventory = pending
        .planned
        .projected_inventory
        .saturating_sub(pending.planned.quantity)
        .saturating_add(pending.shipped)
        .saturating_add(quantity);

    CapacityAdjustedShipment {
        sku: pending.sku.clone(),
        batch: ShipmentBatch {
            ship_date: date,
            quantity,
            projected_inventory,
        },
        planned_date: pending.planned.ship_date,
        deferred_days: (date - pending.planned.ship_date).num_days(),
    }
}
