//! Turns catalog rows into demand profiles, tallying everything it skips.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::profile::{InventoryPosition, SkuDemandProfile, VelocitySource};
use crate::snapshot::{CatalogRow, CatalogSnapshot, ProductClass};

/// Why SKUs were left out of a run. Skips are diagnostics, never errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipCounters {
    pub no_product: u32,
    pub parent_product: u32,
    pub zero_velocity: u32,
}

impl SkipCounters {
    pub fn total(&self) -> u32 {
        self.no_product + self.parent_product + self.zero_velocity
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedProfiles {
    /// In snapshot order.
    pub profiles: Vec<SkuDemandProfile>,
    pub skipped: SkipCounters,
}

/// Builds [`SkuDemandProfile`]s for one channel.
#[derive(Debug, Clone)]
pub struct DemandProfileLoader {
    channel: String,
}

impl DemandProfileLoader {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
        }
    }

    /// Load profiles from active mappings on this loader's channel.
    ///
    /// Rows for other channels and inactive mappings are not part of the run.
    /// A SKU that appears twice keeps its first mapping.
    pub fn load(&self, snapshot: &CatalogSnapshot) -> LoadedProfiles {
        let mut out = LoadedProfiles::default();
        let mut seen: HashSet<&str> = HashSet::new();

        for row in &snapshot.rows {
            if !row.mapping.active || row.mapping.channel != self.channel {
                continue;
            }
            if !seen.insert(row.mapping.sku.as_str()) {
                debug!(sku = %row.mapping.sku, "duplicate channel mapping ignored");
                continue;
            }
            if let Some(profile) = self.profile_for(row, &mut out.skipped) {
                out.profiles.push(profile);
            }
        }

        debug!(
            channel = %self.channel,
            loaded = out.profiles.len(),
            skipped = out.skipped.total(),
            "demand profiles loaded"
        );
        out
    }

    fn profile_for(&self, row: &CatalogRow, skipped: &mut SkipCounters) -> Option<SkuDemandProfile> {
        let sku = &row.mapping.sku;

        let Some(product) = &row.product else {
            debug!(sku = %sku, "skip: mapping has no linked product");
            skipped.no_product += 1;
            return None;
        };

        if product.classify() == ProductClass::Parent {
            debug!(sku = %sku, "skip: parent/variation container");
            skipped.parent_product += 1;
            return None;
        }

        let Some((velocity, velocity_source)) = resolve_velocity(row) else {
            debug!(sku = %sku, "skip: zero velocity");
            skipped.zero_velocity += 1;
            return None;
        };

        Some(SkuDemandProfile {
            sku: sku.clone(),
            channel: row.mapping.channel.clone(),
            title: product.title.clone(),
            velocity,
            velocity_source,
            inventory: row.inventory.as_ref().map(InventoryPosition::from).unwrap_or_default(),
            lead_time_days: product.lead_time_days,
            units_sold_30d: row.velocity.as_ref().map(|v| v.units_sold_30d),
        })
    }
}

/// Channel velocity when the channel reports a usable one, else the global figure.
fn resolve_velocity(row: &CatalogRow) -> Option<(f64, VelocitySource)> {
    let usable = |v: f64| v.is_finite() && v > 0.0;

    if let Some(v) = row.mapping.channel_velocity.filter(|v| usable(*v)) {
        return Some((v, VelocitySource::Channel));
    }
    row.velocity
        .as_ref()
        .map(|v| v.velocity_30d)
        .filter(|v| usable(*v))
        .map(|v| (v, VelocitySource::Global))
}
