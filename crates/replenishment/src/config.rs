//! Run configuration and the engine's fixed constants.

use serde::{Deserialize, Serialize};

use sellerdesk_core::{DomainError, DomainResult};

/// Seasonal events are considered only if they start within this many days.
pub const SEASONAL_LOOKAHEAD_DAYS: i64 = 30;

/// Spacing between consecutive shipment batches of one SKU.
pub const BATCH_INTERVAL_DAYS: i64 = 30;

/// Nothing is scheduled (or deferred) past today + this many days.
pub const SCHEDULING_HORIZON_DAYS: i64 = 90;

/// SKUs with fewer days of stock than this are reported as urgent.
pub const URGENCY_THRESHOLD_DAYS: f64 = 14.0;

/// Days-of-stock reported when velocity is zero (coverage unknown/unconstrained).
pub const UNKNOWN_DAYS_OF_STOCK: f64 = 999.0;

/// Per-run forecast configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastConfig {
    /// Coverage window to provision for, in days.
    pub days_target: u32,
    /// Ceiling on total units shipped on any single day.
    pub daily_capacity: u64,
    /// Accepted and reported against; not enforced during leveling.
    pub weekly_capacity: u64,
    /// Sales channel whose SKU mappings are forecast.
    pub channel: String,
    /// Batches smaller than this are not worth a shipment.
    pub min_shipment_size: u64,
    pub preferred_batch_size: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            days_target: 60,
            daily_capacity: 500,
            weekly_capacity: 2500,
            channel: "amazon".to_string(),
            min_shipment_size: 10,
            preferred_batch_size: 100,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.days_target == 0 {
            return Err(DomainError::validation("daysTarget must be >= 1"));
        }
        if self.daily_capacity == 0 {
            return Err(DomainError::validation("dailyCapacity must be >= 1"));
        }
        if self.weekly_capacity == 0 {
            return Err(DomainError::validation("weeklyCapacity must be >= 1"));
        }
        if self.min_shipment_size == 0 {
            return Err(DomainError::validation("minShipmentSize must be >= 1"));
        }
        if self.preferred_batch_size == 0 {
            return Err(DomainError::validation("preferredBatchSize must be >= 1"));
        }
        if self.channel.trim().is_empty() {
            return Err(DomainError::validation("channel cannot be empty"));
        }
        Ok(())
    }
}
