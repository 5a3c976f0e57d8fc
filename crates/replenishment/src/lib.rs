//! `sellerdesk-replenishment`
//!
//! **Responsibility:** replenishment forecast and capacity-constrained shipment batching.
//!
//! Pure, deterministic domain logic:
//! - No IO. Catalog data arrives as a [`CatalogSnapshot`] read by the infra layer.
//! - No persisted state. Every run recomputes from scratch.
//! - No writes. Recommendations are advisory; turning them into shipments is
//!   someone else's workflow.
//!
//! Pipeline (one pass per invocation):
//! `DemandProfileLoader` → `ReplenishmentCalculator` (with `SeasonalityResolver`)
//! → `BatchPlanner` → `CapacityAllocator` → `ForecastReporter`.

pub mod allocator;
pub mod calculator;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod planner;
pub mod profile;
pub mod recommendation;
pub mod reporter;
pub mod seasonality;
pub mod snapshot;

pub use allocator::{Allocation, CapacityAdjustedShipment, CapacityAllocator};
pub use calculator::{Calculation, CalculationBreakdown, ReplenishmentCalculator};
pub use config::ForecastConfig;
pub use engine::ForecastEngine;
pub use error::ReplenishmentError;
pub use loader::{DemandProfileLoader, LoadedProfiles, SkipCounters};
pub use planner::{BatchPlanner, ShipmentBatch};
pub use profile::{InventoryPosition, SkuDemandProfile, VelocitySource};
pub use recommendation::ReplenishmentRecommendation;
pub use reporter::{ForecastReport, ForecastReporter, ForecastSummary, WeeklyCapacityWarning};
pub use seasonality::{SeasonalAdjustment, SeasonalEvent, SeasonalFeed, SeasonalityResolver};
pub use snapshot::{
    CatalogRow, CatalogSnapshot, InventoryRecord, ProductClass, ProductRecord, SkuChannelMapping,
    VelocityRecord,
};
