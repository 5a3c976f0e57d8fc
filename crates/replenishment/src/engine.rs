//! One forecast run, end to end.

use chrono::{Days, NaiveDate};
use tracing::{debug, info};

use crate::allocator::CapacityAllocator;
use crate::calculator::ReplenishmentCalculator;
use crate::config::{ForecastConfig, SCHEDULING_HORIZON_DAYS, URGENCY_THRESHOLD_DAYS};
use crate::error::ReplenishmentError;
use crate::loader::DemandProfileLoader;
use crate::planner::BatchPlanner;
use crate::recommendation::ReplenishmentRecommendation;
use crate::reporter::{ForecastReport, ForecastReporter};
use crate::seasonality::{SeasonalFeed, SeasonalityResolver};
use crate::snapshot::CatalogSnapshot;

/// Runs the pipeline for a validated configuration.
///
/// Deterministic: the same snapshot, feed, date and configuration always
/// produce the same report.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    config: ForecastConfig,
}

impl ForecastEngine {
    pub fn new(config: ForecastConfig) -> Result<Self, ReplenishmentError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn run(&self, today: NaiveDate, snapshot: &CatalogSnapshot, seasonal: &SeasonalFeed) -> ForecastReport {
        let cfg = &self.config;

        let loaded = DemandProfileLoader::new(cfg.channel.clone()).load(snapshot);
        let seasonality = SeasonalityResolver::new().resolve(today, seasonal);

        let calculator = ReplenishmentCalculator::new(cfg.days_target);
        let planner = BatchPlanner::new(cfg.preferred_batch_size, cfg.min_shipment_size);

        let mut recommendations: Vec<ReplenishmentRecommendation> = Vec::new();
        for profile in &loaded.profiles {
            let calc = calculator.calculate(profile, &seasonality);
            if !calc.include {
                continue;
            }

            let batches = planner.plan(
                calc.needed_units,
                profile.velocity,
                profile.current_inventory(),
                today,
            );
            let planned: u64 = batches.iter().map(|b| b.quantity).sum();

            debug!(
                sku = %profile.sku,
                needed = calc.needed_units,
                days_of_stock = calc.days_of_stock,
                batches = batches.len(),
                "sku planned"
            );

            recommendations.push(ReplenishmentRecommendation {
                sku: profile.sku.clone(),
                title: profile.title.clone(),
                channel: profile.channel.clone(),
                needed_units: calc.needed_units,
                days_of_stock: calc.days_of_stock,
                urgent: calc.days_of_stock < URGENCY_THRESHOLD_DAYS,
                batches,
                unscheduled_units: calc.needed_units - planned,
                breakdown: calc.breakdown,
            });
        }

        let horizon_end = today
            .checked_add_days(Days::new(SCHEDULING_HORIZON_DAYS as u64))
            .unwrap_or(NaiveDate::MAX);
        let allocation = CapacityAllocator::new(cfg.daily_capacity, horizon_end).allocate(
            recommendations
                .iter()
                .flat_map(|r| r.batches.iter().map(move |b| (r.sku.as_str(), b))),
        );

        let report = ForecastReporter::new(cfg.clone()).report(
            today,
            recommendations,
            allocation,
            loaded.skipped,
            seasonality,
        );

        info!(
            channel = %cfg.channel,
            recommended = report.summary.total_skus_recommended,
            units_needed = report.summary.total_units_needed,
            shipments = report.summary.total_shipments,
            urgent = report.summary.urgent_skus,
            "replenishment forecast computed"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seasonality::SeasonalEvent;
    use crate::snapshot::{CatalogRow, InventoryRecord, ProductRecord, SkuChannelMapping, VelocityRecord};
    use proptest::prelude::*;
    use sellerdesk_core::{DomainError, ProductId};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 6).unwrap()
    }

    fn day(offset: u64) -> NaiveDate {
        today().checked_add_days(Days::new(offset)).unwrap()
    }

    fn row(sku: &str, velocity: f64, available: i64) -> CatalogRow {
        let product_id = ProductId::new();
        CatalogRow {
            mapping: SkuChannelMapping {
                sku: sku.to_string(),
                channel: "amazon".to_string(),
                product_id: Some(product_id),
                channel_velocity: None,
                active: true,
            },
            product: Some(ProductRecord {
                product_id,
                sku: sku.to_string(),
                title: format!("{sku} title"),
                is_parent: false,
                parent_sku: None,
                variation_count: 0,
                lead_time_days: 30,
            }),
            inventory: Some(InventoryRecord {
                sku: sku.to_string(),
                available,
                inbound_working: 0,
                inbound_shipped: 0,
                inbound_receiving: 0,
            }),
            velocity: Some(VelocityRecord {
                sku: sku.to_string(),
                velocity_30d: velocity,
                units_sold_30d: (velocity * 30.0).round() as i64,
            }),
        }
    }

    fn engine(cfg: ForecastConfig) -> ForecastEngine {
        ForecastEngine::new(cfg).unwrap()
    }

    fn no_events() -> SeasonalFeed {
        SeasonalFeed::Available(Vec::new())
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let err = ForecastEngine::new(ForecastConfig {
            preferred_batch_size: 0,
            ..ForecastConfig::default()
        })
        .unwrap_err();
        assert_eq!(
            err,
            ReplenishmentError::InvalidConfig(DomainError::validation("preferredBatchSize must be >= 1"))
        );
    }

    #[test]
    fn scenario_steady_seller_from_empty() {
        let cfg = ForecastConfig {
            days_target: 45,
            daily_capacity: 10_000,
            preferred_batch_size: 100,
            min_shipment_size: 10,
            ..ForecastConfig::default()
        };
        let snap = CatalogSnapshot::new(vec![row("A", 10.0, 0)]);
        let report = engine(cfg).run(today(), &snap, &no_events());

        let rec = &report.recommendations[0];
        assert_eq!(rec.needed_units, 450);
        let quantities: Vec<u64> = rec.batches.iter().map(|b| b.quantity).collect();
        assert_eq!(quantities, vec![90, 90, 90, 90]);
        assert_eq!(rec.unscheduled_units, 90);
        assert!(rec.urgent);

        let dates: Vec<NaiveDate> = report
            .capacity_adjusted_shipments
            .iter()
            .map(|s| s.batch.ship_date)
            .collect();
        assert_eq!(dates, vec![day(0), day(30), day(60), day(90)]);
    }

    #[test]
    fn scenario_shared_day_over_capacity() {
        let cfg = ForecastConfig {
            days_target: 10,
            daily_capacity: 150,
            preferred_batch_size: 100,
            min_shipment_size: 10,
            ..ForecastConfig::default()
        };
        // Each SKU needs exactly one 100-unit batch today.
        let snap = CatalogSnapshot::new(vec![row("A", 10.0, 0), row("B", 10.0, 0)]);
        let report = engine(cfg).run(today(), &snap, &no_events());

        let got: Vec<(&str, NaiveDate, u64)> = report
            .capacity_adjusted_shipments
            .iter()
            .map(|s| (s.sku.as_str(), s.batch.ship_date, s.batch.quantity))
            .collect();
        assert_eq!(got, vec![("A", day(0), 100), ("B", day(0), 50), ("B", day(1), 50)]);
    }

    #[test]
    fn scenario_need_below_minimum_shipment() {
        let cfg = ForecastConfig {
            days_target: 3,
            min_shipment_size: 5,
            ..ForecastConfig::default()
        };
        let snap = CatalogSnapshot::new(vec![row("A", 1.0, 0)]);
        let report = engine(cfg).run(today(), &snap, &no_events());

        let rec = &report.recommendations[0];
        assert_eq!(rec.needed_units, 3);
        assert!(rec.batches.is_empty());
        assert_eq!(rec.unscheduled_units, 3);
        assert!(report.capacity_adjusted_shipments.is_empty());
    }

    #[test]
    fn zero_velocity_skus_never_recommended() {
        let snap = CatalogSnapshot::new(vec![row("DEAD", 0.0, 0), row("LIVE", 1.0, 0)]);
        let report = engine(ForecastConfig::default()).run(today(), &snap, &no_events());
        assert!(report.recommendations.iter().all(|r| r.sku != "DEAD"));
        assert_eq!(report.summary.skipped.zero_velocity, 1);
    }

    #[test]
    fn upcoming_event_raises_need_but_running_event_does_not() {
        let cfg = ForecastConfig {
            days_target: 30,
            ..ForecastConfig::default()
        };
        let snap = CatalogSnapshot::new(vec![row("A", 2.0, 0)]);

        let upcoming = SeasonalFeed::Available(vec![SeasonalEvent {
            name: "Spring Sale".to_string(),
            start_month: 4,
            start_day: 20,
            end_month: 4,
            end_day: 27,
            base_multiplier: 1.5,
            learned_multiplier: None,
            active: true,
        }]);
        let report = engine(cfg.clone()).run(today(), &snap, &upcoming);
        assert_eq!(report.recommendations[0].needed_units, 90);
        assert_eq!(report.summary.seasonality.multiplier, 1.5);

        let running = SeasonalFeed::Available(vec![SeasonalEvent {
            name: "Easter Week".to_string(),
            start_month: 4,
            start_day: 1,
            end_month: 4,
            end_day: 12,
            base_multiplier: 3.0,
            learned_multiplier: None,
            active: true,
        }]);
        let report = engine(cfg).run(today(), &snap, &running);
        assert_eq!(report.recommendations[0].needed_units, 60);
        assert_eq!(report.summary.seasonality.multiplier, 1.0);
    }

    #[test]
    fn unavailable_seasonality_does_not_fail_the_run() {
        let snap = CatalogSnapshot::new(vec![row("A", 2.0, 0)]);
        let report = engine(ForecastConfig::default()).run(
            today(),
            &snap,
            &SeasonalFeed::Unavailable("not provisioned".to_string()),
        );
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.summary.seasonality.multiplier, 1.0);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        })]

        /// Re-running on the same inputs yields the same report, and every
        /// recommendation honors its batch invariants.
        #[test]
        fn runs_are_deterministic_and_batches_stay_in_bounds(
            skus in prop::collection::vec((0.0f64..40.0, 0i64..2_000), 0..15),
            days_target in 1u32..120,
            daily_capacity in 1u64..1_000,
            min_shipment_size in 1u64..50,
            preferred_batch_size in 1u64..400,
        ) {
            let rows: Vec<CatalogRow> = skus
                .iter()
                .enumerate()
                .map(|(i, (v, inv))| row(&format!("SKU-{i:02}"), *v, *inv))
                .collect();
            let snap = CatalogSnapshot::new(rows);
            let cfg = ForecastConfig {
                days_target,
                daily_capacity,
                min_shipment_size,
                preferred_batch_size,
                ..ForecastConfig::default()
            };
            let e = engine(cfg);

            let first = e.run(today(), &snap, &no_events());
            let second = e.run(today(), &snap, &no_events());
            prop_assert_eq!(&first, &second);

            for rec in &first.recommendations {
                prop_assert!(rec.planned_units() <= rec.needed_units);
                prop_assert!(rec.batches.iter().all(|b| b.quantity >= min_shipment_size));
                prop_assert!(rec.breakdown.velocity > 0.0);
            }

            let scheduled: u64 = first.capacity_adjusted_shipments.iter().map(|s| s.batch.quantity).sum();
            let planned: u64 = first.recommendations.iter().map(|r| r.planned_units()).sum();
            prop_assert_eq!(scheduled + first.summary.units_deferred_past_horizon, planned);
        }
    }
}
