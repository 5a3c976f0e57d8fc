//! Response aggregation. Pure: builds the payload, nothing else.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::allocator::{Allocation, CapacityAdjustedShipment};
use crate::config::{ForecastConfig, URGENCY_THRESHOLD_DAYS};
use crate::loader::SkipCounters;
use crate::recommendation::ReplenishmentRecommendation;
use crate::seasonality::SeasonalAdjustment;

/// An ISO week whose leveled total exceeds the weekly capacity.
///
/// Informational: leveling enforces the daily ceiling only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyCapacityWarning {
    pub week_start: NaiveDate,
    pub scheduled_units: u64,
    pub weekly_capacity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSummary {
    pub total_skus_recommended: usize,
    pub total_units_needed: u64,
    pub total_shipments: usize,
    pub total_units_scheduled: u64,
    pub units_deferred_past_horizon: u64,
    pub urgent_skus: usize,
    pub skipped: SkipCounters,
    pub seasonality: SeasonalAdjustment,
    pub weekly_capacity_warnings: Vec<WeeklyCapacityWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub generated_on: NaiveDate,
    pub config: ForecastConfig,
    pub recommendations: Vec<ReplenishmentRecommendation>,
    pub capacity_adjusted_shipments: Vec<CapacityAdjustedShipment>,
    pub summary: ForecastSummary,
}

#[derive(Debug, Clone)]
pub struct ForecastReporter {
    config: ForecastConfig,
}

impl ForecastReporter {
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    pub fn report(
        &self,
        generated_on: NaiveDate,
        recommendations: Vec<ReplenishmentRecommendation>,
        allocation: Allocation,
        skipped: SkipCounters,
        seasonality: SeasonalAdjustment,
    ) -> ForecastReport {
        let summary = ForecastSummary {
            total_skus_recommended: recommendations.len(),
            total_units_needed: recommendations.iter().map(|r| r.needed_units).sum(),
            total_shipments: allocation.shipments.len(),
            total_units_scheduled: allocation.shipments.iter().map(|s| s.batch.quantity).sum(),
            units_deferred_past_horizon: allocation.dropped_units(),
            urgent_skus: recommendations
                .iter()
                .filter(|r| r.days_of_stock < URGENCY_THRESHOLD_DAYS)
                .count(),
            skipped,
            seasonality,
            weekly_capacity_warnings: weekly_overages(&allocation.shipments, self.config.weekly_capacity),
        };

        ForecastReport {
            generated_on,
            config: self.config.clone(),
            recommendations,
            capacity_adjusted_shipments: allocation.shipments,
            summary,
        }
    }
}

fn weekly_overages(shipments: &[CapacityAdjustedShipment], weekly_capacity: u64) -> Vec<WeeklyCapacityWarning> {
    let mut weeks: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for s in shipments {
        let date = s.batch.ship_date;
        let week = date.iso_week();
        let Some(week_start) = NaiveDate::from_isoywd_opt(week.year(), week.week(), Weekday::Mon) else {
            continue;
        };
        *weeks.entry(week_start).or_default() += s.batch.quantity;
    }

    weeks
        .into_iter()
        .filter(|(_, units)| *units > weekly_capacity)
        .map(|(week_start, scheduled_units)| WeeklyCapacityWarning {
            week_start,
            scheduled_units,
            weekly_capacity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::CalculationBreakdown;
    use crate::planner::ShipmentBatch;
    use crate::profile::{InventoryPosition, VelocitySource};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn recommendation(sku: &str, needed_units: u64, days_of_stock: f64) -> ReplenishmentRecommendation {
        ReplenishmentRecommendation {
            sku: sku.to_string(),
            title: sku.to_string(),
            channel: "amazon".to_string(),
            needed_units,
            days_of_stock,
            urgent: days_of_stock < URGENCY_THRESHOLD_DAYS,
            batches: Vec::new(),
            unscheduled_units: needed_units,
            breakdown: CalculationBreakdown {
                velocity: 1.0,
                velocity_source: VelocitySource::Global,
                target_days: 60,
                base_demand: 60.0,
                seasonality_multiplier: 1.0,
                seasonality_note: None,
                adjusted_demand: 60.0,
                current_inventory: 0,
                inventory: InventoryPosition::default(),
                needed_units,
                days_of_stock,
                lead_time_days: 10,
                units_sold_30d: None,
            },
        }
    }

    fn shipment(sku: &str, ship_date: NaiveDate, quantity: u64) -> CapacityAdjustedShipment {
        CapacityAdjustedShipment {
            sku: sku.to_string(),
            batch: ShipmentBatch {
                ship_date,
                quantity,
                projected_inventory: quantity,
            },
            planned_date: ship_date,
            deferred_days: 0,
        }
    }

    #[test]
    fn summary_totals_and_urgency() {
        let config = ForecastConfig::default();
        let recs = vec![
            recommendation("A", 100, 3.0),
            recommendation("B", 50, 13.9),
            recommendation("C", 0, 20.0),
        ];
        let mut allocation = Allocation {
            shipments: vec![shipment("A", date(2026, 3, 2), 100), shipment("B", date(2026, 3, 2), 40)],
            ..Allocation::default()
        };
        allocation.dropped.insert("B".to_string(), 10);

        let skipped = SkipCounters {
            no_product: 1,
            parent_product: 2,
            zero_velocity: 3,
        };
        let report = ForecastReporter::new(config).report(
            date(2026, 3, 2),
            recs,
            allocation,
            skipped,
            SeasonalAdjustment::none(),
        );

        let s = &report.summary;
        assert_eq!(s.total_skus_recommended, 3);
        assert_eq!(s.total_units_needed, 150);
        assert_eq!(s.total_shipments, 2);
        assert_eq!(s.total_units_scheduled, 140);
        assert_eq!(s.units_deferred_past_horizon, 10);
        assert_eq!(s.urgent_skus, 2);
        assert_eq!(s.skipped, skipped);
        assert!(s.weekly_capacity_warnings.is_empty());
    }

    #[test]
    fn weeks_over_weekly_capacity_are_flagged() {
        // 2026-03-02 is a Monday; 03-08 is the Sunday of the same ISO week.
        let shipments = vec![
            shipment("A", date(2026, 3, 2), 60),
            shipment("B", date(2026, 3, 8), 50),
            shipment("A", date(2026, 3, 9), 100),
        ];
        let warnings = weekly_overages(&shipments, 100);
        assert_eq!(
            warnings,
            vec![WeeklyCapacityWarning {
                week_start: date(2026, 3, 2),
                scheduled_units: 110,
                weekly_capacity: 100,
            }]
        );
    }
}
