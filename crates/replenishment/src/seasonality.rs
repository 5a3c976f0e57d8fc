//! Forward-looking seasonal demand adjustment.
//!
//! Only events that start within the lookahead window count. An event that is
//! already underway does not raise the multiplier: the point is to provision
//! ahead of demand.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SEASONAL_LOOKAHEAD_DAYS;

/// A recurring seasonal event (e.g. "Prime Day", "Q4 holidays").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalEvent {
    pub name: String,
    pub start_month: u32,
    pub start_day: u32,
    pub end_month: u32,
    pub end_day: u32,
    pub base_multiplier: f64,
    /// Multiplier learned from past occurrences; preferred when present.
    pub learned_multiplier: Option<f64>,
    pub active: bool,
}

impl SeasonalEvent {
    /// Learned multiplier when usable, otherwise the configured base.
    pub fn effective_multiplier(&self) -> Option<f64> {
        let usable = |m: f64| m.is_finite() && m > 0.0;
        self.learned_multiplier
            .filter(|m| usable(*m))
            .or(Some(self.base_multiplier).filter(|m| usable(*m)))
    }

    /// This event's start date in `year`. Feb 29 falls back to Feb 28 in common years.
    pub fn start_in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.start_month, self.start_day).or_else(|| {
            (self.start_month == 2 && self.start_day == 29)
                .then(|| NaiveDate::from_ymd_opt(year, 2, 28))
                .flatten()
        })
    }
}

/// Seasonal event data as delivered to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SeasonalFeed {
    Available(Vec<SeasonalEvent>),
    /// The event store could not be read (e.g. feature not provisioned).
    Unavailable(String),
}

/// Demand multiplier applied to every SKU in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalAdjustment {
    pub multiplier: f64,
    pub note: Option<String>,
    pub event: Option<String>,
}

impl SeasonalAdjustment {
    pub fn none() -> Self {
        Self {
            multiplier: 1.0,
            note: None,
            event: None,
        }
    }
}

impl Default for SeasonalAdjustment {
    fn default() -> Self {
        Self::none()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SeasonalityResolver {
    lookahead_days: i64,
}

impl Default for SeasonalityResolver {
    fn default() -> Self {
        Self {
            lookahead_days: SEASONAL_LOOKAHEAD_DAYS,
        }
    }
}

impl SeasonalityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the strongest upcoming event.
    ///
    /// Candidates start between today and today + lookahead (inclusive). The
    /// multiplier starts at 1.0 and is only ever raised; ties keep the first
    /// event seen. An unavailable feed degrades to no seasonality.
    pub fn resolve(&self, today: NaiveDate, feed: &SeasonalFeed) -> SeasonalAdjustment {
        let events = match feed {
            SeasonalFeed::Available(events) => events,
            SeasonalFeed::Unavailable(reason) => {
                warn!(reason = %reason, "seasonal events unavailable; using no seasonality");
                return SeasonalAdjustment {
                    note: Some(format!("seasonality unavailable: {reason}")),
                    ..SeasonalAdjustment::none()
                };
            }
        };

        let mut best = SeasonalAdjustment::none();

        for event in events.iter().filter(|e| e.active) {
            let Some(start) = event.start_in_year(today.year()) else {
                debug!(event = %event.name, "seasonal event has no valid start date");
                continue;
            };

            let days_until = (start - today).num_days();
            if !(0..=self.lookahead_days).contains(&days_until) {
                continue;
            }

            let Some(multiplier) = event.effective_multiplier() else {
                continue;
            };

            if multiplier > best.multiplier {
                best = SeasonalAdjustment {
                    multiplier,
                    note: Some(format!(
                        "{} starts in {} days (×{:.2})",
                        event.name, days_until, multiplier
                    )),
                    event: Some(event.name.clone()),
                };
            }
        }

        debug!(multiplier = best.multiplier, event = ?best.event, "seasonality resolved");
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(name: &str, start: (u32, u32), end: (u32, u32), base: f64) -> SeasonalEvent {
        SeasonalEvent {
            name: name.to_string(),
            start_month: start.0,
            start_day: start.1,
            end_month: end.0,
            end_day: end.1,
            base_multiplier: base,
            learned_multiplier: None,
            active: true,
        }
    }

    fn resolve(today: NaiveDate, events: Vec<SeasonalEvent>) -> SeasonalAdjustment {
        SeasonalityResolver::new().resolve(today, &SeasonalFeed::Available(events))
    }

    #[test]
    fn no_events_means_neutral_multiplier() {
        assert_eq!(resolve(date(2026, 3, 1), vec![]), SeasonalAdjustment::none());
    }

    #[test]
    fn upcoming_event_within_window_applies() {
        let adj = resolve(date(2026, 6, 20), vec![event("Prime Day", (7, 15), (7, 17), 1.8)]);
        assert_eq!(adj.multiplier, 1.8);
        assert_eq!(adj.event.as_deref(), Some("Prime Day"));
        assert_eq!(adj.note.as_deref(), Some("Prime Day starts in 25 days (×1.80)"));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let today = date(2026, 6, 1);
        assert_eq!(resolve(today, vec![event("Today", (6, 1), (6, 3), 1.2)]).multiplier, 1.2);
        assert_eq!(resolve(today, vec![event("Day30", (7, 1), (7, 3), 1.3)]).multiplier, 1.3);
        assert_eq!(resolve(today, vec![event("Day31", (7, 2), (7, 3), 1.4)]).multiplier, 1.0);
    }

    #[test]
    fn event_in_progress_is_not_applied() {
        // Started yesterday, ends next week.
        let adj = resolve(date(2026, 11, 25), vec![event("Holiday", (11, 24), (12, 31), 2.5)]);
        assert_eq!(adj.multiplier, 1.0);
        assert!(adj.event.is_none());
    }

    #[test]
    fn learned_multiplier_preferred_and_highest_wins() {
        let mut bf = event("Black Friday", (11, 27), (11, 30), 1.5);
        bf.learned_multiplier = Some(2.2);
        let cm = event("Cyber Monday", (11, 30), (11, 30), 2.0);
        let adj = resolve(date(2026, 11, 10), vec![cm, bf]);
        assert_eq!(adj.multiplier, 2.2);
        assert_eq!(adj.event.as_deref(), Some("Black Friday"));
    }

    #[test]
    fn ties_keep_first_seen() {
        let a = event("A", (5, 10), (5, 12), 1.5);
        let b = event("B", (5, 11), (5, 12), 1.5);
        let adj = resolve(date(2026, 5, 1), vec![a, b]);
        assert_eq!(adj.event.as_deref(), Some("A"));
    }

    #[test]
    fn inactive_and_dampening_events_do_not_apply() {
        let mut off = event("Off", (5, 10), (5, 12), 3.0);
        off.active = false;
        let slow = event("Slow", (5, 10), (5, 12), 0.7);
        assert_eq!(resolve(date(2026, 5, 1), vec![off, slow]).multiplier, 1.0);
    }

    #[test]
    fn leap_day_start_clamps_in_common_year() {
        let e = event("Leap", (2, 29), (3, 1), 1.1);
        assert_eq!(e.start_in_year(2027), Some(date(2027, 2, 28)));
        assert_eq!(e.start_in_year(2028), Some(date(2028, 2, 29)));
    }

    #[test]
    fn unavailable_feed_degrades_to_neutral() {
        let adj = SeasonalityResolver::new().resolve(
            date(2026, 5, 1),
            &SeasonalFeed::Unavailable("relation \"seasonal_events\" does not exist".to_string()),
        );
        assert_eq!(adj.multiplier, 1.0);
        assert!(adj.note.unwrap().starts_with("seasonality unavailable"));
    }
}
