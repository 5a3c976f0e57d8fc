//! Runs a forecast against a tenant's catalog.

use chrono::{NaiveDate, Utc};
use tracing::{info, instrument, warn};

use sellerdesk_core::TenantId;
use sellerdesk_replenishment::{ForecastConfig, ForecastEngine, ForecastReport, ReplenishmentError, SeasonalFeed};

use crate::catalog::{CatalogReader, StoreError};
use crate::jobs::{ForecastJob, ForecastJobId, ForecastJobStore};

/// Pulls a snapshot through a `CatalogReader` and hands it to the engine.
///
/// Snapshot failures abort the run; seasonal feed failures only degrade it.
#[derive(Debug, Clone)]
pub struct ForecastRunner<R> {
    reader: R,
}

impl<R> ForecastRunner<R>
where
    R: CatalogReader,
{
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    #[instrument(skip(self, config), fields(tenant_id = %tenant_id.as_uuid(), channel = %config.channel), err)]
    pub async fn run(
        &self,
        tenant_id: TenantId,
        today: NaiveDate,
        config: ForecastConfig,
    ) -> Result<ForecastReport, ReplenishmentError> {
        let engine = ForecastEngine::new(config)?;
        self.run_engine(&engine, tenant_id, today).await
    }

    /// Like `run`, but records the invocation in `jobs`.
    ///
    /// Invalid configuration is rejected before any job is recorded.
    pub async fn run_tracked(
        &self,
        jobs: &ForecastJobStore,
        tenant_id: TenantId,
        today: NaiveDate,
        config: ForecastConfig,
    ) -> Result<(ForecastJobId, Result<ForecastReport, ReplenishmentError>), ReplenishmentError> {
        let engine = ForecastEngine::new(config)?;

        let mut job = ForecastJob::start(tenant_id, engine.config().channel.clone(), Utc::now());
        let job_id = job.id;
        jobs.insert(job.clone())
            .map_err(|e| ReplenishmentError::data_access(e.to_string()))?;

        let outcome = self.run_engine(&engine, tenant_id, today).await;
        match &outcome {
            Ok(report) => job.complete(report.clone(), Utc::now()),
            Err(e) => job.fail(e.to_string(), Utc::now()),
        }
        if let Err(e) = jobs.update(&job) {
            // Evicted mid-run by newer jobs; the caller still gets the outcome.
            warn!(job_id = %job_id, error = %e, "forecast job record not updated");
        }

        Ok((job_id, outcome))
    }

    async fn run_engine(
        &self,
        engine: &ForecastEngine,
        tenant_id: TenantId,
        today: NaiveDate,
    ) -> Result<ForecastReport, ReplenishmentError> {
        let snapshot = self
            .reader
            .load_snapshot(tenant_id, &engine.config().channel)
            .await
            .map_err(|e| ReplenishmentError::data_access(e.to_string()))?;

        let seasonal = match self.reader.seasonal_events(tenant_id).await {
            Ok(events) => SeasonalFeed::Available(events),
            Err(e) => {
                match &e {
                    StoreError::Unavailable(_) => warn!(error = %e, "seasonal feed not provisioned"),
                    StoreError::Database(_) => warn!(error = %e, "seasonal feed read failed"),
                }
                SeasonalFeed::Unavailable(e.to_string())
            }
        };

        let report = engine.run(today, &snapshot, &seasonal);
        info!(
            tenant_id = %tenant_id,
            rows = snapshot.rows.len(),
            recommended = report.summary.total_skus_recommended,
            deferred_past_horizon = report.summary.units_deferred_past_horizon,
            "forecast run finished"
        );
        Ok(report)
    }
}
