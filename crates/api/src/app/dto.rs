use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use sellerdesk_infra::jobs::{ForecastJob, ForecastJobId, ForecastJobStatus};
use sellerdesk_replenishment::{ForecastConfig, ForecastReport};

/// Body of `POST /replenishment/forecast`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ForecastRequest {
    pub days_target: Option<u32>,
    pub daily_capacity: Option<u64>,
    pub weekly_capacity: Option<u64>,
    pub channel: Option<String>,
    pub min_shipment_size: Option<u64>,
    pub preferred_batch_size: Option<u64>,
    /// Run as if today were this date.
    pub as_of: Option<NaiveDate>,
}

impl ForecastRequest {
    /// Overlay the supplied fields on the defaults. Validation happens in the engine.
    pub fn to_config(&self) -> ForecastConfig {
        let d = ForecastConfig::default();
        ForecastConfig {
            days_target: self.days_target.unwrap_or(d.days_target),
            daily_capacity: self.daily_capacity.unwrap_or(d.daily_capacity),
            weekly_capacity: self.weekly_capacity.unwrap_or(d.weekly_capacity),
            channel: self.channel.clone().unwrap_or(d.channel),
            min_shipment_size: self.min_shipment_size.unwrap_or(d.min_shipment_size),
            preferred_batch_size: self.preferred_batch_size.unwrap_or(d.preferred_batch_size),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResponse {
    pub job_id: ForecastJobId,
    #[serde(flatten)]
    pub report: ForecastReport,
}

/// Job listing entry (no report payload).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummaryDto {
    pub job_id: ForecastJobId,
    pub channel: String,
    pub status: &'static str,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<&ForecastJob> for JobSummaryDto {
    fn from(job: &ForecastJob) -> Self {
        Self {
            job_id: job.id,
            channel: job.channel.clone(),
            status: job.status.label(),
            started_at: job.started_at,
            finished_at: job.finished_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailDto {
    #[serde(flatten)]
    pub summary: JobSummaryDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ForecastReport>,
}

impl From<ForecastJob> for JobDetailDto {
    fn from(job: ForecastJob) -> Self {
        let summary = JobSummaryDto::from(&job);
        let (error, report) = match job.status {
            ForecastJobStatus::Running => (None, None),
            ForecastJobStatus::Completed { report } => (None, Some(*report)),
            ForecastJobStatus::Failed { error } => (Some(error), None),
        };
        Self { summary, error, report }
    }
}
