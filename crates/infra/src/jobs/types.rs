//! Forecast job record and lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sellerdesk_core::{DomainError, TenantId};
use sellerdesk_replenishment::ForecastReport;

/// Unique forecast job identifier (UUIDv7, time-ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastJobId(pub Uuid);

impl ForecastJobId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ForecastJobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ForecastJobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ForecastJobId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::invalid_id(format!("job id: {e}")))
    }
}

/// Forecast job status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastJobStatus {
    Running,
    Completed { report: Box<ForecastReport> },
    Failed { error: String },
}

impl ForecastJobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ForecastJobStatus::Running)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ForecastJobStatus::Running => "running",
            ForecastJobStatus::Completed { .. } => "completed",
            ForecastJobStatus::Failed { .. } => "failed",
        }
    }
}

/// One forecast invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastJob {
    pub id: ForecastJobId,
    pub tenant_id: TenantId,
    pub channel: String,
    pub status: ForecastJobStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ForecastJob {
    pub fn start(tenant_id: TenantId, channel: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: ForecastJobId::new(),
            tenant_id,
            channel: channel.into(),
            status: ForecastJobStatus::Running,
            started_at: now,
            finished_at: None,
        }
    }

    pub fn complete(&mut self, report: ForecastReport, now: DateTime<Utc>) {
        self.status = ForecastJobStatus::Completed {
            report: Box::new(report),
        };
        self.finished_at = Some(now);
    }

    pub fn fail(&mut self, error: impl Into<String>, now: DateTime<Utc>) {
        self.status = ForecastJobStatus::Failed { error: error.into() };
        self.finished_at = Some(now);
    }

    pub fn report(&self) -> Option<&ForecastReport> {
        match &self.status {
            ForecastJobStatus::Completed { report } => Some(&**report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_sets_finish_time() {
        let now = Utc::now();
        let mut job = ForecastJob::start(TenantId::new(), "amazon", now);
        assert_eq!(job.status.label(), "running");
        assert!(!job.status.is_terminal());

        job.fail("catalog store unreachable", now);
        assert!(job.status.is_terminal());
        assert_eq!(job.finished_at, Some(now));
        assert!(job.report().is_none());
    }

    #[test]
    fn job_id_parses_uuid_text() {
        let id = ForecastJobId::new();
        assert_eq!(id.to_string().parse::<ForecastJobId>().unwrap(), id);
        assert!(matches!("nope".parse::<ForecastJobId>(), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn status_serializes_with_tag() {
        let json = serde_json::to_value(ForecastJobStatus::Failed {
            error: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "status": "failed", "error": "boom" }));
    }
}
