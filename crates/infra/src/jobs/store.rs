//! In-process forecast job storage.

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use sellerdesk_core::TenantId;

use super::types::{ForecastJob, ForecastJobId};

/// Jobs kept per tenant before the oldest are evicted.
pub const DEFAULT_RETENTION_PER_TENANT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobStoreError {
    #[error("job not found: {0}")]
    NotFound(ForecastJobId),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Tenant-scoped job records, oldest first within each tenant.
#[derive(Debug)]
pub struct ForecastJobStore {
    jobs: RwLock<HashMap<TenantId, VecDeque<ForecastJob>>>,
    retention: usize,
}

impl Default for ForecastJobStore {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETENTION_PER_TENANT)
    }
}

impl ForecastJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retention: usize) -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
            retention: retention.max(1),
        }
    }

    /// Record a new job, evicting the tenant's oldest beyond retention.
    pub fn insert(&self, job: ForecastJob) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        let tenant_jobs = jobs.entry(job.tenant_id).or_default();
        tenant_jobs.push_back(job);
        while tenant_jobs.len() > self.retention {
            tenant_jobs.pop_front();
        }
        Ok(())
    }

    /// Replace a job record. The job must still be retained for its tenant.
    pub fn update(&self, job: &ForecastJob) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().map_err(poisoned)?;
        let slot = jobs
            .get_mut(&job.tenant_id)
            .and_then(|tenant_jobs| tenant_jobs.iter_mut().find(|j| j.id == job.id))
            .ok_or(JobStoreError::NotFound(job.id))?;
        *slot = job.clone();
        Ok(())
    }

    /// Fetch a job. Another tenant's job id reads as absent.
    pub fn get(&self, tenant_id: TenantId, job_id: ForecastJobId) -> Result<Option<ForecastJob>, JobStoreError> {
        let jobs = self.jobs.read().map_err(poisoned)?;
        Ok(jobs
            .get(&tenant_id)
            .and_then(|tenant_jobs| tenant_jobs.iter().find(|j| j.id == job_id))
            .cloned())
    }

    /// The tenant's retained jobs, newest first.
    pub fn list(&self, tenant_id: TenantId) -> Result<Vec<ForecastJob>, JobStoreError> {
        let jobs = self.jobs.read().map_err(poisoned)?;
        Ok(jobs
            .get(&tenant_id)
            .map(|tenant_jobs| tenant_jobs.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}

fn poisoned<T>(_: T) -> JobStoreError {
    JobStoreError::Storage("job store lock poisoned".to_string())
}
