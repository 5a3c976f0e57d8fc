//! Forecast job tracking.
//!
//! Every forecast invocation gets its own job record keyed by an explicit id,
//! so concurrent requests never share progress state. Records are
//! tenant-scoped and only the most recent runs per tenant are retained.

pub mod store;
pub mod types;

pub use store::{ForecastJobStore, JobStoreError, DEFAULT_RETENTION_PER_TENANT};
pub use types::{ForecastJob, ForecastJobId, ForecastJobStatus};
