//! Replenishment forecast endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tracing::info;

use sellerdesk_auth::permissions::replenishment;
use sellerdesk_infra::jobs::ForecastJobId;

use crate::app::dto::{ForecastRequest, ForecastResponse, JobDetailDto, JobSummaryDto};
use crate::app::routes::common::CmdAuth;
use crate::app::{errors, services::AppServices};
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/forecast", post(run_forecast))
        .route("/jobs", get(list_jobs))
        .route("/jobs/:job_id", get(get_job))
}

/// POST /replenishment/forecast
///
/// Runs synchronously and returns the full report. The run is also recorded
/// as a job so it can be fetched again later.
pub async fn run_forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    body: Bytes,
) -> axum::response::Response {
    let auth = CmdAuth::requiring(replenishment::FORECAST_RUN);
    if let Err(e) = crate::authz::authorize_command(&tenant, &principal, &auth) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ForecastRequest::default()
    } else {
        match serde_json::from_slice::<ForecastRequest>(&body) {
            Ok(req) => req,
            Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_request", e.to_string()),
        }
    };

    let today = request.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let config = request.to_config();

    let (job_id, outcome) = match services
        .forecasts
        .run_tracked(&services.jobs, tenant.tenant_id(), today, config)
        .await
    {
        Ok(tracked) => tracked,
        Err(e) => return errors::replenishment_error_to_response(e),
    };

    match outcome {
        Ok(report) => {
            info!(
                job_id = %job_id,
                tenant_id = %tenant.tenant_id(),
                principal_id = %principal.principal_id(),
                "forecast served"
            );
            (StatusCode::OK, Json(ForecastResponse { job_id, report })).into_response()
        }
        Err(e) => errors::replenishment_error_to_response(e),
    }
}

/// GET /replenishment/jobs
pub async fn list_jobs(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    let auth = CmdAuth::requiring(replenishment::FORECAST_READ);
    if let Err(e) = crate::authz::authorize_command(&tenant, &principal, &auth) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    match services.jobs.list(tenant.tenant_id()) {
        Ok(jobs) => {
            let out: Vec<JobSummaryDto> = jobs.iter().map(JobSummaryDto::from).collect();
            (StatusCode::OK, Json(out)).into_response()
        }
        Err(e) => errors::job_store_error_to_response(e),
    }
}

/// GET /replenishment/jobs/:job_id
pub async fn get_job(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(job_id): Path<String>,
) -> axum::response::Response {
    let auth = CmdAuth::requiring(replenishment::FORECAST_READ);
    if let Err(e) = crate::authz::authorize_command(&tenant, &principal, &auth) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let job_id: ForecastJobId = match job_id.parse() {
        Ok(id) => id,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", format!("{e}")),
    };

    match services.jobs.get(tenant.tenant_id(), job_id) {
        Ok(Some(job)) => (StatusCode::OK, Json(JobDetailDto::from(job))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", format!("job {job_id} not found")),
        Err(e) => errors::job_store_error_to_response(e),
    }
}
