use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use sellerdesk_core::DomainError;
use sellerdesk_infra::jobs::JobStoreError;
use sellerdesk_replenishment::ReplenishmentError;

pub fn replenishment_error_to_response(err: ReplenishmentError) -> axum::response::Response {
    match err {
        ReplenishmentError::InvalidConfig(DomainError::Validation(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        ReplenishmentError::InvalidConfig(other) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", other.to_string())
        }
        ReplenishmentError::DataAccess(msg) => {
            error!(error = %msg, "forecast aborted on data access failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "data_access_error", msg)
        }
    }
}

pub fn job_store_error_to_response(err: JobStoreError) -> axum::response::Response {
    match err {
        JobStoreError::NotFound(id) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("job {id} not found"))
        }
        JobStoreError::Storage(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
