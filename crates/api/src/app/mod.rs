//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: catalog reader selection, forecast runner, job store
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use sellerdesk_infra::config::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Result<Router, sqlx::Error> {
    let services = services::build_services(config).await?;
    Ok(build_app_with_services(config.jwt_secret.clone(), Arc::new(services)))
}

/// Build the router around already-wired services (tests seed their own catalog).
pub fn build_app_with_services(jwt_secret: String, services: Arc<services::AppServices>) -> Router {
    let jwt = Arc::new(sellerdesk_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require auth + tenant context.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
