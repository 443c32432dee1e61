//! HTTP route handlers for the Dateiinventar API.
//!
//! - `analyze`: directory inventories, extension listing and paginated file lists
//! - `file_info`: metadata of a single file
//! - `health`: welcome document, liveness, version and metrics endpoints

use axum::{middleware::from_fn_with_state, routing::get, Router};

use crate::{middleware, state::AppState};

pub mod analyze;
pub mod file_info;
pub mod health;

/// Builds the application router with the request-level middleware applied.
///
/// Transport layers (compression, tracing, CORS) are added by the binary.
pub fn router(state: AppState) -> Router {
    let cfg_arc = state.config.clone();

    Router::new()
        .route("/", get(health::root))
        .route("/healthz", get(health::healthz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .route("/analyze", get(analyze::analyze))
        .route("/analyze/extensions", get(analyze::extensions))
        .route("/analyze/files", get(analyze::files))
        .route("/file-info", get(file_info::file_info))
        .layer(axum::middleware::from_fn(middleware::validation::validate_request_middleware))
        .layer(from_fn_with_state(state.clone(), middleware::rate_limit::rate_limit_middleware))
        .layer(from_fn_with_state(cfg_arc, middleware::security_headers::security_headers_middleware))
        .with_state(state)
}
