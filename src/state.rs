use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::middleware::{EndpointRateLimiter, RateLimiter};

/// Key under which all filesystem-walking endpoints share one rate limit budget.
pub const SCAN_ENDPOINTS: &str = "/analyze";

/// The shared application state.
///
/// Holds configuration and observability only. Scan results are never stored
/// here; every request owns its own summary.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Performance and usage counters.
    pub metrics: Metrics,
    /// Limiter applied to every request by the global middleware.
    pub global_limiter: RateLimiter,
    /// Per-endpoint limits, checked inside the handlers.
    pub rate_limiter: EndpointRateLimiter,
}

impl AppState {
    /// Creates the state with limits taken from `config.rate_limit`.
    pub fn new(config: AppConfig) -> Self {
        let rl = &config.rate_limit;
        let global_limiter = RateLimiter::new(rl.max_requests, rl.window_seconds);
        let rate_limiter = EndpointRateLimiter::new()
            .with_limits(vec![(SCAN_ENDPOINTS, rl.analyze_max_requests, rl.analyze_window_seconds)]);

        Self { config: Arc::new(config), metrics: Metrics::new(), global_limiter, rate_limiter }
    }
}
