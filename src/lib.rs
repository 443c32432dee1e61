//! # Dateiinventar Backend Library
//!
//! Walks a directory tree and reports an inventory of the regular files and
//! symbolic links below it: count, total size, per-extension buckets, the ten
//! largest files and the full traversal-ordered list, optionally paginated.
//!
//! ## Architecture
//!
//! - **Axum**: HTTP server and routing
//! - **Tokio**: async runtime; each scan runs on a blocking worker
//! - **walkdir / globset**: deterministic traversal with exclude patterns
//! - **Serde**: JSON responses
//!
//! ## Core Components
//!
//! - [`config`]: layered configuration (embedded defaults, file, environment)
//! - [`error`]: error envelope and HTTP status mapping
//! - [`metrics`]: process-wide scan counters
//! - [`middleware`]: security headers, rate limiting and request validation
//! - [`routes`]: HTTP endpoint handlers and the router
//! - [`scanner`]: metadata extraction, tree walking, aggregation and paging
//! - [`state`]: shared application state
//! - [`types`]: records, summaries and query types

pub mod config;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod scanner;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
