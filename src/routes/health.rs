use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Welcome document listing the available endpoints
pub async fn root() -> impl IntoResponse {
    let body = serde_json::json!({
        "message": "Dateiinventar API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/analyze": "Full inventory of a directory tree (path, optional extension)",
            "/analyze/extensions": "Extensions found below a directory, most frequent first",
            "/analyze/files": "Paginated file list (path, limit 1-100, offset >= 0, optional extension)",
            "/file-info": "Metadata of a single file (file_path)",
            "/healthz": "Liveness probe",
            "/version": "Build information",
            "/metrics": "Counters as JSON",
            "/metrics/prometheus": "Counters in Prometheus text format",
        }
    });
    (StatusCode::OK, Json(body))
}

// Health check endpoint - lightweight, keine Dateisystemzugriffe
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.get_snapshot();
    Json(snapshot)
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP dateiinventar_scans_started Total scans started\n# TYPE dateiinventar_scans_started counter\ndateiinventar_scans_started {}\n\
# HELP dateiinventar_scans_completed Total scans completed\n# TYPE dateiinventar_scans_completed counter\ndateiinventar_scans_completed {}\n\
# HELP dateiinventar_scans_failed Total scans failed\n# TYPE dateiinventar_scans_failed counter\ndateiinventar_scans_failed {}\n\
# HELP dateiinventar_scans_cancelled Scans stopped because the client went away\n# TYPE dateiinventar_scans_cancelled counter\ndateiinventar_scans_cancelled {}\n\
# HELP dateiinventar_files_processed Files processed\n# TYPE dateiinventar_files_processed counter\ndateiinventar_files_processed {}\n\
# HELP dateiinventar_bytes_scanned Bytes scanned\n# TYPE dateiinventar_bytes_scanned counter\ndateiinventar_bytes_scanned {}\n\
# HELP dateiinventar_entries_skipped Entries skipped\n# TYPE dateiinventar_entries_skipped counter\ndateiinventar_entries_skipped {}\n\
# HELP dateiinventar_uptime_seconds Uptime seconds\n# TYPE dateiinventar_uptime_seconds gauge\ndateiinventar_uptime_seconds {}\n",
        m.scans_started,
        m.scans_completed,
        m.scans_failed,
        m.scans_cancelled,
        m.files_processed,
        m.bytes_scanned,
        m.entries_skipped,
        m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
