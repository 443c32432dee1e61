#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::routes;
    use crate::state::AppState;
    use crate::tests::test_config;

    fn setup_test_app() -> (Router, AppState) {
        let state = AppState::new(test_config());
        (routes::router(state.clone()), state)
    }

    async fn fetch(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, headers, body)
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let (app, _) = setup_test_app();
        let (status, _, body) = fetch(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["endpoints"]["/analyze"].is_string());
        assert!(json["endpoints"]["/analyze/files"].is_string());
        assert!(json["endpoints"]["/file-info"].is_string());
    }

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let (app, _) = setup_test_app();
        let (status, _, body) = fetch(app, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_version_endpoint() {
        let (app, _) = setup_test_app();
        let (status, _, body) = fetch(app, "/version").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["name"], "dateiinventar");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert!(json["build"]["profile"].is_string());
    }

    #[tokio::test]
    async fn test_metrics_follow_scans() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.bin"), [0u8; 64]).unwrap();
        std::fs::write(dir.path().join("b.bin"), [0u8; 16]).unwrap();
        let (app, _) = setup_test_app();

        let (status, _, _) = fetch(app.clone(), &format!("/analyze?path={}", dir.path().display())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, body) = fetch(app, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["scans_started"], 1);
        assert_eq!(json["scans_completed"], 1);
        assert_eq!(json["scans_failed"], 0);
        assert_eq!(json["files_processed"], 2);
        assert_eq!(json["bytes_scanned"], 80);
    }

    #[tokio::test]
    async fn test_metrics_prometheus_endpoint() {
        let (app, state) = setup_test_app();
        state.metrics.inc_scans_started();

        let (status, headers, body) = fetch(app, "/metrics/prometheus").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/plain; version=0.0.4");
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("# TYPE dateiinventar_scans_started counter"));
        assert!(text.contains("dateiinventar_scans_started 1"));
        assert!(text.contains("dateiinventar_entries_skipped 0"));
        assert!(text.contains("dateiinventar_uptime_seconds"));
    }

    #[test]
    fn test_scan_outcomes_add_up() {
        use crate::routes::analyze::scan_and_record;
        use crate::types::ScanOptions;
        use tokio_util::sync::CancellationToken;

        let dir = TempDir::new().unwrap();
        let metrics = crate::metrics::Metrics::new();
        let options = ScanOptions::default();

        let cancelled = CancellationToken::new();
        cancelled.cancel();
        assert!(scan_and_record(&metrics, dir.path(), &options, None, cancelled).is_err());
        assert!(scan_and_record(&metrics, dir.path(), &options, None, CancellationToken::new()).is_ok());
        let missing = dir.path().join("missing");
        assert!(scan_and_record(&metrics, &missing, &options, None, CancellationToken::new()).is_err());

        let m = metrics.get_snapshot();
        assert_eq!((m.scans_completed, m.scans_cancelled, m.scans_failed), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_cancelled_counter_exposed() {
        let (app, state) = setup_test_app();
        state.metrics.inc_scans_cancelled();

        let (_, _, body) = fetch(app.clone(), "/metrics").await;
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["scans_cancelled"], 1);

        let (_, _, body) = fetch(app, "/metrics/prometheus").await;
        assert!(String::from_utf8(body).unwrap().contains("dateiinventar_scans_cancelled 1"));
    }
}
