use std::path::Path;

use anyhow::anyhow;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use tokio::task::spawn_blocking;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{
        validation::{validate_extension, validate_path},
        AppError, AppResult,
    },
    middleware::{
        ip::{extract_ip_from_headers, MaybeRemoteAddr},
        validation::sanitize_for_logging,
    },
    metrics::Metrics,
    scanner::{self, page, PageParams, ScanError},
    state::{AppState, SCAN_ENDPOINTS},
    types::{
        AnalyzeQuery, ExtensionListResponse, ExtensionsQuery, FilesQuery, PageResult, ScanOptions, ScanSummary,
    },
};

/// `GET /analyze`: full inventory of a directory tree.
pub async fn analyze(
    State(state): State<AppState>,
    remote: MaybeRemoteAddr,
    headers: HeaderMap,
    Query(q): Query<AnalyzeQuery>,
) -> AppResult<Json<ScanSummary>> {
    check_scan_budget(&state, remote, &headers).await?;
    validate_path(&q.path, "path")?;
    if let Some(ext) = q.extension.as_deref() {
        validate_extension(ext)?;
    }

    tracing::info!("Analyzing directory: {}", sanitize_for_logging(&q.path));
    let summary = run_scan(&state, q.path, q.extension).await?;
    Ok(Json(summary))
}

/// `GET /analyze/extensions`: extensions present below a directory, most frequent first.
pub async fn extensions(
    State(state): State<AppState>,
    remote: MaybeRemoteAddr,
    headers: HeaderMap,
    Query(q): Query<ExtensionsQuery>,
) -> AppResult<Json<ExtensionListResponse>> {
    check_scan_budget(&state, remote, &headers).await?;
    validate_path(&q.path, "path")?;

    tracing::info!("Getting available extensions in: {}", sanitize_for_logging(&q.path));
    let summary = run_scan(&state, q.path, None).await?;
    Ok(Json(ExtensionListResponse::from_summary(&summary)))
}

/// `GET /analyze/files`: one page of the traversal-ordered file list.
pub async fn files(
    State(state): State<AppState>,
    remote: MaybeRemoteAddr,
    headers: HeaderMap,
    Query(q): Query<FilesQuery>,
) -> AppResult<Json<PageResult>> {
    check_scan_budget(&state, remote, &headers).await?;
    // Paging parameters are rejected before the filesystem is touched
    let params = PageParams::from_query(q.limit, q.offset)?;
    validate_path(&q.path, "path")?;
    if let Some(ext) = q.extension.as_deref() {
        validate_extension(ext)?;
    }

    tracing::info!(
        "Paginating files in: {}, offset={}, limit={}",
        sanitize_for_logging(&q.path),
        params.offset(),
        params.limit()
    );
    let summary = run_scan(&state, q.path, q.extension).await?;
    Ok(Json(page(&summary.all_files, params)))
}

async fn check_scan_budget(state: &AppState, remote: MaybeRemoteAddr, headers: &HeaderMap) -> AppResult<()> {
    let ip = extract_ip_from_headers(headers, remote.ip());
    state.rate_limiter.check_endpoint_limit(SCAN_ENDPOINTS, ip).await
}

/// Runs one scan on a blocking worker.
///
/// If the handler future is dropped (client disconnected) the drop guard
/// cancels the token and the walker stops descending. The outcome is counted
/// on the worker, so cancelled scans show up in the metrics although nobody
/// awaits them anymore.
pub(crate) async fn run_scan(
    state: &AppState,
    path: String,
    extension: Option<String>,
) -> AppResult<ScanSummary> {
    let options = state.config.scan.options();
    let metrics = state.metrics.clone();
    let cancel = CancellationToken::new();
    let _cancel_on_drop = cancel.clone().drop_guard();

    state.metrics.inc_scans_started();
    let result = spawn_blocking(move || {
        scan_and_record(&metrics, Path::new(&path), &options, extension.as_deref(), cancel)
    })
    .await
    .map_err(|e| {
        state.metrics.inc_scans_failed();
        AppError::Internal(anyhow!("scan task join error: {}", e))
    })?;

    result.map_err(|e| {
        if let ScanError::InvalidRoot { path, reason } = &e {
            tracing::warn!("Invalid path requested: {} ({})", sanitize_for_logging(path), reason);
        }
        e.into()
    })
}

/// Scans and books the outcome: completed, cancelled or failed.
pub(crate) fn scan_and_record(
    metrics: &Metrics,
    root: &Path,
    options: &ScanOptions,
    extension: Option<&str>,
    cancel: CancellationToken,
) -> Result<ScanSummary, ScanError> {
    let result = scanner::scan(root, options, extension, cancel);
    match &result {
        Ok(summary) => metrics.record_completed(summary),
        Err(ScanError::Cancelled) => metrics.inc_scans_cancelled(),
        Err(_) => metrics.inc_scans_failed(),
    }
    result
}
