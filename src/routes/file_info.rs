use std::path::PathBuf;

use anyhow::anyhow;
use axum::{
    extract::{Query, State},
    Json,
};
use tokio::task::spawn_blocking;

use crate::{
    error::{validation::validate_path, AppError, AppResult},
    middleware::validation::sanitize_for_logging,
    scanner::extract,
    state::AppState,
    types::{FileInfoQuery, FileInfoResponse},
};

/// `GET /file-info`: metadata of a single file. The content is never opened;
/// the content type is guessed from the extension alone.
pub async fn file_info(
    State(_state): State<AppState>,
    Query(q): Query<FileInfoQuery>,
) -> AppResult<Json<FileInfoResponse>> {
    validate_path(&q.file_path, "file_path")?;
    let path: PathBuf = std::path::absolute(&q.file_path)?;

    tracing::info!("Getting info for file: {}", sanitize_for_logging(&q.file_path));
    let record = spawn_blocking(move || extract(&path))
        .await
        .map_err(|e| AppError::Internal(anyhow!("file-info task join error: {}", e)))??;

    let content_type = mime_guess::from_path(record.path()).first_or_octet_stream().essence_str().to_string();
    Ok(Json(FileInfoResponse { record, content_type }))
}
