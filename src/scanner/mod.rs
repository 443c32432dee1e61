//! Directory walking and aggregation engine.
//!
//! A scan is a pipeline of four parts, each usable on its own:
//!
//! - [`extract`]: metadata of one path, or a typed reason why not
//! - [`walk`]: lazy, deterministic traversal yielding records and skip outcomes
//! - [`aggregate`]: counts, sizes, extension buckets and the largest files
//! - [`pager`]: validated slicing of the retained file list
//!
//! [`scan`] wires them together for one request. Nothing here is shared between
//! requests; every call walks the filesystem again.

pub mod aggregate;
pub mod extract;
pub mod pager;
pub mod top_n;
pub mod walk;

use std::path::Path;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use aggregate::{aggregate, Aggregator, LARGEST_FILES};
pub use extract::{extension_of, extract, ExtractionError};
pub use pager::{page, PageError, PageParams};
pub use walk::{Walk, WalkOutcome, Walker};

use crate::types::{human_size, ScanOptions, ScanSummary};

/// Errors that abort a whole scan. Per-entry problems never end up here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid root {path}: {reason}")]
    InvalidRoot { path: String, reason: String },
    #[error("invalid exclude pattern: {0}")]
    InvalidExclude(#[from] globset::Error),
    #[error("scan cancelled")]
    Cancelled,
}

/// Normalises a user supplied extension filter: `PY`, `.py` and ` .Py ` all become `.py`.
///
/// Returns `None` for an empty filter.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_lowercase();
    Some(if lower.starts_with('.') { lower } else { format!(".{}", lower) })
}

/// Walks `root` and aggregates every record, optionally only those with `extension_filter`.
///
/// Blocks for the whole traversal; async callers run it on a blocking worker.
pub fn scan(
    root: &Path,
    options: &ScanOptions,
    extension_filter: Option<&str>,
    cancel: CancellationToken,
) -> Result<ScanSummary, ScanError> {
    let filter = extension_filter.and_then(normalize_extension);
    let walker = Walker::new(options, cancel)?;
    let mut walk = walker.walk(root)?;
    let root_str = walk.root().to_string_lossy().into_owned();

    let mut agg = Aggregator::default();
    for outcome in walk.by_ref() {
        let filtered_out = matches!(
            &outcome,
            WalkOutcome::Record(r) if filter.as_deref().is_some_and(|ext| r.extension() != ext)
        );
        if !filtered_out {
            agg.push(outcome);
        }
    }
    if walk.was_cancelled() {
        return Err(ScanError::Cancelled);
    }

    let summary = agg.finish(root_str, filter);
    let filter_msg = summary
        .extension_filter
        .as_deref()
        .map(|f| format!(" (filtered by extension: {})", f))
        .unwrap_or_default();
    tracing::info!(
        "Scanned {} files{} in {}, total size {}, skipped {}",
        summary.file_count,
        filter_msg,
        summary.root,
        human_size(summary.total_size_bytes),
        summary.skipped_count
    );
    Ok(summary)
}
