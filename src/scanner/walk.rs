use std::{
    fs, io,
    path::{Path, PathBuf},
};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tokio_util::sync::CancellationToken;
use walkdir::WalkDir;

use super::extract::{extract, ExtractionError};
use super::ScanError;
use crate::types::{FileRecord, ScanOptions};

/// One step of a walk: either a record or the reason an entry was skipped.
#[derive(Debug)]
pub enum WalkOutcome {
    Record(FileRecord),
    /// A single entry could not be read.
    SkippedEntry(ExtractionError),
    /// A directory listing could not be read; its subtree is missing.
    SkippedDir(ExtractionError),
}

/// Walker configured once and reusable for any number of walks.
#[derive(Debug, Clone)]
pub struct Walker {
    excludes: GlobSet,
    cancel: CancellationToken,
}

impl Walker {
    pub fn new(options: &ScanOptions, cancel: CancellationToken) -> Result<Self, ScanError> {
        Ok(Self { excludes: build_globset(&options.excludes)?, cancel })
    }

    /// Validates `root` and returns a lazy, lexicographically ordered walk below it.
    pub fn walk(&self, root: &Path) -> Result<Walk, ScanError> {
        let root = std::path::absolute(root).map_err(|e| invalid_root(root, &e))?;
        let meta = fs::metadata(&root).map_err(|e| invalid_root(&root, &e))?;
        if !meta.is_dir() {
            return Err(ScanError::InvalidRoot {
                path: root.to_string_lossy().into_owned(),
                reason: "not a directory".into(),
            });
        }

        let inner = WalkDir::new(&root).follow_links(false).sort_by_file_name().into_iter();
        Ok(Walk {
            root,
            inner,
            excludes: self.excludes.clone(),
            cancel: self.cancel.clone(),
            cancelled: false,
        })
    }
}

/// Finite, non-restartable sequence of [`WalkOutcome`]s. Walking again means a fresh scan.
pub struct Walk {
    root: PathBuf,
    inner: walkdir::IntoIter,
    excludes: GlobSet,
    cancel: CancellationToken,
    cancelled: bool,
}

impl Walk {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True once the walk stopped early because its token was cancelled.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Iterator for Walk {
    type Item = WalkOutcome;

    fn next(&mut self) -> Option<WalkOutcome> {
        loop {
            if self.cancelled {
                return None;
            }
            if self.cancel.is_cancelled() {
                tracing::info!("Scan of {} cancelled", self.root.display());
                self.cancelled = true;
                return None;
            }

            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let err = listing_error(err);
                    tracing::warn!("Skipping unreadable directory {} ({})", err.path().display(), err);
                    return Some(WalkOutcome::SkippedDir(err));
                }
            };

            if entry.depth() == 0 {
                continue;
            }
            let file_type = entry.file_type();
            if matches_excludes(entry.path(), &self.excludes) {
                if file_type.is_dir() {
                    self.inner.skip_current_dir();
                }
                continue;
            }
            // walkdir descends by itself; directories never become records
            if file_type.is_dir() {
                continue;
            }

            return Some(match extract(entry.path()) {
                Ok(record) => WalkOutcome::Record(record),
                // Sockets, FIFOs and device nodes are not files: neither records nor skips
                Err(err @ ExtractionError::Unsupported { .. }) => {
                    tracing::debug!("Ignoring {} ({})", err.path().display(), err.code());
                    continue;
                }
                Err(err) => {
                    match err {
                        ExtractionError::NotFound { .. } => {
                            tracing::debug!("Skipping {} ({})", err.path().display(), err.code())
                        }
                        _ => tracing::warn!("Failed to process {}: {}", err.path().display(), err),
                    }
                    WalkOutcome::SkippedEntry(err)
                }
            });
        }
    }
}

fn invalid_root(path: &Path, err: &io::Error) -> ScanError {
    ScanError::InvalidRoot { path: path.to_string_lossy().into_owned(), reason: err.to_string() }
}

fn listing_error(err: walkdir::Error) -> ExtractionError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    match err.into_io_error() {
        Some(io_err) => ExtractionError::from_io(&path, io_err),
        // Only loop errors carry no io::Error, and those need follow_links
        None => ExtractionError::Io { path, source: io::Error::other("filesystem loop detected") },
    }
}

pub(crate) fn build_globset(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        if p.trim().is_empty() {
            continue;
        }
        // Backslashes zu Slashes, passend zur Normalisierung in `matches_excludes`
        let norm = p.trim().replace('\\', "/");
        b.add(Glob::new(&norm)?);
    }
    Ok(b.build()?)
}

fn matches_excludes(path: &Path, set: &GlobSet) -> bool {
    if set.is_empty() {
        return false;
    }
    let s = path.to_string_lossy().replace('\\', "/");
    set.is_match(&s)
}
