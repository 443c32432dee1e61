use std::{
    fs, io,
    path::{Path, PathBuf},
};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::FileRecord;

/// Why a single entry could not be turned into a [`FileRecord`].
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },
    /// The entry vanished between listing and stat.
    #[error("entry disappeared during scan: {}", path.display())]
    NotFound { path: PathBuf },
    /// Directories, device nodes, sockets and FIFOs.
    #[error("not a regular file or symlink: {}", path.display())]
    Unsupported { path: PathBuf },
    #[error("failed to read metadata for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExtractionError {
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::PermissionDenied => ExtractionError::PermissionDenied { path },
            io::ErrorKind::NotFound => ExtractionError::NotFound { path },
            _ => ExtractionError::Io { path, source: err },
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            ExtractionError::PermissionDenied { path }
            | ExtractionError::NotFound { path }
            | ExtractionError::Unsupported { path }
            | ExtractionError::Io { path, .. } => path,
        }
    }

    /// Short machine-readable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            ExtractionError::PermissionDenied { .. } => "permission_denied",
            ExtractionError::NotFound { .. } => "not_found",
            ExtractionError::Unsupported { .. } => "unsupported",
            ExtractionError::Io { .. } => "io_error",
        }
    }
}

/// Reads the metadata of `path` without opening the file or following a symlink.
pub fn extract(path: &Path) -> Result<FileRecord, ExtractionError> {
    let meta = fs::symlink_metadata(path).map_err(|e| ExtractionError::from_io(path, e))?;
    let file_type = meta.file_type();
    if !(file_type.is_file() || file_type.is_symlink()) {
        return Err(ExtractionError::Unsupported { path: path.to_path_buf() });
    }

    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let extension = extension_of(&name);
    let ids = platform_ids(&meta);

    Ok(FileRecord {
        path: path.to_string_lossy().into_owned(),
        name,
        extension,
        size_bytes: meta.len(),
        created_at: meta.created().ok().map(DateTime::<Utc>::from),
        modified_at: meta.modified().ok().map(DateTime::<Utc>::from),
        accessed_at: meta.accessed().ok().map(DateTime::<Utc>::from),
        owner_uid: ids.uid,
        group_gid: ids.gid,
        inode: ids.inode,
        mode: ids.mode,
        is_symlink: file_type.is_symlink(),
    })
}

/// Lowercase suffix after the last dot, including the dot.
///
/// Leading dots belong to the stem, so `.bashrc` has no extension while
/// `.config.TOML` has `.toml`.
pub fn extension_of(name: &str) -> String {
    let stem_start = name.len() - name.trim_start_matches('.').len();
    match name[stem_start..].rfind('.') {
        Some(idx) => name[stem_start + idx..].to_lowercase(),
        None => String::new(),
    }
}

#[derive(Default)]
struct PlatformIds {
    uid: Option<u32>,
    gid: Option<u32>,
    inode: Option<u64>,
    mode: Option<u32>,
}

#[cfg(unix)]
fn platform_ids(meta: &fs::Metadata) -> PlatformIds {
    PlatformIds {
        uid: Some(meta.uid()),
        gid: Some(meta.gid()),
        inode: Some(meta.ino()),
        mode: Some(meta.mode()),
    }
}

#[cfg(not(unix))]
fn platform_ids(_meta: &fs::Metadata) -> PlatformIds {
    // Keine POSIX-Besitzer/Inodes außerhalb von Unix
    PlatformIds::default()
}
