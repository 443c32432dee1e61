use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use humansize::{format_size, FormatSizeOptions, DECIMAL};
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

/// Renders a byte count the way the API presents it (`"1.2 MB"`).
///
/// Purely presentational; `size_bytes` stays the authoritative value.
pub fn human_size(bytes: u64) -> String {
    format_size(bytes, FormatSizeOptions::from(DECIMAL).decimal_places(1))
}

/// Options the walker is constructed with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Glob patterns (matched against `/`-normalised absolute paths) that are pruned.
    pub excludes: Vec<String>,
}

/// Metadata snapshot of a single file.
///
/// Records are only built by the extractor, which derives `extension` from `name`
/// once; afterwards both are exposed read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub(crate) path: String,
    pub(crate) name: String,
    pub(crate) extension: String,
    pub(crate) size_bytes: u64,
    pub(crate) created_at: Option<DateTime<Utc>>,
    pub(crate) modified_at: Option<DateTime<Utc>>,
    pub(crate) accessed_at: Option<DateTime<Utc>>,
    pub(crate) owner_uid: Option<u32>,
    pub(crate) group_gid: Option<u32>,
    pub(crate) inode: Option<u64>,
    pub(crate) mode: Option<u32>,
    pub(crate) is_symlink: bool,
}

impl FileRecord {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn size_human(&self) -> String {
        human_size(self.size_bytes)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    pub fn accessed_at(&self) -> Option<DateTime<Utc>> {
        self.accessed_at
    }

    pub fn owner_uid(&self) -> Option<u32> {
        self.owner_uid
    }

    pub fn group_gid(&self) -> Option<u32> {
        self.group_gid
    }

    pub fn inode(&self) -> Option<u64> {
        self.inode
    }

    pub fn mode(&self) -> Option<u32> {
        self.mode
    }

    pub fn is_symlink(&self) -> bool {
        self.is_symlink
    }

    fn serialize_fields<S: SerializeStruct>(&self, st: &mut S) -> Result<(), S::Error> {
        st.serialize_field("path", &self.path)?;
        st.serialize_field("name", &self.name)?;
        st.serialize_field("extension", &self.extension)?;
        st.serialize_field("size_bytes", &self.size_bytes)?;
        st.serialize_field("size_human", &self.size_human())?;
        st.serialize_field("created_at", &self.created_at)?;
        st.serialize_field("modified_at", &self.modified_at)?;
        st.serialize_field("accessed_at", &self.accessed_at)?;
        st.serialize_field("owner_uid", &self.owner_uid)?;
        st.serialize_field("group_gid", &self.group_gid)?;
        st.serialize_field("inode", &self.inode)?;
        st.serialize_field("mode", &self.mode)?;
        st.serialize_field("is_symlink", &self.is_symlink)
    }
}

impl Serialize for FileRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("FileRecord", 13)?;
        self.serialize_fields(&mut st)?;
        st.end()
    }
}

/// Aggregation cell for one extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtensionStats {
    pub count: u64,
    pub size_bytes: u64,
}

impl Serialize for ExtensionStats {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("ExtensionStats", 3)?;
        st.serialize_field("count", &self.count)?;
        st.serialize_field("size_bytes", &self.size_bytes)?;
        st.serialize_field("size_human", &human_size(self.size_bytes))?;
        st.end()
    }
}

/// Result of one traversal. Built per request and dropped after rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub root: String,
    pub extension_filter: Option<String>,
    pub file_count: u64,
    pub total_size_bytes: u64,
    pub extensions: BTreeMap<String, ExtensionStats>,
    pub largest_files: Vec<FileRecord>,
    pub all_files: Vec<FileRecord>,
    pub skipped_count: u64,
}

impl Serialize for ScanSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("ScanSummary", 9)?;
        st.serialize_field("root", &self.root)?;
        st.serialize_field("extension_filter", &self.extension_filter)?;
        st.serialize_field("file_count", &self.file_count)?;
        st.serialize_field("total_size_bytes", &self.total_size_bytes)?;
        st.serialize_field("total_size_human", &human_size(self.total_size_bytes))?;
        st.serialize_field("skipped_count", &self.skipped_count)?;
        st.serialize_field("extensions", &self.extensions)?;
        st.serialize_field("largest_files", &self.largest_files)?;
        st.serialize_field("all_files", &self.all_files)?;
        st.end()
    }
}

/// A page over `ScanSummary::all_files`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
    pub results: Vec<FileRecord>,
}

impl PageResult {
    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(self.limit) < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }
}

impl Serialize for PageResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("PageResult", 6)?;
        st.serialize_field("total", &self.total)?;
        st.serialize_field("limit", &self.limit)?;
        st.serialize_field("offset", &self.offset)?;
        st.serialize_field("has_next", &self.has_next())?;
        st.serialize_field("has_previous", &self.has_previous())?;
        st.serialize_field("results", &self.results)?;
        st.end()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtensionInfo {
    pub extension: String,
    pub count: u64,
    pub size_bytes: u64,
    pub size_human: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtensionListResponse {
    pub path: String,
    pub total_files: u64,
    pub extensions: Vec<ExtensionInfo>,
}

impl ExtensionListResponse {
    /// Most frequent extension first; equal counts fall back to the extension itself.
    pub fn from_summary(summary: &ScanSummary) -> Self {
        let mut extensions: Vec<ExtensionInfo> = summary
            .extensions
            .iter()
            .map(|(ext, stats)| ExtensionInfo {
                extension: ext.clone(),
                count: stats.count,
                size_bytes: stats.size_bytes,
                size_human: human_size(stats.size_bytes),
            })
            .collect();
        // BTreeMap order is already ascending by key, a stable sort keeps it for ties
        extensions.sort_by(|a, b| b.count.cmp(&a.count));
        Self { path: summary.root.clone(), total_files: summary.file_count, extensions }
    }
}

/// A single file's record plus its guessed content type.
#[derive(Debug, Clone)]
pub struct FileInfoResponse {
    pub record: FileRecord,
    pub content_type: String,
}

impl Serialize for FileInfoResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("FileInfoResponse", 14)?;
        self.record.serialize_fields(&mut st)?;
        st.serialize_field("content_type", &self.content_type)?;
        st.end()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeQuery {
    pub path: String,
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionsQuery {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilesQuery {
    pub path: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub extension: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileInfoQuery {
    pub file_path: String,
}
