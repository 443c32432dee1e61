use thiserror::Error;

use crate::types::{FileRecord, PageResult};

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("limit must be between 1 and {MAX_PAGE_LIMIT}, got {0}")]
    Limit(i64),
    #[error("offset must not be negative, got {0}")]
    Offset(i64),
}

impl PageError {
    /// Name of the offending query parameter.
    pub fn field(&self) -> &'static str {
        match self {
            PageError::Limit(_) => "limit",
            PageError::Offset(_) => "offset",
        }
    }
}

/// Validated paging parameters. Out-of-range values are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    limit: usize,
    offset: usize,
}

impl PageParams {
    pub fn new(limit: i64, offset: i64) -> Result<Self, PageError> {
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(PageError::Limit(limit));
        }
        let offset = usize::try_from(offset).map_err(|_| PageError::Offset(offset))?;
        Ok(Self { limit: limit as usize, offset })
    }

    /// Applies the defaults (`limit=10`, `offset=0`) for absent parameters.
    pub fn from_query(limit: Option<i64>, offset: Option<i64>) -> Result<Self, PageError> {
        Self::new(limit.unwrap_or(DEFAULT_PAGE_LIMIT), offset.unwrap_or(0))
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// `all_files[offset .. offset + limit]`, empty once `offset` is past the end.
pub fn page(all_files: &[FileRecord], params: PageParams) -> PageResult {
    let total = all_files.len();
    let start = params.offset.min(total);
    let end = params.offset.saturating_add(params.limit).min(total);
    PageResult {
        total: total as u64,
        limit: params.limit as u64,
        offset: params.offset as u64,
        results: all_files[start..end].to_vec(),
    }
}
