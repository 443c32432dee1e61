//! Integration and unit tests for the Dateiinventar application.
//!
//! ## Test Modules
//!
//! - **scanner_tests**: scans over real temporary directory trees
//! - **api_tests**: analyze, paging and file-info endpoints through the router
//! - **error_tests**: error envelope and status mapping
//! - **config_tests**: configuration loading and validation
//! - **health_api_tests**: welcome, health, version and metrics endpoints

pub mod health_api_tests;
pub mod scanner_tests;

use crate::scanner::extension_of;
use crate::types::FileRecord;

/// A record without timestamps or ownership, for tests that only care about path and size.
pub(crate) fn record(path: &str, size: u64) -> FileRecord {
    let name = path.rsplit('/').next().unwrap_or(path).to_string();
    let extension = extension_of(&name);
    FileRecord {
        path: path.to_string(),
        name,
        extension,
        size_bytes: size,
        created_at: None,
        modified_at: None,
        accessed_at: None,
        owner_uid: None,
        group_gid: None,
        inode: None,
        mode: None,
        is_symlink: false,
    }
}

/// Test configuration: embedded defaults with generous rate limits.
pub(crate) fn test_config() -> crate::config::AppConfig {
    let mut config = crate::config::AppConfig::default();
    config.rate_limit.max_requests = 10_000;
    config.rate_limit.analyze_max_requests = 10_000;
    config
}
