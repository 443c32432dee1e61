use std::collections::BTreeMap;

use super::top_n::TopN;
use super::walk::WalkOutcome;
use crate::types::{ExtensionStats, FileRecord, ScanSummary};

/// Number of entries kept in `ScanSummary::largest_files`.
pub const LARGEST_FILES: usize = 10;

/// Incremental fold of walk outcomes into a [`ScanSummary`].
#[derive(Debug)]
pub struct Aggregator {
    file_count: u64,
    total_size_bytes: u64,
    extensions: BTreeMap<String, ExtensionStats>,
    largest: TopN,
    all_files: Vec<FileRecord>,
    skipped_count: u64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            file_count: 0,
            total_size_bytes: 0,
            extensions: BTreeMap::new(),
            largest: TopN::new(LARGEST_FILES),
            all_files: Vec::new(),
            skipped_count: 0,
        }
    }
}

impl Aggregator {
    pub fn push(&mut self, outcome: WalkOutcome) {
        match outcome {
            WalkOutcome::Record(record) => self.add_record(record),
            WalkOutcome::SkippedEntry(_) | WalkOutcome::SkippedDir(_) => self.add_skip(),
        }
    }

    pub fn add_record(&mut self, record: FileRecord) {
        let size = record.size_bytes();
        self.file_count += 1;
        self.total_size_bytes += size;

        let bucket = self.extensions.entry(record.extension().to_string()).or_default();
        bucket.count += 1;
        bucket.size_bytes += size;

        self.largest.offer(self.all_files.len(), size);
        self.all_files.push(record);
    }

    pub fn add_skip(&mut self) {
        self.skipped_count += 1;
    }

    pub fn finish(self, root: String, extension_filter: Option<String>) -> ScanSummary {
        let largest_files =
            self.largest.into_sorted_indices().into_iter().map(|i| self.all_files[i].clone()).collect();
        ScanSummary {
            root,
            extension_filter,
            file_count: self.file_count,
            total_size_bytes: self.total_size_bytes,
            extensions: self.extensions,
            largest_files,
            all_files: self.all_files,
            skipped_count: self.skipped_count,
        }
    }
}

/// Folds a whole outcome sequence in one pass.
pub fn aggregate<I>(outcomes: I, root: String) -> ScanSummary
where
    I: IntoIterator<Item = WalkOutcome>,
{
    let mut agg = Aggregator::default();
    for outcome in outcomes {
        agg.push(outcome);
    }
    agg.finish(root, None)
}
