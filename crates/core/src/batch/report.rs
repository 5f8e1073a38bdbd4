//! Running counters over one or more batch-write operations.

use serde::{Deserialize, Serialize};

/// Counts of rows inserted, updated, and skipped across a sync run.
///
/// Counters only ever grow. Reports from partial runs merge by element-wise
/// addition, so a caller can sum per-entity reports into a run total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    inserted: u64,
    updated: u64,
    skipped: u64,
}

impl BatchReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record inserted rows.
    pub fn add_inserted(&mut self, count: u64) {
        self.inserted += count;
    }

    /// Record updated rows.
    pub fn add_updated(&mut self, count: u64) {
        self.updated += count;
    }

    /// Record skipped rows.
    pub fn add_skipped(&mut self, count: u64) {
        self.skipped += count;
    }

    /// Rows inserted so far.
    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    /// Rows updated so far.
    pub fn updated(&self) -> u64 {
        self.updated
    }

    /// Rows skipped so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: &BatchReport) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.skipped += other.skipped;
    }
}
