//! Restore outcome model
//!
//! Aggregates the per-item results of one import. Built once by
//! [`RestoreTally::finish`] after every item was attempted and read-only
//! afterwards.

use serde::Serialize;

/// A single item that could not be restored
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedItem {
    pub filename: String,
    pub error: String,
}

/// Result of driving the credential store over every snapshot item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreOutcome {
    restored_count: usize,
    failed: Vec<FailedItem>,
}

impl RestoreOutcome {
    pub fn restored_count(&self) -> usize {
        self.restored_count
    }

    /// Failed items, in snapshot order
    pub fn failed(&self) -> &[FailedItem] {
        &self.failed
    }

    /// Number of items attempted (`restored + failed`)
    pub fn attempted(&self) -> usize {
        self.restored_count + self.failed.len()
    }

    /// Check if every item was restored
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Qualified-success message for the user
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            format!("Restored {} account(s)", self.restored_count)
        } else {
            format!(
                "Restored {} account(s), {} failed",
                self.restored_count,
                self.failed.len()
            )
        }
    }
}

/// Accumulates per-item results while the restore loop runs
#[derive(Debug, Default)]
pub struct RestoreTally {
    restored_count: usize,
    failed: Vec<FailedItem>,
}

impl RestoreTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_restored(&mut self) {
        self.restored_count += 1;
    }

    pub fn record_failed(&mut self, filename: impl Into<String>, error: impl Into<String>) {
        self.failed.push(FailedItem {
            filename: filename.into(),
            error: error.into(),
        });
    }

    pub fn finish(self) -> RestoreOutcome {
        RestoreOutcome {
            restored_count: self.restored_count,
            failed: self.failed,
        }
    }
}
