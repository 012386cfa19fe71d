//! Snapshot model
//!
//! The decrypted, structured form of an exchange artifact. Built fresh on
//! every export and rebuilt fresh on every import; never persisted in the
//! clear.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::bundle::CredentialBundle;

/// Provenance recorded alongside the items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    /// Operating system of the exporting machine
    pub platform: String,

    /// Identifier of the cipher that sealed the artifact
    pub encryption_algorithm_id: String,

    /// Tag of the producing application
    pub producer_tag: String,
}

/// Portable collection of credential bundles plus metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Dot-separated format version
    pub format_version: String,

    /// Creation time in seconds since the Unix epoch
    pub created_at: i64,

    /// Advisory count; `items.len()` is always the ground truth
    pub item_count: usize,

    /// Bundles in collection order
    pub items: Vec<CredentialBundle>,

    pub metadata: SnapshotMetadata,
}

impl Snapshot {
    /// Build a snapshot from live bundles, keeping their order
    pub fn new(
        format_version: impl Into<String>,
        created_at: i64,
        items: Vec<CredentialBundle>,
        metadata: SnapshotMetadata,
    ) -> Self {
        Self {
            format_version: format_version.into(),
            created_at,
            item_count: items.len(),
            items,
            metadata,
        }
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_at, 0)
    }

    /// One-line description for display before restoring
    pub fn summary(&self) -> String {
        let created = self
            .created_at_utc()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| self.created_at.to_string());

        [
            format!("Version: {}", self.format_version),
            format!("Created: {}", created),
            format!("Accounts: {}", self.items.len()),
            format!("Encryption: {}", self.metadata.encryption_algorithm_id),
            format!("Platform: {}", self.metadata.platform),
        ]
        .join(" | ")
    }
}
