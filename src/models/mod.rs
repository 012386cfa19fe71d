//! Core data models for account-porter
//!
//! Credential bundles, the snapshot that carries them, the encrypted artifact
//! that carries the snapshot, and the result types of validating and
//! restoring one.

pub mod artifact;
pub mod bundle;
pub mod outcome;
pub mod snapshot;
pub mod validation;

pub use artifact::EncryptedArtifact;
pub use bundle::{BundleValidationError, CredentialBundle};
pub use outcome::{FailedItem, RestoreOutcome, RestoreTally};
pub use snapshot::{Snapshot, SnapshotMetadata};
pub use validation::ValidationResult;
