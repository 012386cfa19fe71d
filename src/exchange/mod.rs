//! Export and import of encrypted account backups
//!
//! [`Exporter`] turns the credential store into one encrypted artifact;
//! [`Importer`] turns an artifact back into restored credential bundles,
//! recording per-item failures instead of aborting on them.

pub mod export;
pub mod import;

pub use export::{default_export_filename, ExportReport, Exporter};
pub use import::{ArtifactPreview, ImportReport, Importer};

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{PorterError, PorterResult};
use crate::models::EncryptedArtifact;
use crate::progress::{OperationStatus, ProgressReporter};
use crate::store::write_text_atomic;

/// Reads and writes artifact files
pub trait ArtifactIo {
    fn read(&self, path: &Path) -> PorterResult<String>;

    /// Write the whole artifact or fail without leaving a partial file
    fn write(&mut self, path: &Path, artifact: &EncryptedArtifact) -> PorterResult<()>;
}

/// Artifact I/O against the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsArtifactIo;

impl ArtifactIo for FsArtifactIo {
    fn read(&self, path: &Path) -> PorterResult<String> {
        fs::read_to_string(path)
            .map_err(|e| PorterError::Io(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn write(&mut self, path: &Path, artifact: &EncryptedArtifact) -> PorterResult<()> {
        write_text_atomic(path, artifact.as_str())
            .map_err(|e| PorterError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}

/// Operating system name recorded in snapshot metadata
pub fn current_platform() -> &'static str {
    std::env::consts::OS
}

/// Put a reused reporter back to idle before a new operation
fn begin(progress: &mut ProgressReporter) {
    if let Err(e) = progress.reset() {
        debug!(error = %e, "Progress reporter not reset");
    }
}

fn advance(progress: &mut ProgressReporter, status: OperationStatus, message: impl Into<String>) {
    if let Err(e) = progress.transition(status, message) {
        debug!(error = %e, "Ignoring progress transition");
    }
}

/// Report a call-level failure or cancellation to observers and hand the
/// error back
fn abort(progress: &mut ProgressReporter, context: &str, err: PorterError) -> PorterError {
    if err.is_cancelled() {
        debug!(context, "Operation cancelled");
        progress.cancel(err.to_string());
        return err;
    }

    warn!(context, error = %err, "Operation failed");
    if let Err(e) = progress.fail(context, err.to_string()) {
        debug!(error = %e, "Ignoring progress transition");
    }
    err
}
