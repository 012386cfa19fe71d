//! Import orchestration
//!
//! Reading, decrypting and validating an artifact are all-or-nothing. Once
//! those pass, every item is restored independently: a failing item is
//! recorded in the [`RestoreOutcome`] and the loop moves on.

use std::path::Path;

use tracing::{debug, info, warn};

use super::{abort, advance, begin, ArtifactIo, FsArtifactIo};
use crate::codec;
use crate::crypto::CipherProvider;
use crate::error::{PorterError, PorterResult};
use crate::models::{EncryptedArtifact, RestoreOutcome, RestoreTally, Snapshot, ValidationResult};
use crate::progress::{OperationStatus, ProgressReporter};
use crate::store::CredentialStore;

/// Decrypted contents of an artifact, checked but not restored
#[derive(Debug, Clone)]
pub struct ArtifactPreview {
    pub snapshot: Snapshot,
    pub validation: ValidationResult,
}

impl ArtifactPreview {
    pub fn summary(&self) -> String {
        self.snapshot.summary()
    }
}

/// Result of an import that ran to completion
///
/// Completion does not mean every item was restored; check
/// [`RestoreOutcome::is_complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub outcome: RestoreOutcome,
    pub warnings: Vec<String>,
    pub format_version: String,
}

/// Restores credential bundles from encrypted backups
pub struct Importer<'a, S, C, R = FsArtifactIo> {
    store: &'a mut S,
    cipher: &'a C,
    io: R,
    progress: ProgressReporter,
}

impl<'a, S, C> Importer<'a, S, C, FsArtifactIo>
where
    S: CredentialStore,
    C: CipherProvider,
{
    pub fn new(store: &'a mut S, cipher: &'a C) -> Self {
        Self::with_io(store, cipher, FsArtifactIo)
    }
}

impl<'a, S, C, R> Importer<'a, S, C, R>
where
    S: CredentialStore,
    C: CipherProvider,
    R: ArtifactIo,
{
    pub fn with_io(store: &'a mut S, cipher: &'a C, io: R) -> Self {
        Self {
            store,
            cipher,
            io,
            progress: ProgressReporter::new(),
        }
    }

    pub fn progress(&self) -> &ProgressReporter {
        &self.progress
    }

    /// Access the reporter to subscribe observers
    pub fn progress_mut(&mut self) -> &mut ProgressReporter {
        &mut self.progress
    }

    /// Read the artifact at `path`
    ///
    /// `None` means the user chose no file and fails with
    /// [`PorterError::UserCancelled`].
    pub fn read_artifact(&mut self, path: Option<&Path>) -> PorterResult<EncryptedArtifact> {
        begin(&mut self.progress);

        let Some(path) = path else {
            return Err(abort(
                &mut self.progress,
                "Import cancelled",
                PorterError::UserCancelled("no backup file chosen".to_string()),
            ));
        };

        advance(
            &mut self.progress,
            OperationStatus::Reading,
            format!("Reading {}", path.display()),
        );

        let artifact = match self.io.read(path) {
            Ok(text) => EncryptedArtifact::new(text),
            Err(e) => return Err(abort(&mut self.progress, "Import failed", e)),
        };

        if artifact.is_blank() {
            return Err(abort(
                &mut self.progress,
                "Import failed",
                PorterError::EmptyArtifact,
            ));
        }

        debug!(path = %path.display(), bytes = artifact.len(), "Artifact read");
        Ok(artifact)
    }

    /// Decrypt and validate without restoring anything
    pub fn inspect(
        &mut self,
        artifact: &EncryptedArtifact,
        password: &str,
    ) -> PorterResult<ArtifactPreview> {
        let (snapshot, validation) = match self.open(artifact, password) {
            Ok(opened) => opened,
            Err(e) => return Err(abort(&mut self.progress, "Inspection failed", e)),
        };

        advance(
            &mut self.progress,
            OperationStatus::Completed,
            format!("Backup holds {} account(s)", snapshot.items.len()),
        );
        Ok(ArtifactPreview {
            snapshot,
            validation,
        })
    }

    /// Decrypt, validate and restore every item
    ///
    /// Fails only if the artifact cannot be opened or is incompatible.
    /// Item failures land in [`ImportReport::outcome`].
    pub fn import(
        &mut self,
        artifact: &EncryptedArtifact,
        password: &str,
    ) -> PorterResult<ImportReport> {
        let (snapshot, validation) = match self.open(artifact, password) {
            Ok(opened) => opened,
            Err(e) => return Err(abort(&mut self.progress, "Import failed", e)),
        };

        let outcome = self.restore_all(&snapshot);

        if outcome.is_complete() {
            info!(restored = outcome.restored_count(), "Import complete");
        } else {
            warn!(
                restored = outcome.restored_count(),
                failed = outcome.failed().len(),
                "Import complete with failures"
            );
        }
        advance(&mut self.progress, OperationStatus::Completed, outcome.summary());

        Ok(ImportReport {
            outcome,
            warnings: validation.warnings,
            format_version: snapshot.format_version,
        })
    }

    fn open(
        &mut self,
        artifact: &EncryptedArtifact,
        password: &str,
    ) -> PorterResult<(Snapshot, ValidationResult)> {
        // Callers may skip read_artifact and pass an artifact directly
        if self.progress.status().is_terminal() {
            begin(&mut self.progress);
        }

        if artifact.is_blank() {
            return Err(PorterError::EmptyArtifact);
        }

        self.cipher.validate_password(password).into_result()?;

        advance(
            &mut self.progress,
            OperationStatus::Decrypting,
            "Decrypting backup",
        );
        let plaintext = self.cipher.decrypt(artifact, password)?;

        advance(
            &mut self.progress,
            OperationStatus::Validating,
            "Validating backup",
        );
        let (snapshot, validation) = codec::decode(plaintext.as_str())?;

        for warning in &validation.warnings {
            warn!(warning = %warning, "Backup validation warning");
        }
        debug!(
            version = %snapshot.format_version,
            items = snapshot.items.len(),
            "Backup opened"
        );

        Ok((snapshot, validation))
    }

    /// Sequential restore; item order is the order of `failed`
    fn restore_all(&mut self, snapshot: &Snapshot) -> RestoreOutcome {
        let total = snapshot.items.len();
        advance(
            &mut self.progress,
            OperationStatus::Writing,
            format!("Restoring {} account(s)", total),
        );

        let mut tally = RestoreTally::new();
        for (index, bundle) in snapshot.items.iter().enumerate() {
            match self.store.restore_one(bundle) {
                Ok(()) => {
                    debug!(filename = %bundle.filename, "Restored account");
                    tally.record_restored();
                }
                Err(e) => {
                    warn!(filename = %bundle.filename, error = %e, "Failed to restore account");
                    tally.record_failed(bundle.filename.clone(), e.to_string());
                }
            }
            self.progress
                .note(format!("Processed {} of {} account(s)", index + 1, total));
        }

        tally.finish()
    }
}
