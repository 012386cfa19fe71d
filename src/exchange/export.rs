//! Export orchestration
//!
//! Export is all-or-nothing over the current credential store: either the
//! whole snapshot is sealed and written, or nothing is written.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{abort, advance, begin, current_platform, ArtifactIo, FsArtifactIo};
use crate::codec::{self, CURRENT_FORMAT_VERSION};
use crate::crypto::CipherProvider;
use crate::error::{PorterError, PorterResult};
use crate::models::{Snapshot, SnapshotMetadata};
use crate::progress::{OperationStatus, ProgressReporter};
use crate::store::CredentialStore;

const PRODUCER_TAG: &str = "account-porter";

/// Suggested artifact filename for an export started at `now`
pub fn default_export_filename(now: DateTime<Utc>) -> String {
    format!("accounts_backup_{}.enc", now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Result of a completed export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub item_count: usize,
}

/// Builds and writes encrypted backups of a credential store
pub struct Exporter<'a, S, C, W = FsArtifactIo> {
    store: &'a S,
    cipher: &'a C,
    io: W,
    producer_tag: String,
    progress: ProgressReporter,
}

impl<'a, S, C> Exporter<'a, S, C, FsArtifactIo>
where
    S: CredentialStore,
    C: CipherProvider,
{
    pub fn new(store: &'a S, cipher: &'a C) -> Self {
        Self::with_io(store, cipher, FsArtifactIo)
    }
}

impl<'a, S, C, W> Exporter<'a, S, C, W>
where
    S: CredentialStore,
    C: CipherProvider,
    W: ArtifactIo,
{
    pub fn with_io(store: &'a S, cipher: &'a C, io: W) -> Self {
        Self {
            store,
            cipher,
            io,
            producer_tag: PRODUCER_TAG.to_string(),
            progress: ProgressReporter::new(),
        }
    }

    /// Set the producer tag recorded in snapshot metadata
    ///
    /// A blank tag would make the backup unreadable, so it keeps the default.
    pub fn producer_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if tag.trim().is_empty() {
            warn!("Ignoring blank producer tag, using {}", PRODUCER_TAG);
        } else {
            self.producer_tag = tag;
        }
        self
    }

    pub fn progress(&self) -> &ProgressReporter {
        &self.progress
    }

    /// Access the reporter to subscribe observers
    pub fn progress_mut(&mut self) -> &mut ProgressReporter {
        &mut self.progress
    }

    pub fn io(&self) -> &W {
        &self.io
    }

    /// Collect every bundle and build the snapshot to export
    ///
    /// Fails with [`PorterError::NothingToExport`] when the store is empty,
    /// so callers can stop before asking for a password.
    pub fn prepare(&mut self) -> PorterResult<Snapshot> {
        begin(&mut self.progress);
        advance(
            &mut self.progress,
            OperationStatus::Reading,
            "Collecting account credentials",
        );

        let items = match self.store.collect_all() {
            Ok(items) => items,
            Err(e) => return Err(abort(&mut self.progress, "Export failed", e.into())),
        };

        if items.is_empty() {
            return Err(abort(
                &mut self.progress,
                "Export failed",
                PorterError::NothingToExport,
            ));
        }

        let snapshot = Snapshot::new(
            CURRENT_FORMAT_VERSION,
            Utc::now().timestamp(),
            items,
            SnapshotMetadata {
                platform: current_platform().to_string(),
                encryption_algorithm_id: self.cipher.algorithm_id().to_string(),
                producer_tag: self.producer_tag.clone(),
            },
        );

        debug!(items = snapshot.item_count, "Snapshot prepared");
        Ok(snapshot)
    }

    /// Seal `snapshot` with `password` and write it to `destination`
    ///
    /// A `None` destination means the user chose no file; this fails with
    /// [`PorterError::UserCancelled`] and writes nothing.
    pub fn export(
        &mut self,
        snapshot: &Snapshot,
        password: &str,
        destination: Option<&Path>,
    ) -> PorterResult<ExportReport> {
        match self.seal_and_write(snapshot, password, destination) {
            Ok(report) => Ok(report),
            Err(e) => Err(abort(&mut self.progress, "Export failed", e)),
        }
    }

    fn seal_and_write(
        &mut self,
        snapshot: &Snapshot,
        password: &str,
        destination: Option<&Path>,
    ) -> PorterResult<ExportReport> {
        advance(
            &mut self.progress,
            OperationStatus::Validating,
            "Checking password",
        );
        self.cipher.validate_password(password).into_result()?;

        advance(
            &mut self.progress,
            OperationStatus::Encrypting,
            "Encrypting backup",
        );
        let plaintext = codec::serialize(snapshot)?;
        // Never seal a document that import would refuse
        let (_, check) = codec::decode(&plaintext)?;
        for warning in &check.warnings {
            debug!(warning = %warning, "Snapshot warning before sealing");
        }
        let artifact = self.cipher.encrypt(&plaintext, password)?;

        let path = destination
            .ok_or_else(|| PorterError::UserCancelled("no destination chosen".to_string()))?;

        advance(
            &mut self.progress,
            OperationStatus::Writing,
            format!("Writing {}", path.display()),
        );
        self.io.write(path, &artifact)?;

        let report = ExportReport {
            path: path.to_path_buf(),
            item_count: snapshot.items.len(),
        };

        info!(
            path = %report.path.display(),
            items = report.item_count,
            "Exported accounts"
        );
        advance(
            &mut self.progress,
            OperationStatus::Completed,
            format!("Exported {} account(s)", report.item_count),
        );
        Ok(report)
    }
}
