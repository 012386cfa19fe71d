//! In-memory credential store

use std::collections::HashMap;

use super::{bundle_filename, check_filename, CredentialStore, StoreError};
use crate::models::CredentialBundle;

/// Ordered in-memory credential store
///
/// Restores can be made to fail for chosen filenames, which lets callers
/// exercise partial-failure handling without touching a disk.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    bundles: Vec<CredentialBundle>,
    failures: HashMap<String, String>,
    restore_calls: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundles(bundles: Vec<CredentialBundle>) -> Self {
        Self {
            bundles,
            ..Self::default()
        }
    }

    /// Make every restore of `filename` fail with `message`
    pub fn fail_on(mut self, filename: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(filename.into(), message.into());
        self
    }

    pub fn bundles(&self) -> &[CredentialBundle] {
        &self.bundles
    }

    /// Number of `restore_one` calls, successful or not
    pub fn restore_calls(&self) -> usize {
        self.restore_calls
    }
}

impl CredentialStore for MemoryStore {
    fn collect_all(&self) -> Result<Vec<CredentialBundle>, StoreError> {
        Ok(self.bundles.clone())
    }

    fn restore_one(&mut self, bundle: &CredentialBundle) -> Result<(), StoreError> {
        self.restore_calls += 1;
        check_filename(&bundle.filename)?;

        if let Some(message) = self.failures.get(&bundle.filename) {
            return Err(StoreError::Io(message.clone()));
        }

        match self
            .bundles
            .iter_mut()
            .find(|existing| existing.filename == bundle.filename)
        {
            Some(existing) => *existing = bundle.clone(),
            None => self.bundles.push(bundle.clone()),
        }
        Ok(())
    }

    fn delete_one(&mut self, filename: &str) -> Result<(), StoreError> {
        let filename = bundle_filename(filename);
        let before = self.bundles.len();
        self.bundles.retain(|b| b.filename != filename);

        if self.bundles.len() == before {
            Err(StoreError::NotFound(filename))
        } else {
            Ok(())
        }
    }

    fn clear_all(&mut self) -> Result<usize, StoreError> {
        let removed = self.bundles.len();
        self.bundles.clear();
        Ok(removed)
    }
}
