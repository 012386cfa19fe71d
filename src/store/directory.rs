//! Directory-backed credential store
//!
//! One pretty-printed JSON file per account, named after the bundle's
//! filename.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::{debug, warn};

use super::file_io::write_json_atomic;
use super::{bundle_filename, check_filename, CredentialStore, StoreError};
use crate::models::CredentialBundle;

/// Credential store over a directory of `*.json` files
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of every `*.json` file, sorted by name
    fn bundle_paths(&self) -> Result<Vec<PathBuf>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && has_json_extension(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn read_bundle(path: &Path) -> Result<CredentialBundle, StoreError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::InvalidFilename(path.display().to_string()))?
            .to_string();

        let contents = fs::read_to_string(path)?;
        let content: serde_json::Value = serde_json::from_str(&contents)?;

        let timestamp = fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);

        Ok(CredentialBundle::new(filename, content, timestamp))
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

impl CredentialStore for DirectoryStore {
    fn collect_all(&self) -> Result<Vec<CredentialBundle>, StoreError> {
        let mut bundles = Vec::new();

        for path in self.bundle_paths()? {
            match Self::read_bundle(&path) {
                Ok(bundle) => bundles.push(bundle),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable account file"),
            }
        }

        debug!(count = bundles.len(), dir = %self.dir.display(), "Collected account files");
        Ok(bundles)
    }

    fn restore_one(&mut self, bundle: &CredentialBundle) -> Result<(), StoreError> {
        check_filename(&bundle.filename)?;
        // Anything else would be invisible to collect, list and clear
        if !has_json_extension(Path::new(&bundle.filename)) {
            return Err(StoreError::InvalidFilename(bundle.filename.clone()));
        }
        write_json_atomic(self.dir.join(&bundle.filename), &bundle.content)
    }

    fn delete_one(&mut self, filename: &str) -> Result<(), StoreError> {
        let filename = bundle_filename(filename);
        check_filename(&filename)?;

        let path = self.dir.join(&filename);
        if !path.is_file() {
            return Err(StoreError::NotFound(filename));
        }

        fs::remove_file(&path)?;
        Ok(())
    }

    fn clear_all(&mut self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for path in self.bundle_paths()? {
            fs::remove_file(&path)?;
            removed += 1;
        }
        Ok(removed)
    }
}
