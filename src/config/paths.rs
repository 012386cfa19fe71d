//! Path management for account-porter
//!
//! ## Path Resolution Order
//!
//! 1. `PORTER_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/account-porter` or `~/.config/account-porter`
//! 3. Windows: `%APPDATA%\account-porter`

use std::path::PathBuf;

use crate::error::PorterError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "PORTER_DATA_DIR";

/// Manages all paths used by account-porter
#[derive(Debug, Clone)]
pub struct PorterPaths {
    base_dir: PathBuf,
}

impl PorterPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, PorterError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create PorterPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding one JSON file per account credential bundle
    pub fn accounts_dir(&self) -> PathBuf {
        self.base_dir.join("accounts")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base and accounts directories exist
    pub fn ensure_directories(&self) -> Result<(), PorterError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PorterError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.accounts_dir())
            .map_err(|e| PorterError::Io(format!("Failed to create accounts directory: {}", e)))?;

        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, PorterError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME")
                .map_err(|_| PorterError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("account-porter"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, PorterError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| PorterError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("account-porter"))
}
