//! User settings for account-porter
//!
//! Password policy, key-derivation cost and the producer tag stamped into
//! every exported snapshot. Stored as `config.json` in the base directory.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::paths::PorterPaths;
use crate::error::PorterError;

/// Password policy applied before any encryption or decryption work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    /// Minimum number of characters
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

fn default_min_length() -> usize {
    8
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
        }
    }
}

/// Argon2id cost parameters used when sealing new artifacts
///
/// Artifacts carry their own parameters, so changing these only affects
/// future exports. Fields missing from the file take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfSettings {
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub memory_cost: u32,
    /// Iterations (default: 3)
    pub time_cost: u32,
    /// Parallelism degree (default: 4)
    pub parallelism: u32,
}

impl Default for KdfSettings {
    fn default() -> Self {
        Self {
            memory_cost: 65536,
            time_cost: 3,
            parallelism: 4,
        }
    }
}

#[cfg(test)]
impl KdfSettings {
    /// Cheap parameters for unit tests
    pub(crate) fn fast() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// User settings for account-porter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub password_policy: PasswordPolicy,

    #[serde(default)]
    pub key_derivation: KdfSettings,

    /// Tag identifying the producing application inside snapshots
    #[serde(default = "default_producer_tag")]
    pub producer_tag: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_producer_tag() -> String {
    "account-porter".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            password_policy: PasswordPolicy::default(),
            key_derivation: KdfSettings::default(),
            producer_tag: default_producer_tag(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &PorterPaths) -> Result<Self, PorterError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| PorterError::Io(format!("Failed to read settings file: {}", e)))?;

        let mut settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| PorterError::Config(format!("Failed to parse settings file: {}", e)))?;

        // Import rejects snapshots without a producer tag
        if settings.producer_tag.trim().is_empty() {
            warn!("Blank producer_tag in settings, using {}", default_producer_tag());
            settings.producer_tag = default_producer_tag();
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PorterPaths) -> Result<(), PorterError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PorterError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PorterError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
