//! Configuration module for account-porter
//!
//! - Data directory resolution
//! - User settings persistence (password policy, key-derivation cost)

pub mod paths;
pub mod settings;

pub use paths::PorterPaths;
pub use settings::{KdfSettings, PasswordPolicy, Settings};
