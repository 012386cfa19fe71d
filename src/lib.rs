//! account-porter - encrypted exchange of account credential bundles
//!
//! This library moves a set of locally stored account credential bundles
//! between machines as one password-protected file, and restores them with
//! per-account fault isolation.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Bundles, snapshots, artifacts and restore outcomes
//! - `codec`: Versioned snapshot format and its validation rules
//! - `crypto`: Password-based encryption behind the `CipherProvider` trait
//! - `store`: Credential stores (directory-backed and in-memory)
//! - `progress`: Observable progress state machine
//! - `exchange`: Export and import orchestration
//! - `cli`: Command handlers for the `porter` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use porter::config::{PorterPaths, Settings};
//! use porter::crypto::PasswordCipher;
//! use porter::exchange::Exporter;
//! use porter::store::DirectoryStore;
//!
//! let paths = PorterPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = DirectoryStore::new(paths.accounts_dir());
//! let cipher = PasswordCipher::from_settings(&settings);
//!
//! let mut exporter = Exporter::new(&store, &cipher);
//! let snapshot = exporter.prepare()?;
//! exporter.export(&snapshot, "a long password", Some("backup.enc".as_ref()))?;
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod exchange;
pub mod models;
pub mod progress;
pub mod store;

pub use error::{PorterError, PorterResult};
