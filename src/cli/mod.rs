//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the exchange layer.

pub mod accounts;
pub mod exchange;
pub mod prompt;

pub use accounts::{handle_accounts_command, AccountsCommands};
pub use exchange::{handle_export, handle_import, handle_inspect};
pub use prompt::PASSWORD_ENV;
