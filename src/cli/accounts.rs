//! Account CLI commands
//!
//! Lists and removes the credential bundles held in the accounts directory.

use clap::Subcommand;

use crate::config::PorterPaths;
use crate::error::PorterResult;
use crate::store::{CredentialStore, DirectoryStore};

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountsCommands {
    /// List stored accounts
    #[command(alias = "ls")]
    List,

    /// Delete one stored account
    #[command(alias = "rm")]
    Delete {
        /// Account name or file name
        name: String,
    },

    /// Delete every stored account
    Clear {
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle an accounts command
pub fn handle_accounts_command(paths: &PorterPaths, cmd: AccountsCommands) -> PorterResult<()> {
    let mut store = DirectoryStore::new(paths.accounts_dir());

    match cmd {
        AccountsCommands::List => {
            let bundles = store.collect_all()?;

            if bundles.is_empty() {
                println!("No accounts stored.");
                println!("Restore some with: porter import <FILE>");
                return Ok(());
            }

            println!("Stored Accounts");
            println!("===============");
            for bundle in &bundles {
                println!("  {}", bundle.account_name());
            }
            println!();
            println!("Total: {} account(s)", bundles.len());
        }

        AccountsCommands::Delete { name } => {
            store.delete_one(&name)?;
            println!("Deleted account: {}", name);
        }

        AccountsCommands::Clear { force } => {
            let count = store.collect_all()?.len();
            if count == 0 {
                println!("No accounts stored.");
                return Ok(());
            }

            if !force {
                println!("WARNING: This will delete all {} stored account(s)!", count);
                println!("To proceed, run again with --force flag:");
                println!("  porter accounts clear --force");
                return Ok(());
            }

            let removed = store.clear_all()?;
            println!("Deleted {} account(s).", removed);
        }
    }

    Ok(())
}
