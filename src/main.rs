use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use porter::cli::{handle_accounts_command, handle_export, handle_import, handle_inspect};
use porter::config::{PorterPaths, Settings};
use porter::error::PorterResult;

#[derive(Parser)]
#[command(
    name = "porter",
    version,
    about = "Move account credentials between machines as one encrypted file",
    long_about = "account-porter exports every locally stored account credential \
                  bundle into a single password-protected backup file, and restores \
                  them on another machine. Accounts that fail to restore are reported \
                  individually without stopping the rest."
)]
struct Cli {
    /// Override the data directory
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export all stored accounts to an encrypted backup file
    Export {
        /// Where to write the backup (prompted for when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Backup password
        #[arg(long, env = porter::cli::PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Restore accounts from an encrypted backup file
    Import {
        /// Path to the backup file
        file: PathBuf,

        /// Backup password
        #[arg(long, env = porter::cli::PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Show the contents of a backup file without restoring it
    Inspect {
        /// Path to the backup file
        file: PathBuf,

        /// Backup password
        #[arg(long, env = porter::cli::PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },

    /// Stored account management commands
    #[command(subcommand)]
    Accounts(porter::cli::AccountsCommands),

    /// Show current configuration and paths
    Config,
}

fn init_logging() {
    let filter = std::env::var("PORTER_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => PorterPaths::with_base_dir(dir),
        None => PorterPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    match run(&paths, &settings, cli.command) {
        Err(e) if e.is_cancelled() => {
            println!("{}", e);
            Ok(())
        }
        result => Ok(result?),
    }
}

fn run(paths: &PorterPaths, settings: &Settings, command: Option<Commands>) -> PorterResult<()> {
    match command {
        Some(Commands::Export { output, password }) => {
            handle_export(paths, settings, output, password)?;
        }
        Some(Commands::Import { file, password }) => {
            handle_import(paths, settings, &file, password)?;
        }
        Some(Commands::Inspect { file, password }) => {
            handle_inspect(paths, settings, &file, password)?;
        }
        Some(Commands::Accounts(cmd)) => {
            handle_accounts_command(paths, cmd)?;
        }
        Some(Commands::Config) => {
            println!("account-porter Configuration");
            println!("============================");
            println!("Data directory:     {}", paths.base_dir().display());
            println!("Accounts directory: {}", paths.accounts_dir().display());
            println!("Settings file:      {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Producer tag:        {}", settings.producer_tag);
            println!(
                "  Min password length: {}",
                settings.password_policy.min_length
            );
            println!(
                "  Argon2id cost:       {} KiB, {} iteration(s), {} lane(s)",
                settings.key_derivation.memory_cost,
                settings.key_derivation.time_cost,
                settings.key_derivation.parallelism
            );
        }
        None => {
            println!("account-porter - encrypted account credential backups");
            println!();
            println!("Run 'porter --help' for usage information.");
        }
    }

    Ok(())
}
