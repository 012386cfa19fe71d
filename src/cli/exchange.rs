//! Export, import and inspect commands

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use super::prompt::{password_or_prompt, prompt_destination};
use crate::config::{PorterPaths, Settings};
use crate::crypto::PasswordCipher;
use crate::error::PorterResult;
use crate::exchange::{default_export_filename, Exporter, Importer};
use crate::progress::ProgressEvent;
use crate::store::DirectoryStore;

fn log_progress(event: &ProgressEvent) {
    match &event.error {
        Some(detail) => info!(status = %event.status, detail = %detail, "{}", event.message),
        None => info!(status = %event.status, "{}", event.message),
    }
}

fn format_timestamp(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Export every stored account into one encrypted file
pub fn handle_export(
    paths: &PorterPaths,
    settings: &Settings,
    output: Option<PathBuf>,
    password: Option<String>,
) -> PorterResult<()> {
    let store = DirectoryStore::new(paths.accounts_dir());
    let cipher = PasswordCipher::from_settings(settings);

    let mut exporter = Exporter::new(&store, &cipher).producer_tag(settings.producer_tag.clone());
    exporter.progress_mut().subscribe(log_progress);

    // Fails before any prompt when there is nothing to export
    let snapshot = exporter.prepare()?;
    println!("Found {} account(s) to export.", snapshot.items.len());

    let password = password_or_prompt(password, true)?;

    let destination = match output {
        Some(path) => Some(path),
        None => prompt_destination(&default_export_filename(Utc::now()))?,
    };

    let report = exporter.export(&snapshot, &password, destination.as_deref())?;

    println!(
        "Exported {} account(s) to {}",
        report.item_count,
        report.path.display()
    );
    println!("Keep the password safe: the backup cannot be opened without it.");

    Ok(())
}

/// Restore accounts from an encrypted file
pub fn handle_import(
    paths: &PorterPaths,
    settings: &Settings,
    file: &Path,
    password: Option<String>,
) -> PorterResult<()> {
    paths.ensure_directories()?;
    let mut store = DirectoryStore::new(paths.accounts_dir());
    let cipher = PasswordCipher::from_settings(settings);

    let mut importer = Importer::new(&mut store, &cipher);
    importer.progress_mut().subscribe(log_progress);

    let artifact = importer.read_artifact(Some(file))?;
    let password = password_or_prompt(password, false)?;
    let report = importer.import(&artifact, &password)?;

    for warning in &report.warnings {
        println!("Warning: {}", warning);
    }

    println!("{}", report.outcome.summary());

    if !report.outcome.is_complete() {
        println!();
        println!("Failed accounts:");
        for failed in report.outcome.failed() {
            println!("  {}: {}", failed.filename, failed.error);
        }
    }

    Ok(())
}

/// Show what an encrypted file contains without restoring it
pub fn handle_inspect(
    paths: &PorterPaths,
    settings: &Settings,
    file: &Path,
    password: Option<String>,
) -> PorterResult<()> {
    let mut store = DirectoryStore::new(paths.accounts_dir());
    let cipher = PasswordCipher::from_settings(settings);

    let mut importer = Importer::new(&mut store, &cipher);
    importer.progress_mut().subscribe(log_progress);

    let artifact = importer.read_artifact(Some(file))?;
    let password = password_or_prompt(password, false)?;
    let preview = importer.inspect(&artifact, &password)?;

    println!("Backup Details");
    println!("==============");
    println!("File: {}", file.display());
    println!("{}", preview.summary());
    println!("Producer: {}", preview.snapshot.metadata.producer_tag);
    println!();

    println!("Accounts:");
    for (i, bundle) in preview.snapshot.items.iter().enumerate() {
        println!(
            "  {}. {} (captured {})",
            i + 1,
            bundle.account_name(),
            format_timestamp(bundle.timestamp)
        );
    }

    if !preview.validation.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &preview.validation.warnings {
            println!("  - {}", warning);
        }
    }

    Ok(())
}
