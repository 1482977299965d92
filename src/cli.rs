use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use platdiff::compare::compare;
use platdiff::snapshot::reader::{ReadOptions, read_snapshot};
use platdiff::snapshot::KeyColumns;
use platdiff::{notify, output};

#[derive(Parser)]
#[command(name = "platdiff", about = "Snapshot comparison and delta reporting tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two snapshot CSV files and write a delta report
    Compare {
        /// Path to the old snapshot CSV
        #[arg(long)]
        old: PathBuf,

        /// Path to the new snapshot CSV
        #[arg(long)]
        new: PathBuf,

        /// Report destination path
        #[arg(short, long)]
        output: PathBuf,

        /// The two key column names, comma separated
        #[arg(long, default_value = "ID,PlatformName")]
        key_columns: String,

        /// Endpoint for the post-run status notification
        #[arg(long, env = "PLATDIFF_NOTIFY_URL", default_value = notify::DEFAULT_ENDPOINT)]
        notify_url: String,

        /// Skip the status notification entirely
        #[arg(long)]
        no_notify: bool,
    },
}

pub async fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Compare {
            old,
            new,
            output,
            key_columns,
            notify_url,
            no_notify,
        } => handle_compare(old, new, output, &key_columns, &notify_url, no_notify).await,
    }
}

async fn handle_compare(
    old: PathBuf,
    new: PathBuf,
    output: PathBuf,
    key_columns: &str,
    notify_url: &str,
    no_notify: bool,
) -> Result<()> {
    let keys = parse_key_columns(key_columns)?;
    let read_options = ReadOptions::default();

    let old_snapshot = read_snapshot(&old, &read_options)
        .with_context(|| format!("Failed to read old snapshot {}", old.display()))?;
    let new_snapshot = read_snapshot(&new, &read_options)
        .with_context(|| format!("Failed to read new snapshot {}", new.display()))?;

    println!(
        "Comparing {} ({} rows) against {} ({} rows)...",
        old.display(),
        old_snapshot.row_count(),
        new.display(),
        new_snapshot.row_count()
    );

    let comparison = compare(&old_snapshot, &new_snapshot, &keys)?;

    output::write_report(&output, &comparison.entries)
        .with_context(|| format!("Failed to write report to {}", output.display()))?;
    let sidecar = output::write_sidecar(&output)?;

    println!("Report written to {}", output.display());
    if comparison.is_empty() {
        println!("No differences found.");
    }
    println!("New items: {}", comparison.new_item_count);
    println!("Changed values: {}", comparison.changed_value_count);
    if !comparison.skipped_columns.is_empty() {
        println!(
            "Columns excluded from comparison: {}",
            comparison.skipped_columns.join(", ")
        );
    }

    // Best effort; the report above is already final.
    if !no_notify {
        notify::notify_best_effort(notify_url, &sidecar).await;
    }

    Ok(())
}

/// Split a `"first,second"` flag value into the composite key definition.
fn parse_key_columns(spec: &str) -> Result<KeyColumns> {
    let parts: Vec<&str> = spec.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [first, second] if !first.is_empty() && !second.is_empty() => {
            Ok(KeyColumns::new(*first, *second))
        }
        _ => anyhow::bail!("--key-columns expects exactly two column names, got '{spec}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser as _};

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    // One test on purpose: the env var must not be set while another
    // parse asserts the default.
    #[test]
    fn test_notify_url_sources() {
        let base = [
            "platdiff", "compare", "--old", "a.csv", "--new", "b.csv", "--output", "r.csv",
        ];

        let cli = Cli::try_parse_from(base).unwrap();
        let Commands::Compare {
            notify_url,
            no_notify,
            ..
        } = cli.command;
        assert_eq!(notify_url, notify::DEFAULT_ENDPOINT);
        assert!(!no_notify);

        let mut with_flag = base.to_vec();
        with_flag.extend(["--notify-url", "http://127.0.0.1:8080/status.json"]);
        let cli = Cli::try_parse_from(with_flag).unwrap();
        let Commands::Compare { notify_url, .. } = cli.command;
        assert_eq!(notify_url, "http://127.0.0.1:8080/status.json");

        std::env::set_var("PLATDIFF_NOTIFY_URL", "http://127.0.0.1:9999/meta.json");
        let cli = Cli::try_parse_from(base).unwrap();
        std::env::remove_var("PLATDIFF_NOTIFY_URL");
        let Commands::Compare { notify_url, .. } = cli.command;
        assert_eq!(notify_url, "http://127.0.0.1:9999/meta.json");
    }

    #[test]
    fn test_parse_key_columns() {
        let keys = parse_key_columns("ID,PlatformName").unwrap();
        assert_eq!(keys.first, "ID");
        assert_eq!(keys.second, "PlatformName");

        let keys = parse_key_columns(" id , platform ").unwrap();
        assert_eq!(keys.first, "id");
        assert_eq!(keys.second, "platform");
    }

    #[test]
    fn test_parse_key_columns_rejects_wrong_arity() {
        assert!(parse_key_columns("ID").is_err());
        assert!(parse_key_columns("A,B,C").is_err());
        assert!(parse_key_columns("A,").is_err());
    }
}
