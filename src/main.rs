// Key Audit - CLI
// Analyze a batch of access keys or inspect a single one, printing JSON to stdout

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use key_audit::{load_keys, AccessKeyComponents, AnalyzerConfig, KeyAnalyzer, KeyBatch};

#[derive(Parser)]
#[command(name = "key-audit", version, about = "Detect predictable random codes in access keys")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify the random-code pattern of keys from a single issuer
    Analyze {
        /// Access keys (44 digits each)
        keys: Vec<String>,

        /// Read keys from a file (one per line, or CSV with a `key` column)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// JSON file with classification thresholds
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// Show the fields of a single access key
    Inspect {
        key: String,
    },
}

#[derive(Serialize)]
struct InspectReport<'a> {
    components: &'a AccessKeyComponents,
    issue_month: Option<String>,
    expected_check_digit: u32,
    check_digit_valid: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Analyze {
            keys,
            file,
            config,
            pretty,
        } => run_analyze(keys, file, config, pretty),
        Command::Inspect { key } => run_inspect(&key),
    }
}

fn run_analyze(
    mut keys: Vec<String>,
    file: Option<PathBuf>,
    config: Option<PathBuf>,
    pretty: bool,
) -> Result<()> {
    if let Some(path) = file {
        let loaded = load_keys(&path)?;
        info!(count = loaded.len(), "loaded keys from {:?}", path);
        keys.extend(loaded);
    }

    if keys.is_empty() {
        bail!("No keys provided: pass keys as arguments or use --file");
    }

    let config = match config {
        Some(path) => AnalyzerConfig::from_file(path)?,
        None => AnalyzerConfig::default(),
    };

    let batch = KeyBatch::from_keys(&keys).context("Key validation failed")?;

    let bad_check_digits = batch
        .components()
        .iter()
        .filter(|c| !c.check_digit_matches())
        .count();
    if bad_check_digits > 0 {
        warn!(
            count = bad_check_digits,
            "keys with a check digit that does not match modulo 11"
        );
    }

    let result = KeyAnalyzer::with_config(config).analyze_batch(&batch);
    info!("{}", result.summary());

    print_json(&result, pretty)
}

fn run_inspect(key: &str) -> Result<()> {
    let components = AccessKeyComponents::extract(key)?;

    let report = InspectReport {
        components: &components,
        issue_month: components
            .issue_month()
            .map(|date| date.format("%Y-%m").to_string()),
        expected_check_digit: components.expected_check_digit(),
        check_digit_valid: components.check_digit_matches(),
    };

    print_json(&report, true)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", output);
    Ok(())
}
