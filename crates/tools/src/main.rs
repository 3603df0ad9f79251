use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use session::SessionConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tools::{date_rows, summarize_export};

#[derive(Parser, Debug)]
#[command(name = "annotator", about = "Inspect flood / dark-spot annotation exports and overlay config")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Count flood and dark-spot features in an exported features.geojson.
    Summary {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
    /// List the imagery dates offered by the date picker.
    Dates {
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Load and validate a session config file.
    CheckConfig { file: PathBuf },
    /// Print the built-in session config as JSON.
    DefaultConfig,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn real_main(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Summary { file, pretty } => cmd_summary(file, pretty),
        Command::Dates { config } => cmd_dates(config),
        Command::CheckConfig { file } => cmd_check_config(file),
        Command::DefaultConfig => {
            println!("{}", SessionConfig::default().to_json_string_pretty()?);
            Ok(())
        }
    }
}

fn cmd_summary(file: PathBuf, pretty: bool) -> Result<()> {
    let payload = fs::read_to_string(&file).with_context(|| format!("read {file:?}"))?;
    let summary = summarize_export(&payload).with_context(|| format!("parse {file:?}"))?;
    info!(features = summary.features, "summarized export");

    let out = if pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{out}");
    Ok(())
}

fn cmd_dates(config: Option<PathBuf>) -> Result<()> {
    let config = match config {
        Some(path) => load_config(&path)?,
        None => SessionConfig::default(),
    };
    for row in date_rows(&config) {
        println!("{}\t{}\t{} days", row.date_key, row.time_range, row.days);
    }
    Ok(())
}

fn cmd_check_config(file: PathBuf) -> Result<()> {
    let config = load_config(&file)?;
    println!(
        "ok: {} overlay dates, source layer {} at {}",
        config.overlay.dates.len(),
        config.overlay.source.layers,
        config.overlay.source.url
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<SessionConfig> {
    let payload = fs::read_to_string(path).with_context(|| format!("read {path:?}"))?;
    SessionConfig::from_json_str(&payload).with_context(|| format!("invalid config {path:?}"))
}
