//! Muleflow CLI.
//!
//! Ingests a transaction batch (CSV or JSON), runs the detection engine, and
//! writes the analysis report as JSON.

mod ingest;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use muleflow::core::logging::{LogConfig, LogLevel};
use muleflow::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "muleflow")]
#[command(version, about = "Money-muling detection over transaction batches", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InputFormat {
    /// Header-mapped CSV with the boundary schema
    Csv,
    /// JSON array of transaction records
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a transaction batch and emit the report
    Analyze {
        /// Input file (CSV or JSON)
        input: PathBuf,

        /// Input format; inferred from the file extension when omitted
        #[arg(short, long)]
        format: Option<InputFormat>,

        /// Detection configuration file (TOML); defaults otherwise
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the active detection configuration as TOML
    Config {
        /// Detection configuration file (TOML); defaults otherwise
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log = LogConfig {
        level: if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        },
        ..Default::default()
    };
    log.init();

    match cli.command {
        Commands::Analyze {
            input,
            format,
            config,
            output,
        } => {
            let config = load_config(config.as_deref())?;
            let engine = AnalysisEngine::new(config)?;

            let format = format.unwrap_or_else(|| infer_format(&input));
            let transactions = match format {
                InputFormat::Csv => ingest::read_csv(&input)?,
                InputFormat::Json => ingest::read_json(&input)?,
            };
            tracing::info!(
                transactions = transactions.len(),
                input = %input.display(),
                "batch loaded"
            );

            let outcome = engine
                .analyze(&transactions)
                .context("analysis failed; no partial report emitted")?;
            let json = outcome.report.to_json_pretty()?;

            match output {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    tracing::info!(output = %path.display(), "report written");
                }
                None => println!("{json}"),
            }
        }

        Commands::Config { config } => {
            let config = load_config(config.as_deref())?;
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<DetectionConfig> {
    match path {
        Some(path) => DetectionConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(DetectionConfig::default()),
    }
}

fn infer_format(path: &std::path::Path) -> InputFormat {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => InputFormat::Json,
        _ => InputFormat::Csv,
    }
}
