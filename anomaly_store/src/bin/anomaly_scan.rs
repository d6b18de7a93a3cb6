use std::path::PathBuf;

use anomaly_engine::{
    Analyzer,
    models::{AlignmentResult, AnomalyEvent, EventDistance},
};
use anomaly_store::{SqliteStore, config::AppConfig, import};
use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Detect price anomalies and compare tickers")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Overrides `database_url` from the config file and $DATABASE_URL
    #[arg(long, value_name = "URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Load Alpaca bar JSON into the stocks table
    Import {
        #[arg(long)]
        ticker: String,
        #[arg(long, value_name = "FILE")]
        file: PathBuf,
    },
    /// Find anomaly events for a ticker and store them
    Detect {
        #[arg(long)]
        ticker: String,
        /// Print the events without writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Align a ticker with a reference and score its stored events
    Compare {
        #[arg(long)]
        ticker: String,
        #[arg(long)]
        reference: String,
    },
    /// Print stored anomaly rows for a ticker
    Anomalies {
        #[arg(long)]
        ticker: String,
    },
}

#[derive(Serialize)]
struct DetectOutput<'a> {
    ticker: &'a str,
    rows: usize,
    outliers: usize,
    events: &'a [AnomalyEvent],
    dry_run: bool,
}

#[derive(Serialize)]
struct CompareOutput<'a> {
    ticker: &'a str,
    reference: &'a str,
    distance: f64,
    path_len: usize,
    events: &'a [EventDistance],
}

impl<'a> CompareOutput<'a> {
    fn new(ticker: &'a str, reference: &'a str, a: &AlignmentResult, events: &'a [EventDistance]) -> Self {
        Self {
            ticker,
            reference,
            distance: a.distance,
            path_len: a.path.len(),
            events,
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref())?;
    let db_url = cfg.resolve_database_url(cli.database_url)?;
    let mut store = SqliteStore::open(&db_url)?;

    match cli.cmd {
        Cmd::Import { ticker, file } => {
            let report = import::import_file(&mut store, &ticker, &file)?;
            print_json(&report)?;
        }
        Cmd::Detect { ticker, dry_run } => {
            let analyzer = Analyzer::new(cfg.engine)?;
            let detection = analyzer.run_detection(&mut store, &ticker, dry_run)?;
            print_json(&DetectOutput {
                ticker: &ticker,
                rows: detection.labels.len(),
                outliers: detection.labels.iter().filter(|l| l.is_outlier).count(),
                events: &detection.events,
                dry_run,
            })?;
        }
        Cmd::Compare { ticker, reference } => {
            let analyzer = Analyzer::new(cfg.engine)?;
            let comparison = analyzer.run_comparison(&mut store, &ticker, &reference)?;
            print_json(&CompareOutput::new(
                &ticker,
                &reference,
                &comparison.alignment,
                &comparison.distances,
            ))?;
        }
        Cmd::Anomalies { ticker } => {
            print_json(&store.anomalies(&ticker)?)?;
        }
    }

    Ok(())
}
