use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::pipeline::Pipeline;
use crate::spreadsheets::export_records_xlsx;
use chrono::Local;
use clap::Parser;
use log::{error, info, warn};
use std::path::PathBuf;

mod config;
mod domain;
mod errors;
mod listing;
mod pipeline;
mod scout;
mod spreadsheets;

/// Resolve active listings to parcel records with legal descriptions
/// and subdivision keyword counts, exported as a spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "parcel_scout")]
struct Cli {
    /// Max properties to process (applied before the pipeline starts).
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Reject records with a lot smaller than this many acres.
    #[arg(long, default_value_t = 0.0)]
    min_lot_acres: f64,

    /// Jurisdiction name to exclude (matched against the resolved
    /// jurisdiction, the feed label, and the address text).
    #[arg(long)]
    exclude_jurisdiction: Option<String>,

    /// Output workbook path; defaults to scout_results_<timestamp>.xlsx.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = PipelineConfig {
        limit: cli.limit,
        min_lot_acres: cli.min_lot_acres,
        exclude_jurisdiction: cli.exclude_jurisdiction.clone(),
        ..PipelineConfig::default()
    };

    if let Err(e) = run(config, cli.output) {
        error!("Run failed: {e}");
        std::process::exit(1);
    }
}

fn run(config: PipelineConfig, output: Option<PathBuf>) -> Result<(), PipelineError> {
    let pipeline = Pipeline::new(config)?;

    let listings = pipeline.collect_listings();
    if listings.is_empty() {
        warn!("No listings found; nothing to do");
        return Ok(());
    }

    let (records, summary) = pipeline.run(listings);
    summary.log();

    if records.is_empty() {
        warn!("No records accepted; skipping export");
        return Ok(());
    }

    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "scout_results_{}.xlsx",
            Local::now().format("%Y%m%d_%H%M%S")
        ))
    });
    export_records_xlsx(&records, &summary, &path)?;
    info!("Wrote {} ({} rows)", path.display(), records.len());

    Ok(())
}
