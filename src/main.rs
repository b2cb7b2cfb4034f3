use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use scriptnet::config::PipelineConfig;
use scriptnet::export::write_run_stats;
use scriptnet::runner::{process_directory, RunOptions};

#[derive(Parser, Debug)]
#[command(name = "scriptnet")]
#[command(about = "Character dialogue network builder for fixed-width screenplay transcripts")]
#[command(version)]
struct Args {
    /// Directory containing the transcript files
    input_dir: PathBuf,

    /// Directory for the exported tables
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of top speakers kept (overrides config)
    #[arg(long)]
    top_n: Option<usize>,

    /// Frequent-term quantile in [0, 1] (overrides config)
    #[arg(long)]
    percentile: Option<f64>,

    /// Field separator for exported tables (overrides config)
    #[arg(long)]
    delimiter: Option<char>,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Stats output file path
    #[arg(long, default_value = "run_stats.json")]
    stats_out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .json()
        .init();

    let args = Args::parse();

    info!("Starting scriptnet");
    info!(?args, "Parsed CLI arguments");

    if !args.input_dir.exists() {
        anyhow::bail!("Input directory does not exist: {}", args.input_dir.display());
    }
    if !args.input_dir.is_dir() {
        anyhow::bail!("Input path is not a directory: {}", args.input_dir.display());
    }

    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path).await?,
        None => PipelineConfig::default(),
    };
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    if let Some(percentile) = args.percentile {
        config.percentile = percentile;
    }
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }
    config.validate()?;

    let options = RunOptions { fail_fast: args.fail_fast };
    let stats = process_directory(&args.input_dir, &args.output_dir, &config, &options).await?;

    write_run_stats(&args.stats_out, &stats).await?;
    info!("Run statistics written to {}", args.stats_out.display());

    let failed = stats.sources.iter().filter(|s| s.error.is_some()).count();
    println!("scriptnet v{} - run complete", env!("CARGO_PKG_VERSION"));
    println!("Sources processed: {}, failed: {}", stats.sources.len() - failed, failed);
    println!("Dialogue records: {}", stats.records_total);
    println!(
        "Speakers: {} distinct, {} kept",
        stats.distinct_speakers, stats.top_speakers
    );
    match stats.threshold {
        Some(threshold) => println!(
            "Vocabulary: {} terms, {} at or above {:.2} (q = {})",
            stats.vocabulary_size, stats.frequent_terms, threshold, stats.percentile
        ),
        None => println!("Vocabulary: empty"),
    }
    println!("Tables written to {}", args.output_dir.display());

    Ok(())
}
