//! Dataset merge binary.
//!
//! Scans a directory of raw housing CSVs and writes the combined training
//! file consumed by the offline training pipeline.

use std::path::PathBuf;

use clap::Parser;

use hv_dataset::merge_directory;

/// Merge raw housing CSVs into one training dataset
#[derive(Parser, Debug)]
#[command(name = "merge-datasets", about = "Merge raw housing CSVs into one training dataset")]
struct Args {
    /// Directory containing the raw CSV files.
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Path of the combined output CSV.
    #[arg(short, long, default_value = "data/combined_data.csv")]
    output: PathBuf,

    /// Emit JSON logs instead of pretty console output.
    #[arg(long)]
    json_logs: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    hv_core::logging::init_tracing(args.json_logs);

    let summary = merge_directory(&args.data_dir, &args.output)?;

    tracing::info!(
        files = summary.files.len(),
        rows = summary.rows_written,
        columns = summary.columns,
        "merge complete"
    );
    Ok(())
}
