use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use gbif_occurrence_field_parse::catalog::{select_catalog, OCCURRENCE_FILE_CATALOG};
use gbif_occurrence_field_parse::source::{FileSource, DEFAULT_LIMIT};
use gbif_occurrence_field_parse::{log_summary, run_extraction, setup_logging};

#[derive(Parser)]
#[command(name = "GBIF Occurrence File Field Parser")]
#[command(about = "Parse GBIF occurrence JSON data from a file and extract metadata.")]
#[command(after_help = "Example usage: parse-gbif-occurrence-file <FILE_IN> <FILE_OUT> --limit 10")]
#[command(version = "1.0")]
struct Cli {
    #[arg(value_name = "FILE_IN", help = "Input JSON file (optionally .gz) containing GBIF occurrence data.")]
    input: PathBuf,

    #[arg(value_name = "FILE_OUT", help = "Output file for saving the extracted metadata.")]
    output: PathBuf,

    #[arg(long, default_value_t = DEFAULT_LIMIT, help = "Number of records to process from the input JSON.")]
    limit: usize,

    #[arg(short, long, help = "Comma-separated NAME=dotted.path fields to extract instead of the built-in set")]
    fields: Option<String>,

    #[arg(short, long, default_value = "INFO", help = "Logging level (DEBUG, INFO, WARN, ERROR)")]
    log_level: String,
}

fn run(cli: Cli) -> Result<()> {
    let start_time = Instant::now();
    setup_logging(&cli.log_level)?;
    info!("Starting GBIF occurrence file parser");

    let catalog = select_catalog(cli.fields.as_deref(), &OCCURRENCE_FILE_CATALOG)?;
    let source = FileSource::new(&cli.input, cli.limit);

    let summary = run_extraction(&source, &catalog, &cli.output)
        .with_context(|| format!("Extraction from {} failed", cli.input.display()))?;

    log_summary(&summary, &cli.output, start_time.elapsed());
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        println!("ERROR: {:#}", e);
        process::exit(1);
    }
}
