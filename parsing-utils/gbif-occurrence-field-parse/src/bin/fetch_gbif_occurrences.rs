use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use gbif_occurrence_field_parse::catalog::{select_catalog, OCCURRENCE_SEARCH_CATALOG};
use gbif_occurrence_field_parse::source::{GbifSearchSource, DEFAULT_GBIF_API_URL, DEFAULT_LIMIT};
use gbif_occurrence_field_parse::{log_summary, run_extraction, setup_logging};

#[derive(Parser)]
#[command(name = "GBIF Occurrence Search Field Parser")]
#[command(about = "Fetch and parse GBIF occurrence data to extract metadata.")]
#[command(after_help = "Example usage: fetch-gbif-occurrences <FILE_OUT> --species <SCIENTIFIC_NAME>")]
#[command(version = "1.0")]
struct Cli {
    #[arg(value_name = "FILE_OUT", help = "Output file for saving the fetched metadata.")]
    output: PathBuf,

    #[arg(long, required = true, help = "Scientific name of the species (Genus species) to search in GBIF.")]
    species: String,

    #[arg(long, default_value_t = DEFAULT_LIMIT, help = "Number of records to fetch from GBIF.")]
    limit: usize,

    #[arg(long, env = "GBIF_API_URL", default_value = DEFAULT_GBIF_API_URL, help = "GBIF occurrence search endpoint")]
    api_url: String,

    #[arg(short, long, help = "Comma-separated NAME=dotted.path fields to extract instead of the built-in set")]
    fields: Option<String>,

    #[arg(short, long, default_value = "INFO", help = "Logging level (DEBUG, INFO, WARN, ERROR)")]
    log_level: String,
}

fn run(cli: Cli) -> Result<()> {
    let start_time = Instant::now();
    setup_logging(&cli.log_level)?;
    info!("Starting GBIF occurrence search parser");

    let catalog = select_catalog(cli.fields.as_deref(), &OCCURRENCE_SEARCH_CATALOG)?;
    let source = GbifSearchSource::new(&cli.api_url, &cli.species, cli.limit);

    let summary = run_extraction(&source, &catalog, &cli.output)
        .with_context(|| format!("Extraction for species '{}' failed", cli.species))?;

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
