//! Extracts a fixed set of named fields from GBIF occurrence records and writes them
//! as flat `#paramName,paramValue` files.

pub mod catalog;
pub mod error;
pub mod extract;
pub mod output;
pub mod source;

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use time::macros::format_description;

pub use catalog::{FieldCatalog, FieldDescriptor, OCCURRENCE_FILE_CATALOG, OCCURRENCE_SEARCH_CATALOG};
pub use error::ExtractError;
pub use extract::{normalize, process, resolve, ExtractedPair};
pub use output::write_pairs;
pub use source::{FileSource, GbifSearchSource, RecordSource};

#[derive(Debug, Default)]
pub struct RunSummary {
    pub records: usize,
    pub pairs: usize,
    pub field_counts: HashMap<String, usize>,
}

impl RunSummary {
    fn from_pairs(records: usize, pairs: &[ExtractedPair]) -> Self {
        let mut field_counts = HashMap::new();
        for pair in pairs {
            *field_counts.entry(pair.name.clone()).or_insert(0) += 1;
        }
        Self {
            records,
            pairs: pairs.len(),
            field_counts,
        }
    }
}

/// Loads records from `source`, extracts `catalog` fields and writes them to `output`.
///
/// Nothing is written unless at least one field resolved.
pub fn run_extraction<P: AsRef<Path>>(
    source: &dyn RecordSource,
    catalog: &FieldCatalog,
    output: P,
) -> Result<RunSummary, ExtractError> {
    info!("Loading records from {}", source.describe());
    let records = source.load_records()?;

    info!("Extracting {} fields from {} records", catalog.len(), records.len());
    let pairs = process(&records, catalog)?;

    write_pairs(&pairs, output)?;
    Ok(RunSummary::from_pairs(records.len(), &pairs))
}

pub fn setup_logging(log_level_str: &str) -> Result<()> {
    let log_level = match log_level_str.to_uppercase().as_str() {
        "DEBUG" => LevelFilter::Debug,
        "INFO" => LevelFilter::Info,
        "WARN" | "WARNING" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        other => {
            eprintln!("Invalid log level '{}', defaulting to INFO.", other);
            LevelFilter::Info
        }
    };

    SimpleLogger::new()
        .with_level(log_level)
        .with_timestamp_format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .init()?;

    Ok(())
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = elapsed.subsec_millis();

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}.{:03}s", seconds, millis)
    }
}

pub fn log_summary(summary: &RunSummary, output: &Path, elapsed: Duration) {
    info!("-------------------- SUMMARY --------------------");
    info!("Total execution time: {}", format_elapsed(elapsed));
    info!("Records processed: {}", summary.records);
    info!("Parameters written: {}", summary.pairs);

    info!("Field breakdown:");
    let mut sorted_fields: Vec<_> = summary.field_counts.iter().collect();
    sorted_fields.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (field, count) in sorted_fields {
        info!("  - {}: {} records", field, count);
    }

    info!("Output written to: {}", output.display());
}
