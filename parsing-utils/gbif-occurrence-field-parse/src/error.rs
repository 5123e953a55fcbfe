use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions of an extraction run. Per-field resolution misses are not errors
/// and never show up here.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read JSON file '{path}'. Error: {reason}")]
    FileSource { path: PathBuf, reason: String },
    #[error("Failed to fetch data from GBIF API. Status code: {0}")]
    HttpStatus(u16),
    #[error("Failed to fetch data from GBIF API. Error: {0}")]
    HttpTransport(String),
    #[error("Failed to parse GBIF API response. Error: {0}")]
    MalformedResponse(String),
    #[error("No parameters found!")]
    NoParameters,
    #[error("invalid field catalog: {0}")]
    Catalog(String),
    #[error("Failed to create directory structure for '{path}'")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write output file '{path}'")]
    Output {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ExtractError {
    /// True for failures that happen while acquiring records, before any processing.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            ExtractError::FileSource { .. }
                | ExtractError::HttpStatus(_)
                | ExtractError::HttpTransport(_)
                | ExtractError::MalformedResponse(_)
        )
    }
}
