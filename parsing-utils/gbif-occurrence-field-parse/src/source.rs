use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use serde_json::Value;
use ureq::Agent;

use crate::error::ExtractError;

pub const DEFAULT_GBIF_API_URL: &str = "https://api.gbif.org/v1/occurrence/search";
pub const DEFAULT_LIMIT: usize = 10;

/// Supplies the record set for one run.
pub trait RecordSource {
    fn load_records(&self) -> Result<Vec<Value>, ExtractError>;

    fn describe(&self) -> String;
}

/// Pulls the `results` array out of a search-shaped document. A missing key is an empty set.
pub fn records_from_document(document: Value) -> Result<Vec<Value>, String> {
    match document {
        Value::Object(mut map) => match map.remove("results") {
            None => Ok(Vec::new()),
            Some(Value::Array(records)) => Ok(records),
            Some(other) => Err(format!("'results' is not an array (found {})", json_type_name(&other))),
        },
        other => Err(format!(
            "expected a JSON object at the top level (found {})",
            json_type_name(&other)
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn apply_limit(mut records: Vec<Value>, limit: usize) -> Vec<Value> {
    if records.len() > limit {
        debug!("Keeping the first {} of {} records", limit, records.len());
        records.truncate(limit);
    }
    records
}

/// Reads an occurrence search document from disk. `.gz` files are decompressed on the fly.
pub struct FileSource {
    path: PathBuf,
    limit: usize,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P, limit: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            limit,
        }
    }

    fn read_document(&self) -> Result<Value, String> {
        let file = File::open(&self.path).map_err(|e| e.to_string())?;
        let is_gzip = self
            .path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

        let reader: Box<dyn Read> = if is_gzip {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };

        serde_json::from_reader(BufReader::new(reader)).map_err(|e| e.to_string())
    }
}

impl RecordSource for FileSource {
    fn load_records(&self) -> Result<Vec<Value>, ExtractError> {
        let to_error = |reason: String| ExtractError::FileSource {
            path: self.path.clone(),
            reason,
        };

        let document = self.read_document().map_err(to_error)?;
        let records = records_from_document(document).map_err(to_error)?;
        info!("Read {} records from {}", records.len(), self.path.display());

        Ok(apply_limit(records, self.limit))
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Queries the GBIF occurrence search endpoint by scientific name.
pub struct GbifSearchSource {
    agent: Agent,
    api_url: String,
    species: String,
    limit: usize,
}

impl GbifSearchSource {
    pub fn new(api_url: impl Into<String>, species: impl Into<String>, limit: usize) -> Self {
        Self {
            agent: Agent::new_with_defaults(),
            api_url: api_url.into(),
            species: species.into(),
            limit,
        }
    }

    /// Replaces the HTTP agent, e.g. to change proxy or TLS settings.
    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agent = agent;
        self
    }

    fn request(&self) -> Result<String, ExtractError> {
        let response = self
            .agent
            .get(&self.api_url)
            .config()
            .http_status_as_error(false)
            .build()
            .query("scientificName", &self.species)
            .query("limit", self.limit.to_string())
            .call()
            .map_err(|err| match err {
                ureq::Error::StatusCode(code) => ExtractError::HttpStatus(code),
                other => ExtractError::HttpTransport(other.to_string()),
            })?;

        let status = response.status();
        if status != 200 {
            return Err(ExtractError::HttpStatus(status.as_u16()));
        }

        response
            .into_body()
            .read_to_string()
            .map_err(|err| ExtractError::HttpTransport(format!("failed reading response body: {err}")))
    }
}

impl RecordSource for GbifSearchSource {
    fn load_records(&self) -> Result<Vec<Value>, ExtractError> {
        info!(
            "Requesting up to {} occurrences of '{}' from {}",
            self.limit, self.species, self.api_url
        );
        if self.limit == 0 {
            warn!("--limit 0 asks the API for no records");
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg} [{elapsed_precise}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Fetching '{}' from GBIF...", self.species));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let body = self.request();
        spinner.finish_and_clear();
        let body = body?;

        let document: Value =
            serde_json::from_str(&body).map_err(|err| ExtractError::MalformedResponse(err.to_string()))?;
        let records = records_from_document(document).map_err(ExtractError::MalformedResponse)?;
        info!("GBIF returned {} records", records.len());

        Ok(records)
    }

    fn describe(&self) -> String {
        format!("GBIF occurrence search for '{}'", self.species)
    }
}
