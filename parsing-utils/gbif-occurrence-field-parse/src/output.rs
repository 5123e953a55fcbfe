use std::fs;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::info;

use crate::error::ExtractError;
use crate::extract::ExtractedPair;

pub const HEADER: [&str; 2] = ["#paramName", "paramValue"];

/// Writes the header and one `name,value` line per pair, creating parent directories.
///
/// Values are written verbatim; any quoting was already applied during normalization.
pub fn write_pairs<P: AsRef<Path>>(pairs: &[ExtractedPair], path: P) -> Result<(), ExtractError> {
    let file_path = path.as_ref();

    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ExtractError::OutputDirectory {
            path: file_path.to_path_buf(),
            source,
        })?;
    }

    let output_error = |source| ExtractError::Output {
        path: file_path.to_path_buf(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_path(file_path)
        .map_err(output_error)?;

    writer.write_record(HEADER).map_err(output_error)?;
    for pair in pairs {
        writer
            .write_record([pair.name.as_str(), pair.value.as_str()])
            .map_err(output_error)?;
    }
    writer.flush().map_err(|e| output_error(e.into()))?;

    info!("Wrote {} parameters to: {}", pairs.len(), file_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn pair(name: &str, value: &str) -> ExtractedPair {
        ExtractedPair {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn writes_header_and_lines_verbatim() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("params.csv");
        let pairs = vec![
            pair("GBIF_ID", "123"),
            pair("COUNTRY_CODE", "\"U,S\""),
            pair("RECORDED_BY", "\"O'Neil \"Jr\"\""),
            pair("HABITAT", ""),
        ];

        write_pairs(&pairs, &out).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert_eq!(
            written,
            "#paramName,paramValue\nGBIF_ID,123\nCOUNTRY_CODE,\"U,S\"\nRECORDED_BY,\"O'Neil \"Jr\"\"\nHABITAT,\n"
        );
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("a").join("b").join("params.csv");

        write_pairs(&[pair("GENUS", "Puma")], &out).unwrap();
        // second run over an existing directory replaces the file
        write_pairs(&[pair("GENUS", "Lynx")], &out).unwrap();

        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "#paramName,paramValue\nGENUS,Lynx\n"
        );
    }

    #[test]
    fn directory_in_the_way_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_pairs(&[pair("GENUS", "Puma")], blocker.join("params.csv")).unwrap_err();
        assert!(matches!(err, ExtractError::OutputDirectory { .. }));
    }
}
