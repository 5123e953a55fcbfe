use std::fs;
use std::process::Command;

use tempfile::tempdir;

const FILE_BIN: &str = env!("CARGO_BIN_EXE_parse-gbif-occurrence-file");
const FETCH_BIN: &str = env!("CARGO_BIN_EXE_fetch-gbif-occurrences");

#[test]
fn file_parser_writes_output_and_exits_zero() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("occurrences.json");
    let output = dir.path().join("out").join("metadata.csv");
    fs::write(&input, r#"{"results": [{"gbifID": 7, "kingdom": "Plantae"}]}"#).unwrap();

    let result = Command::new(FILE_BIN)
        .arg(&input)
        .arg(&output)
        .args(["--log-level", "ERROR"])
        .output()
        .unwrap();

    assert!(result.status.success());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "#paramName,paramValue\nGBIF_ID,7\nKINGDOM,Plantae\n"
    );
}

#[test]
fn file_parser_reports_empty_result() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("occurrences.json");
    let output = dir.path().join("metadata.csv");
    fs::write(&input, r#"{"count": 0}"#).unwrap();

    let result = Command::new(FILE_BIN)
        .arg(&input)
        .arg(&output)
        .args(["--log-level", "ERROR"])
        .output()
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.starts_with("ERROR: "));
    assert!(stdout.contains("No parameters found!"));
    assert!(!output.exists());
}

#[test]
fn file_parser_reports_bad_input() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("metadata.csv");

    let result = Command::new(FILE_BIN)
        .arg(dir.path().join("missing.json"))
        .arg(&output)
        .args(["--log-level", "ERROR"])
        .output()
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("ERROR: "));
    assert!(stdout.contains("Failed to read JSON file"));
    assert!(!output.exists());
}

#[test]
fn file_parser_rejects_invalid_fields() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("occurrences.json");
    fs::write(&input, r#"{"results": [{"gbifID": 7}]}"#).unwrap();

    let result = Command::new(FILE_BIN)
        .arg(&input)
        .arg(dir.path().join("metadata.csv"))
        .args(["--fields", "A=gbifID,A=genus", "--log-level", "ERROR"])
        .output()
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stdout).contains("duplicate output name 'A'"));
}

#[test]
fn version_flag_is_available() {
    for bin in [FILE_BIN, FETCH_BIN] {
        let result = Command::new(bin).arg("--version").output().unwrap();
        assert!(result.status.success());
        assert!(String::from_utf8_lossy(&result.stdout).contains("1.0"));
    }
}

#[test]
fn fetch_requires_species() {
    let dir = tempdir().unwrap();
    let result = Command::new(FETCH_BIN)
        .arg(dir.path().join("params.csv"))
        .output()
        .unwrap();

    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("--species"));
}

#[test]
fn fetch_reports_unreachable_api() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/v1/occurrence/search", listener.local_addr().unwrap());
    drop(listener);
    let dir = tempdir().unwrap();
    let output = dir.path().join("params.csv");

    let result = Command::new(FETCH_BIN)
        .arg(&output)
        .args(["--species", "Puma concolor", "--log-level", "ERROR"])
        .env("GBIF_API_URL", &url)
        .output()
        .unwrap();

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stdout).contains("ERROR: "));
    assert!(!output.exists());
}
