//! Export command tests

use listing_normalizer::cli::commands::export::{ExportArgs, handle_export, run_export};
use listing_normalizer::cli::error::CliError;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const MAPPING: &str = r#"{
    "sources": [{"name": "demo", "db": "demo.db"}],
    "normalize": [
        {"table": "brand", "value_column": "name", "unique": ["name"],
         "from": "attr:Brand", "car_fk": "brand_id"}
    ],
    "car": {
        "table": "car",
        "natural_key": ["source", "source_listing_id"],
        "columns": [
            {"column": "source", "from": "source_name", "type": "text"},
            {"column": "source_listing_id", "from": "sqlite:id", "type": "integer"},
            {"column": "price", "from": "sqlite:price", "type": "currency_integer"}
        ]
    }
}"#;

fn setup() -> (TempDir, ExportArgs) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("mapping.json"), MAPPING).unwrap();
    fs::write(dir.path().join("schema.sql"), "BEGIN;\n").unwrap();

    let conn = Connection::open(dir.path().join("demo.db")).unwrap();
    conn.execute_batch(
        "CREATE TABLE listings (id INTEGER NOT NULL, name TEXT, price TEXT, attributes_json TEXT);
         INSERT INTO listings VALUES (7, 'Car A', '100.000 kr.', '{\"Brand\": \"Acme\"}');",
    )
    .unwrap();

    let args = ExportArgs {
        mapping: dir.path().join("mapping.json"),
        schema: dir.path().join("schema.sql"),
        output: dir.path().join("out/populate.sql"),
        force: false,
    };
    (dir, args)
}

#[test]
fn test_cli_export_writes_script() {
    let (_dir, args) = setup();

    let summary = run_export(&args).unwrap();
    assert_eq!(summary.entities, 1);
    assert_eq!(summary.statements, 2);
    assert_eq!(summary.digest.len(), 64);

    let written = fs::read_to_string(&args.output).unwrap();
    assert!(written.starts_with("BEGIN;\n\nINSERT INTO \"brand\""));
    assert!(written.contains("'demo',7,100000"));
    assert!(written.ends_with("COMMIT;\n"));
}

#[test]
fn test_cli_export_refuses_overwrite() {
    let (_dir, args) = setup();
    handle_export(&args).unwrap();

    let result = run_export(&args);
    assert!(matches!(result, Err(CliError::OutputExists(_))));
}

#[test]
fn test_cli_export_force_is_deterministic() {
    let (_dir, mut args) = setup();
    let first = run_export(&args).unwrap();

    args.force = true;
    let second = run_export(&args).unwrap();
    assert_eq!(first.digest, second.digest);
}

#[test]
fn test_cli_export_missing_schema() {
    let (dir, mut args) = setup();
    args.schema = dir.path().join("missing.sql");

    let err = run_export(&args).unwrap_err();
    assert!(err.to_string().contains("missing.sql"));
    assert!(!args.output.exists());
}

#[test]
fn test_cli_export_missing_source_writes_nothing() {
    let (dir, args) = setup();
    fs::remove_file(dir.path().join("demo.db")).unwrap();

    assert!(matches!(run_export(&args), Err(CliError::ExportError(_))));
    assert!(!PathBuf::from(&args.output).exists());
}
