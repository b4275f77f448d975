//! Validate command tests

use listing_normalizer::cli::commands::validate::{MappingSummary, handle_validate, run_validate};
use listing_normalizer::cli::error::CliError;
use std::fs;
use tempfile::TempDir;

const MAPPING: &str = r#"
sources:
  - {name: bilbasen, db: bilbasen.db}
normalize:
  - {table: make, value_column: name, unique: [name], from: "attr:Make", car_fk: make_id}
  - table: model
    value_column: name
    unique: [make_id, name]
    from: "attr:Model"
    car_fk: model_id
    depends_on: {car_fk: make_id}
car:
  table: car
  natural_key: [source, source_listing_id]
  columns:
    - {column: source, from: source_name, type: text}
    - {column: source_listing_id, from: "sqlite:id", type: integer}
"#;

#[test]
fn test_cli_validate_summary() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mapping.yaml");
    fs::write(&path, MAPPING).unwrap();

    assert_eq!(
        run_validate(&path).unwrap(),
        MappingSummary {
            sources: 1,
            lookups: 2,
            dependent_lookups: 1,
            columns: 2,
            features: false,
        }
    );
    assert!(handle_validate(&path).is_ok());
}

#[test]
fn test_cli_validate_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = run_validate(&dir.path().join("mapping.json"));
    assert!(matches!(result, Err(CliError::FileNotFound(_))));
}

#[test]
fn test_cli_validate_invalid_mapping() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mapping.yaml");
    fs::write(&path, MAPPING.replace("{car_fk: make_id}", "{car_fk: brand_id}")).unwrap();

    let err = run_validate(&path).unwrap_err();
    assert!(err.to_string().contains("undefined lookup 'brand_id'"));
}
