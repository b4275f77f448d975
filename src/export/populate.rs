//! Populate script export from files on disk

use super::{ExportError, ExportResult, PopulateScript};
use crate::models::Mapping;
use crate::normalize::Normalizer;
use crate::store::StoreProvider;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Exports a populate script for a mapping, a schema preamble and the raw
/// stores the mapping declares.
#[derive(Debug, Clone)]
pub struct PopulateExporter {
    mapping: Mapping,
    preamble: String,
    base_dir: PathBuf,
}

impl PopulateExporter {
    /// Create an exporter from an already validated mapping.
    ///
    /// Relative source database paths resolve against `base_dir`.
    pub fn new(
        mapping: Mapping,
        preamble: impl Into<String>,
        base_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            mapping,
            preamble: preamble.into(),
            base_dir: base_dir.into(),
        }
    }

    /// Load the mapping and schema files.
    ///
    /// Both files must exist. The mapping is validated and its directory
    /// becomes the base for relative source database paths.
    pub fn from_paths(mapping_path: &Path, schema_path: &Path) -> ExportResult<Self> {
        for (kind, path) in [("mapping", mapping_path), ("schema", schema_path)] {
            if !path.exists() {
                return Err(ExportError::MissingArtifact {
                    kind,
                    path: path.to_path_buf(),
                });
            }
        }

        let mapping = Mapping::load(mapping_path)?;
        let preamble = fs::read_to_string(schema_path).map_err(|e| ExportError::Io {
            path: schema_path.to_path_buf(),
            message: e.to_string(),
        })?;
        let base_dir = mapping_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        info!(
            "Loaded mapping {} ({} source(s), {} lookup(s))",
            mapping_path.display(),
            mapping.sources.len(),
            mapping.normalize.len()
        );
        Ok(Self::new(mapping, preamble, base_dir))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Export using the given raw store provider
    pub fn export_with<P>(&self, provider: &P) -> ExportResult<PopulateScript>
    where
        P: StoreProvider + ?Sized,
    {
        Normalizer::new(&self.mapping)?.run(provider, &self.preamble)
    }

    /// Export reading every source from its SQLite database
    #[cfg(feature = "sqlite")]
    pub fn export(&self) -> ExportResult<PopulateScript> {
        self.export_with(&crate::store::SqliteStoreProvider::new(&self.base_dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRow;
    use crate::store::MemoryStoreProvider;
    use tempfile::TempDir;

    const MAPPING: &str = r#"
sources:
  - name: demo
    db: raw/demo.db
car:
  table: car
  natural_key: [source, source_listing_id]
  columns:
    - {column: source, from: source_name, type: text}
    - {column: source_listing_id, from: "sqlite:id", type: integer}
    - {column: title, from: "sqlite:name", type: text}
"#;

    fn write_inputs(dir: &TempDir) -> (PathBuf, PathBuf) {
        let mapping = dir.path().join("mapping.yaml");
        let schema = dir.path().join("schema.sql");
        fs::write(&mapping, MAPPING).unwrap();
        fs::write(&schema, "BEGIN;\nCREATE TABLE car (id SERIAL PRIMARY KEY);\n").unwrap();
        (mapping, schema)
    }

    #[test]
    fn reports_missing_schema() {
        let dir = TempDir::new().unwrap();
        let (mapping, _) = write_inputs(&dir);
        let missing = dir.path().join("nope.sql");

        let err = PopulateExporter::from_paths(&mapping, &missing).unwrap_err();
        assert!(matches!(err, ExportError::MissingArtifact { kind: "schema", .. }));
        assert!(err.to_string().contains("nope.sql"));
    }

    #[test]
    fn reports_missing_mapping_first() {
        let dir = TempDir::new().unwrap();
        let err = PopulateExporter::from_paths(
            &dir.path().join("mapping.json"),
            &dir.path().join("schema.sql"),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::MissingArtifact { kind: "mapping", .. }));
    }

    #[test]
    fn exports_with_memory_provider() {
        let dir = TempDir::new().unwrap();
        let (mapping, schema) = write_inputs(&dir);
        let exporter = PopulateExporter::from_paths(&mapping, &schema).unwrap();
        assert_eq!(exporter.base_dir(), dir.path());

        let provider = MemoryStoreProvider::new().with_source(
            "demo",
            vec![RawRow {
                id: 3,
                name: Some("Kia Ceed".to_string()),
                ..Default::default()
            }],
        );
        let script = exporter.export_with(&provider).unwrap();
        assert_eq!(script.entities_exported, 1);
        assert!(script.render().starts_with("BEGIN;\nCREATE TABLE car"));
        assert!(script.render().contains("VALUES ('demo',3,'Kia Ceed')"));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn missing_source_database_is_fatal() {
        let dir = TempDir::new().unwrap();
        let (mapping, schema) = write_inputs(&dir);
        let err = PopulateExporter::from_paths(&mapping, &schema)
            .unwrap()
            .export()
            .unwrap_err();
        assert!(matches!(err, ExportError::Store(_)));
    }
}
