//! Normalization engine
//!
//! Turns raw listing records into the ordered statement sequence of a
//! populate script: for every source in declaration order and every record in
//! store order, lookup rows first, then the entity row, then feature links.
//!
//! Generation never touches the target database. Surrogate keys are resolved
//! through correlated subqueries when the script runs, which keeps output a
//! pure function of the mapping and the raw records.

pub mod cast;
pub mod entity;
pub mod feature;
pub mod lookup;
pub mod resolve;

pub use entity::{EntityRow, EntityRowBuilder};
pub use feature::FeatureLinkMaterializer;
pub use lookup::{LookupMaterializer, ResolvedLookups};

use crate::export::sql::InsertStatement;
use crate::export::{ExportResult, PopulateScript};
use crate::models::{Mapping, RawRecord};
use crate::store::StoreProvider;
use crate::validation::mapping::MappingValidationError;
use tracing::{debug, info};

/// Drives lookups, entity rows and feature links for a validated mapping
#[derive(Debug, Clone)]
pub struct Normalizer<'a> {
    mapping: &'a Mapping,
    lookups: LookupMaterializer<'a>,
    entity: EntityRowBuilder<'a>,
    features: Option<FeatureLinkMaterializer<'a>>,
}

impl<'a> Normalizer<'a> {
    /// Validate the mapping and prepare the engine.
    ///
    /// An invalid mapping is rejected here, before any statement exists.
    pub fn new(mapping: &'a Mapping) -> Result<Self, MappingValidationError> {
        mapping.validate()?;

        Ok(Self {
            mapping,
            lookups: LookupMaterializer::new(mapping),
            entity: EntityRowBuilder::new(&mapping.car),
            features: mapping.features.as_ref().map(FeatureLinkMaterializer::new),
        })
    }

    /// All statements for one record: lookups, entity row, feature links
    pub fn normalize_record(&self, source_name: &str, record: &RawRecord) -> Vec<InsertStatement> {
        let resolved = self.lookups.materialize(source_name, record);
        let entity = self.entity.build(source_name, record, &resolved);

        let mut statements = resolved.statements;
        statements.push(entity.insert);
        if let Some(features) = &self.features {
            statements.extend(features.materialize(source_name, record, &entity.key));
        }
        statements
    }

    /// Run every source through the engine and assemble the populate script.
    ///
    /// A source whose store cannot be opened or read aborts the run. Problems
    /// inside individual records never do.
    pub fn run<P>(&self, provider: &P, preamble: &str) -> ExportResult<PopulateScript>
    where
        P: StoreProvider + ?Sized,
    {
        let mut script = PopulateScript::new(preamble);

        for source in &self.mapping.sources {
            let store = provider.open(source)?;
            let rows = store.list_records()?;
            let before = script.statements.len();

            for row in rows {
                let record = RawRecord::from_row(row);
                let statements = self.normalize_record(&source.name, &record);
                debug!(
                    "Listing {} ({}): {} statement(s)",
                    record.id,
                    source.name,
                    statements.len()
                );
                script.push_entity(statements);
            }

            info!(
                "Source '{}': {} statement(s) emitted",
                source.name,
                script.statements.len() - before
            );
        }

        info!(
            "Exported {} entities in {} statement(s)",
            script.entities_exported,
            script.statement_count()
        );
        Ok(script)
    }
}
