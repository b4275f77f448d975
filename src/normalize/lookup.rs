//! Lookup (dimension) materialization
//!
//! For every lookup, in declaration order, the record's value is resolved,
//! an idempotent insert of the lookup row is emitted and a key subquery is
//! built for the entity row to reference. A dependent lookup stores a
//! reference to its parent row and its key subquery is scoped by the parent's
//! key subquery, so equal child values under different parents stay distinct.

use crate::export::sql::{InsertStatement, KeyLookup, SqlExpr};
use crate::models::{LookupDescriptor, Mapping, RawRecord};
use tracing::warn;

use super::cast::as_text;
use super::resolve::resolve;

/// Parent of a dependent lookup, resolved to a position in declaration order
#[derive(Debug, Clone)]
struct ParentRef {
    index: usize,
    column: String,
}

/// Lookup rows and key subqueries produced for one record
#[derive(Debug, Clone, Default)]
pub struct ResolvedLookups {
    /// Inserts into lookup tables, in declaration order
    pub statements: Vec<InsertStatement>,
    /// Entity foreign key column and its key subquery (`None` when the lookup was skipped)
    pub foreign_keys: Vec<(String, Option<KeyLookup>)>,
}

impl ResolvedLookups {
    /// Key subquery for the lookup whose entity foreign key column is `car_fk`
    pub fn foreign_key(&self, car_fk: &str) -> Option<&KeyLookup> {
        self.foreign_keys
            .iter()
            .find(|(column, _)| column == car_fk)
            .and_then(|(_, key)| key.as_ref())
    }
}

/// Materializes lookup rows for records of a validated mapping
#[derive(Debug, Clone)]
pub struct LookupMaterializer<'a> {
    lookups: &'a [LookupDescriptor],
    parents: Vec<Option<ParentRef>>,
}

impl<'a> LookupMaterializer<'a> {
    /// Prepare the materializer.
    ///
    /// The mapping must already be validated: every parent exists and is
    /// declared before its children.
    pub fn new(mapping: &'a Mapping) -> Self {
        let parents = mapping
            .normalize
            .iter()
            .map(|lookup| {
                let dep = lookup.depends_on.as_ref()?;
                let index = mapping.lookup_index(&dep.car_fk)?;
                let column = dep
                    .column
                    .clone()
                    .unwrap_or_else(|| mapping.normalize[index].car_fk.clone());
                Some(ParentRef { index, column })
            })
            .collect();

        Self {
            lookups: &mapping.normalize,
            parents,
        }
    }

    /// Resolve every lookup for one record
    pub fn materialize(&self, source_name: &str, record: &RawRecord) -> ResolvedLookups {
        let mut statements = Vec::new();
        let mut keys: Vec<Option<KeyLookup>> = Vec::with_capacity(self.lookups.len());

        for (lookup, parent) in self.lookups.iter().zip(&self.parents) {
            let value = as_text(&resolve(record, source_name, &lookup.from));

            let key = match (value, parent) {
                (None, _) => None,
                (Some(value), None) => {
                    statements.push(
                        InsertStatement::new(&lookup.table)
                            .value(&lookup.value_column, SqlExpr::text(&value))
                            .on_conflict_do_nothing(&lookup.unique),
                    );
                    Some(
                        KeyLookup::new(&lookup.table, &lookup.primary_key)
                            .filter(&lookup.value_column, SqlExpr::text(value)),
                    )
                }
                (Some(value), Some(parent)) => match keys
                    .get(parent.index)
                    .and_then(Option::as_ref)
                {
                    Some(parent_key) => {
                        statements.push(
                            InsertStatement::new(&lookup.table)
                                .value(&parent.column, parent_key.clone())
                                .value(&lookup.value_column, SqlExpr::text(&value))
                                .on_conflict_do_nothing(&lookup.unique),
                        );
                        Some(
                            KeyLookup::new(&lookup.table, &lookup.primary_key)
                                .filter(&lookup.value_column, SqlExpr::text(value))
                                .filter(&parent.column, parent_key.clone()),
                        )
                    }
                    None => {
                        warn!(
                            "Listing {} ({}): skipping lookup '{}' = '{}', parent '{}' has no value",
                            record.id,
                            source_name,
                            lookup.car_fk,
                            value,
                            self.lookups[parent.index].car_fk
                        );
                        None
                    }
                },
            };
            keys.push(key);
        }

        ResolvedLookups {
            statements,
            foreign_keys: self
                .lookups
                .iter()
                .map(|l| l.car_fk.clone())
                .zip(keys)
                .collect(),
        }
    }
}
