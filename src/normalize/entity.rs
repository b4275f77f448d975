//! Entity row assembly

use crate::export::sql::{InsertStatement, KeyLookup, SqlExpr};
use crate::models::{EntityDescriptor, RawRecord};

use super::cast::cast;
use super::lookup::ResolvedLookups;
use super::resolve::resolve;

/// The entity insert for one record plus the subquery that finds its row again
#[derive(Debug, Clone)]
pub struct EntityRow {
    pub insert: InsertStatement,
    /// Surrogate key of the row, looked up by natural key
    pub key: KeyLookup,
}

/// Builds one entity row per record
#[derive(Debug, Clone, Copy)]
pub struct EntityRowBuilder<'a> {
    entity: &'a EntityDescriptor,
}

impl<'a> EntityRowBuilder<'a> {
    pub fn new(entity: &'a EntityDescriptor) -> Self {
        Self { entity }
    }

    /// Assemble the entity row.
    ///
    /// Lookup foreign keys come first (declaration order, NULL for skipped
    /// lookups), followed by the declared columns cast to their types.
    pub fn build(
        &self,
        source_name: &str,
        record: &RawRecord,
        lookups: &ResolvedLookups,
    ) -> EntityRow {
        let mut insert = InsertStatement::new(&self.entity.table);

        for (column, key) in &lookups.foreign_keys {
            let value = key.clone().map_or_else(SqlExpr::null, SqlExpr::from);
            insert = insert.value(column, value);
        }

        for column in &self.entity.columns {
            let raw = resolve(record, source_name, &column.from);
            insert = insert.value(&column.column, cast(&raw, column.value_type));
        }

        let key = self
            .entity
            .natural_key
            .iter()
            .fold(
                KeyLookup::new(&self.entity.table, &self.entity.primary_key),
                |key, column| {
                    let value = insert.value_of(column).cloned().unwrap_or_else(SqlExpr::null);
                    key.filter(column, value)
                },
            );

        EntityRow {
            insert: insert.on_conflict_do_nothing(&self.entity.natural_key),
            key,
        }
    }
}
