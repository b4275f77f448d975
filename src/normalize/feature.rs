//! Feature link materialization
//!
//! Expands a multi-valued field into rows of a shared feature table and a
//! link table between entity rows and features. Values are deduplicated and
//! sorted so output is identical across runs.

use crate::export::sql::{InsertStatement, KeyLookup, SqlExpr};
use crate::models::{FeatureDescriptor, RawRecord};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

use super::cast::as_text;
use super::resolve::resolve;

/// Emits feature and link rows for one record
#[derive(Debug, Clone, Copy)]
pub struct FeatureLinkMaterializer<'a> {
    features: &'a FeatureDescriptor,
}

impl<'a> FeatureLinkMaterializer<'a> {
    pub fn new(features: &'a FeatureDescriptor) -> Self {
        Self { features }
    }

    /// Distinct, sorted, non-blank feature values of a record.
    ///
    /// A field that is not a list yields no features.
    pub fn feature_values(&self, source_name: &str, record: &RawRecord) -> BTreeSet<String> {
        match resolve(record, source_name, &self.features.from) {
            Value::Array(items) => items.iter().filter_map(as_text).collect(),
            Value::Null => BTreeSet::new(),
            _ => {
                debug!(
                    "Listing {} ({}): '{}' is not a list, no features emitted",
                    record.id, source_name, self.features.from
                );
                BTreeSet::new()
            }
        }
    }

    /// Feature and link inserts, alternating per feature value
    pub fn materialize(
        &self,
        source_name: &str,
        record: &RawRecord,
        entity_key: &KeyLookup,
    ) -> Vec<InsertStatement> {
        let cfg = self.features;
        let mut statements = Vec::new();

        for feature in self.feature_values(source_name, record) {
            statements.push(
                InsertStatement::new(&cfg.feature_table)
                    .value(&cfg.feature_value_column, SqlExpr::text(&feature))
                    .on_conflict_do_nothing(&cfg.feature_unique),
            );

            let feature_key = KeyLookup::new(&cfg.feature_table, &cfg.primary_key)
                .filter(&cfg.feature_value_column, SqlExpr::text(feature));
            statements.push(
                InsertStatement::new(&cfg.link_table)
                    .value(&cfg.link_car_fk, entity_key.clone())
                    .value(&cfg.link_feature_fk, feature_key)
                    .on_conflict_do_nothing([&cfg.link_car_fk, &cfg.link_feature_fk]),
            );
        }

        statements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldSpec;
    use serde_json::json;

    fn descriptor() -> FeatureDescriptor {
        FeatureDescriptor {
            from: FieldSpec::Attribute("Equipment".to_string()),
            feature_table: "feature".to_string(),
            feature_value_column: "name".to_string(),
            feature_unique: vec!["name".to_string()],
            link_table: "car_feature".to_string(),
            link_car_fk: "car_id".to_string(),
            link_feature_fk: "feature_id".to_string(),
            primary_key: "id".to_string(),
        }
    }

    fn car_key() -> KeyLookup {
        KeyLookup::new("car", "id")
            .filter("source", SqlExpr::text("demo"))
            .filter("source_listing_id", SqlExpr::integer(7))
    }

    #[test]
    fn dedups_and_sorts_features() {
        let cfg = descriptor();
        let record = RawRecord::with_attributes(
            7,
            None,
            None,
            json!({"Equipment": ["Cruise Control", "ABS", "ABS", " ", null]}),
        );

        let statements = FeatureLinkMaterializer::new(&cfg).materialize("demo", &record, &car_key());
        let feature_inserts: Vec<_> = statements
            .iter()
            .filter(|s| s.table == "feature")
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            feature_inserts,
            vec![
                r#"INSERT INTO "feature" ("name") VALUES ('ABS') ON CONFLICT ("name") DO NOTHING"#,
                r#"INSERT INTO "feature" ("name") VALUES ('Cruise Control') ON CONFLICT ("name") DO NOTHING"#,
            ]
        );
        assert_eq!(statements.len(), 4);
        assert_eq!(
            statements[1].to_string(),
            r#"INSERT INTO "car_feature" ("car_id","feature_id") VALUES ((SELECT "id" FROM "car" WHERE "source" = 'demo' AND "source_listing_id" = 7),(SELECT "id" FROM "feature" WHERE "name" = 'ABS')) ON CONFLICT ("car_id","feature_id") DO NOTHING"#
        );
    }

    #[test]
    fn non_list_field_yields_no_features() {
        let cfg = descriptor();
        let materializer = FeatureLinkMaterializer::new(&cfg);
        for attributes in [json!({"Equipment": "ABS"}), json!({}), json!({"Equipment": {"a": 1}})] {
            let record = RawRecord::with_attributes(1, None, None, attributes);
            assert!(materializer.materialize("demo", &record, &car_key()).is_empty());
        }
    }

    #[test]
    fn non_string_items_are_stringified() {
        let cfg = descriptor();
        let record = RawRecord::with_attributes(1, None, None, json!({"Equipment": [4, "4", true]}));
        let values = FeatureLinkMaterializer::new(&cfg).feature_values("demo", &record);
        assert_eq!(values.into_iter().collect::<Vec<_>>(), vec!["4", "true"]);
    }
}
