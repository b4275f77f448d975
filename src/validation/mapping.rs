//! Mapping validation
//!
//! Checks a parsed mapping for everything the generator relies on: unique
//! source and lookup names, well-formed identifiers, uniqueness constraints
//! that make the foreign key subqueries unambiguous, a lookup dependency graph
//! that can be resolved in a single forward pass, and an entity natural key
//! that is unique across sources.
//!
//! All problems are collected and reported together.

use crate::models::{FieldSpec, Mapping};
use petgraph::algo::toposort;
use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};
use std::collections::{HashMap, HashSet};

use super::input::{validate_identifier, validate_source_name};

/// A single problem found in a mapping
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingIssue {
    #[error("mapping declares no sources")]
    NoSources,

    #[error("source #{index}: {reason}")]
    InvalidSource { index: usize, reason: String },

    #[error("duplicate source name '{0}'")]
    DuplicateSource(String),

    #[error("duplicate lookup '{0}'")]
    DuplicateLookup(String),

    #[error("lookup '{car_fk}': {reason}")]
    InvalidLookup { car_fk: String, reason: String },

    #[error("lookup '{child}' depends on undefined lookup '{parent}'")]
    UndefinedDependency { child: String, parent: String },

    #[error("lookup '{child}' is declared before the lookup it depends on ('{parent}')")]
    DependencyOrder { child: String, parent: String },

    #[error("lookup dependency cycle involving '{0}'")]
    DependencyCycle(String),

    #[error("entity '{table}': {reason}")]
    InvalidEntity { table: String, reason: String },

    #[error("features: {0}")]
    InvalidFeatures(String),
}

/// Error returned when a mapping fails validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render_issues(.issues))]
pub struct MappingValidationError {
    pub issues: Vec<MappingIssue>,
}

fn render_issues(issues: &[MappingIssue]) -> String {
    let mut out = format!("Invalid mapping ({} problem(s))", issues.len());
    for issue in issues {
        out.push_str(&format!("\n  - {}", issue));
    }
    out
}

/// Mapping validator
#[derive(Default)]
pub struct MappingValidator;

impl MappingValidator {
    /// Create a new mapping validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a complete mapping
    ///
    /// # Example
    ///
    /// ```rust
    /// use listing_normalizer::models::Mapping;
    /// use listing_normalizer::validation::mapping::MappingValidator;
    ///
    /// let mapping = Mapping::from_json(r#"{
    ///     "sources": [{"name": "demo", "db": "demo.db"}],
    ///     "car": {
    ///         "table": "car",
    ///         "natural_key": ["source", "source_listing_id"],
    ///         "columns": [
    ///             {"column": "source", "from": "source_name", "type": "text"},
    ///             {"column": "source_listing_id", "from": "sqlite:id", "type": "integer"}
    ///         ]
    ///     }
    /// }"#).unwrap();
    ///
    /// assert!(MappingValidator::new().validate(&mapping).is_ok());
    /// ```
    pub fn validate(&self, mapping: &Mapping) -> Result<(), MappingValidationError> {
        let mut issues = Vec::new();

        self.check_sources(mapping, &mut issues);
        self.check_lookups(mapping, &mut issues);
        issues.extend(self.check_dependencies(mapping));
        self.check_entity(mapping, &mut issues);
        self.check_features(mapping, &mut issues);

        if issues.is_empty() {
            Ok(())
        } else {
            Err(MappingValidationError { issues })
        }
    }

    fn check_sources(&self, mapping: &Mapping, issues: &mut Vec<MappingIssue>) {
        if mapping.sources.is_empty() {
            issues.push(MappingIssue::NoSources);
        }

        let mut seen = HashSet::new();
        for (index, source) in mapping.sources.iter().enumerate() {
            if let Err(e) = validate_source_name(&source.name) {
                issues.push(MappingIssue::InvalidSource {
                    index,
                    reason: e.to_string(),
                });
            }
            if source.db.trim().is_empty() {
                issues.push(MappingIssue::InvalidSource {
                    index,
                    reason: "db cannot be empty".to_string(),
                });
            }
            if let Err(e) = validate_identifier("listing table", &source.table) {
                issues.push(MappingIssue::InvalidSource {
                    index,
                    reason: e.to_string(),
                });
            }
            if !seen.insert(source.name.as_str()) {
                issues.push(MappingIssue::DuplicateSource(source.name.clone()));
            }
        }
    }

    fn check_lookups(&self, mapping: &Mapping, issues: &mut Vec<MappingIssue>) {
        let mut seen = HashSet::new();
        for lookup in &mapping.normalize {
            let mut invalid = |reason: String| {
                issues.push(MappingIssue::InvalidLookup {
                    car_fk: lookup.car_fk.clone(),
                    reason,
                })
            };

            for (field, name) in [
                ("table name", &lookup.table),
                ("value column", &lookup.value_column),
                ("foreign key column", &lookup.car_fk),
                ("primary key column", &lookup.primary_key),
            ] {
                if let Err(e) = validate_identifier(field, name) {
                    invalid(e.to_string());
                }
            }

            if lookup.unique.is_empty() {
                invalid("unique columns cannot be empty".to_string());
            } else if !lookup.unique.contains(&lookup.value_column) {
                invalid(format!(
                    "unique columns must include the value column '{}'",
                    lookup.value_column
                ));
            }

            if let Some(dep) = &lookup.depends_on
                && let Some(parent) = mapping.normalize.iter().find(|l| l.car_fk == dep.car_fk)
            {
                let column = dep.column.as_deref().unwrap_or(&parent.car_fk);
                if let Err(e) = validate_identifier("parent reference column", column) {
                    invalid(e.to_string());
                }
                if column == lookup.value_column {
                    invalid(format!(
                        "parent reference column '{}' collides with the value column",
                        column
                    ));
                }
                if !lookup.unique.iter().any(|c| c == column) {
                    invalid(format!(
                        "unique columns must include the parent reference column '{}'",
                        column
                    ));
                }
                if let Some(table) = &dep.table
                    && table != &parent.table
                {
                    invalid(format!(
                        "depends_on table '{}' does not match lookup '{}' (table '{}')",
                        table, parent.car_fk, parent.table
                    ));
                }
                if let Some(value_column) = &dep.value_column
                    && value_column != &parent.value_column
                {
                    invalid(format!(
                        "depends_on value column '{}' does not match lookup '{}' (value column '{}')",
                        value_column, parent.car_fk, parent.value_column
                    ));
                }
            }

            if !seen.insert(lookup.car_fk.as_str()) {
                issues.push(MappingIssue::DuplicateLookup(lookup.car_fk.clone()));
            }
        }
    }

    /// Check the lookup dependency graph.
    ///
    /// Edges run parent -> child. The graph must be acyclic and declaration
    /// order must already be a topological order, so resolution stays a
    /// single forward pass.
    pub fn check_dependencies(&self, mapping: &Mapping) -> Vec<MappingIssue> {
        let mut issues = Vec::new();
        let mut graph = Graph::<&str, (), Directed>::new();
        let mut node_map: HashMap<&str, NodeIndex> = HashMap::new();
        let mut position: HashMap<&str, usize> = HashMap::new();

        for (index, lookup) in mapping.normalize.iter().enumerate() {
            node_map
                .entry(lookup.car_fk.as_str())
                .or_insert_with(|| graph.add_node(lookup.car_fk.as_str()));
            position.entry(lookup.car_fk.as_str()).or_insert(index);
        }

        for lookup in &mapping.normalize {
            let Some(dep) = &lookup.depends_on else {
                continue;
            };
            let child = lookup.car_fk.as_str();
            match node_map.get(dep.car_fk.as_str()) {
                Some(&parent_node) => {
                    graph.add_edge(parent_node, node_map[child], ());
                }
                None => issues.push(MappingIssue::UndefinedDependency {
                    child: child.to_string(),
                    parent: dep.car_fk.clone(),
                }),
            }
        }

        if let Err(cycle) = toposort(&graph, None) {
            issues.push(MappingIssue::DependencyCycle(
                graph[cycle.node_id()].to_string(),
            ));
            return issues;
        }

        for (index, lookup) in mapping.normalize.iter().enumerate() {
            if let Some(dep) = &lookup.depends_on
                && let Some(&parent_index) = position.get(dep.car_fk.as_str())
                && parent_index >= index
            {
                issues.push(MappingIssue::DependencyOrder {
                    child: lookup.car_fk.clone(),
                    parent: dep.car_fk.clone(),
                });
            }
        }

        issues
    }

    fn check_entity(&self, mapping: &Mapping, issues: &mut Vec<MappingIssue>) {
        let entity = &mapping.car;
        let mut invalid = |reason: String| {
            issues.push(MappingIssue::InvalidEntity {
                table: entity.table.clone(),
                reason,
            })
        };

        for (field, name) in [
            ("table name", &entity.table),
            ("primary key column", &entity.primary_key),
        ] {
            if let Err(e) = validate_identifier(field, name) {
                invalid(e.to_string());
            }
        }

        if entity.columns.is_empty() {
            invalid("columns cannot be empty".to_string());
        }

        let fk_columns: HashSet<&str> = mapping
            .normalize
            .iter()
            .map(|l| l.car_fk.as_str())
            .collect();
        let mut seen = HashSet::new();
        for column in &entity.columns {
            if let Err(e) = validate_identifier("column name", &column.column) {
                invalid(e.to_string());
            }
            if !seen.insert(column.column.as_str()) {
                invalid(format!("duplicate column '{}'", column.column));
            }
            if fk_columns.contains(column.column.as_str()) {
                invalid(format!(
                    "column '{}' collides with a lookup foreign key column",
                    column.column
                ));
            }
        }

        if entity.natural_key.is_empty() {
            invalid("natural key cannot be empty".to_string());
            return;
        }

        let key_columns: Vec<_> = entity
            .natural_key
            .iter()
            .filter_map(|name| {
                let column = entity.column(name);
                if column.is_none() {
                    invalid(format!(
                        "natural key column '{}' is not a declared column",
                        name
                    ));
                }
                column
            })
            .collect();

        if !key_columns
            .iter()
            .any(|c| matches!(c.from, FieldSpec::SourceName))
        {
            invalid("natural key must include a column taken from source_name".to_string());
        }
        if !key_columns.iter().any(|c| c.from.is_raw_id()) {
            invalid("natural key must include a column taken from sqlite:id".to_string());
        }
    }

    fn check_features(&self, mapping: &Mapping, issues: &mut Vec<MappingIssue>) {
        let Some(features) = &mapping.features else {
            return;
        };

        for (field, name) in [
            ("feature table name", &features.feature_table),
            ("feature value column", &features.feature_value_column),
            ("link table name", &features.link_table),
            ("link entity column", &features.link_car_fk),
            ("link feature column", &features.link_feature_fk),
            ("primary key column", &features.primary_key),
        ] {
            if let Err(e) = validate_identifier(field, name) {
                issues.push(MappingIssue::InvalidFeatures(e.to_string()));
            }
        }

        if !features
            .feature_unique
            .contains(&features.feature_value_column)
        {
            issues.push(MappingIssue::InvalidFeatures(format!(
                "unique columns must include the value column '{}'",
                features.feature_value_column
            )));
        }
        if features.link_car_fk == features.link_feature_fk {
            issues.push(MappingIssue::InvalidFeatures(
                "link columns must differ".to_string(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EntityColumn, EntityDescriptor, LookupDependency, LookupDescriptor, Source, ValueType,
    };

    fn lookup(car_fk: &str, table: &str, parent: Option<&str>) -> LookupDescriptor {
        let mut unique = vec!["name".to_string()];
        if let Some(parent) = parent {
            unique.insert(0, parent.to_string());
        }
        LookupDescriptor {
            table: table.to_string(),
            value_column: "name".to_string(),
            unique,
            from: FieldSpec::Attribute(table.to_string()),
            car_fk: car_fk.to_string(),
            depends_on: parent.map(|p| LookupDependency {
                car_fk: p.to_string(),
                column: None,
                table: None,
                value_column: None,
            }),
            primary_key: "id".to_string(),
        }
    }

    fn mapping(normalize: Vec<LookupDescriptor>) -> Mapping {
        Mapping {
            sources: vec![Source {
                name: "demo".to_string(),
                db: "demo.db".to_string(),
                table: "listings".to_string(),
            }],
            normalize,
            car: EntityDescriptor {
                table: "car".to_string(),
                natural_key: vec!["source".to_string(), "source_listing_id".to_string()],
                columns: vec![
                    EntityColumn {
                        column: "source".to_string(),
                        from: FieldSpec::SourceName,
                        value_type: ValueType::Text,
                    },
                    EntityColumn {
                        column: "source_listing_id".to_string(),
                        from: FieldSpec::RawColumn("id".to_string()),
                        value_type: ValueType::Integer,
                    },
                ],
                primary_key: "id".to_string(),
            },
            features: None,
        }
    }

    #[test]
    fn accepts_parent_before_child() {
        let m = mapping(vec![
            lookup("make_id", "make", None),
            lookup("model_id", "model", Some("make_id")),
        ]);
        assert!(MappingValidator::new().validate(&m).is_ok());
    }

    #[test]
    fn rejects_undefined_dependency() {
        let m = mapping(vec![lookup("model_id", "model", Some("make_id"))]);
        let err = MappingValidator::new().validate(&m).unwrap_err();
        assert!(err.issues.contains(&MappingIssue::UndefinedDependency {
            child: "model_id".to_string(),
            parent: "make_id".to_string(),
        }));
    }

    #[test]
    fn rejects_child_declared_before_parent() {
        let m = mapping(vec![
            lookup("model_id", "model", Some("make_id")),
            lookup("make_id", "make", None),
        ]);
        let issues = MappingValidator::new().check_dependencies(&m);
        assert_eq!(
            issues,
            vec![MappingIssue::DependencyOrder {
                child: "model_id".to_string(),
                parent: "make_id".to_string(),
            }]
        );
    }

    #[test]
    fn rejects_cycles() {
        let m = mapping(vec![
            lookup("a_id", "a", Some("b_id")),
            lookup("b_id", "b", Some("a_id")),
        ]);
        let issues = MappingValidator::new().check_dependencies(&m);
        assert!(matches!(issues[0], MappingIssue::DependencyCycle(_)));

        let m = mapping(vec![lookup("a_id", "a", Some("a_id"))]);
        let issues = MappingValidator::new().check_dependencies(&m);
        assert!(matches!(issues[0], MappingIssue::DependencyCycle(_)));
    }

    #[test]
    fn dependent_lookup_unique_must_cover_parent_column() {
        let mut child = lookup("model_id", "model", Some("make_id"));
        child.unique = vec!["name".to_string()];
        let m = mapping(vec![lookup("make_id", "make", None), child]);
        let err = MappingValidator::new().validate(&m).unwrap_err();
        assert!(err.to_string().contains("parent reference column 'make_id'"));
    }

    #[test]
    fn natural_key_must_cover_source_and_id() {
        let mut m = mapping(vec![]);
        m.car.natural_key = vec!["source_listing_id".to_string()];
        let err = MappingValidator::new().validate(&m).unwrap_err();
        assert!(err.to_string().contains("source_name"));

        m.car.natural_key = vec!["source".to_string(), "missing".to_string()];
        let err = MappingValidator::new().validate(&m).unwrap_err();
        assert!(err.to_string().contains("'missing' is not a declared column"));
        assert!(err.to_string().contains("sqlite:id"));
    }

    #[test]
    fn reports_every_problem() {
        let mut m = mapping(vec![lookup("make_id", "make", None)]);
        m.sources.push(m.sources[0].clone());
        m.normalize.push(lookup("make_id", "make", None));
        m.car.columns.push(EntityColumn {
            column: "make_id".to_string(),
            from: FieldSpec::Attribute("Make".to_string()),
            value_type: ValueType::Text,
        });
        let err = MappingValidator::new().validate(&m).unwrap_err();
        assert!(err.issues.contains(&MappingIssue::DuplicateSource("demo".to_string())));
        assert!(err.issues.contains(&MappingIssue::DuplicateLookup("make_id".to_string())));
        assert!(err.to_string().contains("collides with a lookup foreign key"));
        assert!(err.issues.len() >= 3);
    }

    #[test]
    fn error_message_lists_each_issue() {
        let err = MappingValidationError {
            issues: vec![
                MappingIssue::NoSources,
                MappingIssue::DuplicateLookup("make_id".to_string()),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Invalid mapping (2 problem(s))\n  - mapping declares no sources\n  - duplicate lookup 'make_id'"
        );
    }

    #[test]
    fn rejects_empty_sources() {
        let mut m = mapping(vec![]);
        m.sources.clear();
        let err = MappingValidator::new().validate(&m).unwrap_err();
        assert_eq!(err.issues, vec![MappingIssue::NoSources]);
    }
}
