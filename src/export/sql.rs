//! SQL statement model
//!
//! Statements are rendered with every value embedded as a literal, so the
//! generated script can be replayed without a parameter-binding client.
//! Identifiers are always double-quoted and string literals single-quoted,
//! with embedded quote characters doubled.

use std::fmt;

/// A literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::Text)
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(SqlValue::Null, SqlValue::Integer)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Text(s) => f.write_str(&quote_literal(s)),
        }
    }
}

/// A scalar expression usable in a VALUES list or a WHERE filter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SqlExpr {
    Value(SqlValue),
    /// Surrogate key of a row found by its unique values
    KeyLookup(Box<KeyLookup>),
}

impl SqlExpr {
    pub fn null() -> Self {
        SqlExpr::Value(SqlValue::Null)
    }

    pub fn text(value: impl Into<String>) -> Self {
        SqlExpr::Value(SqlValue::Text(value.into()))
    }

    pub fn integer(value: i64) -> Self {
        SqlExpr::Value(SqlValue::Integer(value))
    }
}

impl From<SqlValue> for SqlExpr {
    fn from(value: SqlValue) -> Self {
        SqlExpr::Value(value)
    }
}

impl From<KeyLookup> for SqlExpr {
    fn from(lookup: KeyLookup) -> Self {
        SqlExpr::KeyLookup(Box::new(lookup))
    }
}

impl fmt::Display for SqlExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlExpr::Value(value) => fmt::Display::fmt(value, f),
            SqlExpr::KeyLookup(lookup) => fmt::Display::fmt(lookup, f),
        }
    }
}

/// Correlated subquery resolving a surrogate key at execution time:
/// `(SELECT "id" FROM "make" WHERE "name" = 'Audi')`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyLookup {
    pub table: String,
    pub key_column: String,
    pub filters: Vec<(String, SqlExpr)>,
}

impl KeyLookup {
    pub fn new(table: impl Into<String>, key_column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            key_column: key_column.into(),
            filters: Vec::new(),
        }
    }

    /// Add an equality filter
    pub fn filter(mut self, column: impl Into<String>, value: impl Into<SqlExpr>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }
}

impl fmt::Display for KeyLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(SELECT {} FROM {}",
            quote_identifier(&self.key_column),
            quote_identifier(&self.table)
        )?;
        for (i, (column, value)) in self.filters.iter().enumerate() {
            let keyword = if i == 0 { "WHERE" } else { "AND" };
            match value {
                SqlExpr::Value(SqlValue::Null) => {
                    write!(f, " {} {} IS NULL", keyword, quote_identifier(column))?
                }
                value => write!(f, " {} {} = {}", keyword, quote_identifier(column), value)?,
            }
        }
        f.write_str(")")
    }
}

/// `INSERT ... ON CONFLICT (...) DO NOTHING`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InsertStatement {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<SqlExpr>,
    /// Conflict target; empty means a plain insert
    pub conflict_columns: Vec<String>,
}

impl InsertStatement {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
            conflict_columns: Vec::new(),
        }
    }

    /// Append a column and its value
    pub fn value(mut self, column: impl Into<String>, value: impl Into<SqlExpr>) -> Self {
        self.columns.push(column.into());
        self.values.push(value.into());
        self
    }

    /// Make the insert a no-op when a row with the same values in `columns` exists
    pub fn on_conflict_do_nothing<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflict_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// True when re-running the insert cannot duplicate a row
    pub fn is_idempotent(&self) -> bool {
        !self.conflict_columns.is_empty()
    }

    /// Value bound to `column`, if the statement sets it
    pub fn value_of(&self, column: &str) -> Option<&SqlExpr> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "INSERT INTO {} ({}) VALUES (",
            quote_identifier(&self.table),
            join_identifiers(&self.columns)
        )?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str(")")?;
        if self.is_idempotent() {
            write!(
                f,
                " ON CONFLICT ({}) DO NOTHING",
                join_identifiers(&self.conflict_columns)
            )?;
        }
        Ok(())
    }
}

/// Double-quote an identifier, doubling embedded quotes
///
/// ```
/// use listing_normalizer::export::sql::quote_identifier;
///
/// assert_eq!(quote_identifier("car"), "\"car\"");
/// assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Single-quote a string literal, doubling embedded quotes
///
/// ```
/// use listing_normalizer::export::sql::quote_literal;
///
/// assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn join_identifiers(names: &[String]) -> String {
    names
        .iter()
        .map(|n| quote_identifier(n))
        .collect::<Vec<_>>()
        .join(",")
}
