//! SQLite raw stores
//!
//! Each scraper writes its listings into a SQLite file with a
//! `listings(id, name, price, attributes_json)` table. Files are opened
//! read-only.

use rusqlite::types::Value as ColumnValue;
use rusqlite::{Connection, OpenFlags, Row};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{RawStore, StoreError, StoreProvider, StoreResult};
use crate::export::sql::quote_identifier;
use crate::models::{RawRow, Source};

/// Listings of one SQLite file
pub struct SqliteStore {
    source_name: String,
    table: String,
    connection: Connection,
}

impl SqliteStore {
    /// Open a store read-only
    pub fn open(source_name: &str, path: &Path, table: &str) -> StoreResult<Self> {
        if !path.exists() {
            return Err(StoreError::NotFound {
                source_name: source_name.to_string(),
                location: path.display().to_string(),
            });
        }

        let connection = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::OpenFailed {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self::from_connection(source_name, connection, table))
    }

    /// Wrap an existing connection
    pub fn from_connection(source_name: &str, connection: Connection, table: &str) -> Self {
        Self {
            source_name: source_name.to_string(),
            table: table.to_string(),
            connection,
        }
    }

    fn read_failed(&self, e: rusqlite::Error) -> StoreError {
        StoreError::ReadFailed {
            source_name: self.source_name.clone(),
            message: e.to_string(),
        }
    }
}

fn row_to_raw(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        name: text_column(row, 1)?,
        price_text: text_column(row, 2)?,
        attributes_json: text_column(row, 3)?,
    })
}

/// Read a column of any storage class as text
fn text_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<String>> {
    let text = match row.get::<_, ColumnValue>(index)? {
        ColumnValue::Null => None,
        ColumnValue::Integer(value) => Some(value.to_string()),
        ColumnValue::Real(value) => Some(value.to_string()),
        ColumnValue::Text(value) => Some(value),
        ColumnValue::Blob(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
    };
    Ok(text)
}

impl RawStore for SqliteStore {
    fn list_records(&self) -> StoreResult<Vec<RawRow>> {
        let sql = format!(
            "SELECT id, name, price, attributes_json FROM {}",
            quote_identifier(&self.table)
        );
        let mut stmt = self
            .connection
            .prepare(&sql)
            .map_err(|e| self.read_failed(e))?;
        let rows = stmt
            .query_map([], row_to_raw)
            .map_err(|e| self.read_failed(e))?;

        let mut records = Vec::new();
        for (position, row) in rows.enumerate() {
            match row {
                Ok(raw) => records.push(raw),
                Err(e) => warn!(
                    "Source '{}': skipping unreadable listing row #{}: {}",
                    self.source_name, position, e
                ),
            }
        }

        info!(
            "Read {} listings from source '{}'",
            records.len(),
            self.source_name
        );
        Ok(records)
    }
}

/// Opens SQLite stores, resolving relative `db` paths against a base directory
#[derive(Debug, Clone)]
pub struct SqliteStoreProvider {
    base_dir: PathBuf,
}

impl SqliteStoreProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Path of a source's database file
    pub fn db_path(&self, source: &Source) -> PathBuf {
        let db = Path::new(&source.db);
        if db.is_absolute() {
            db.to_path_buf()
        } else {
            self.base_dir.join(db)
        }
    }
}

impl StoreProvider for SqliteStoreProvider {
    fn open(&self, source: &Source) -> StoreResult<Box<dyn RawStore + '_>> {
        let store = SqliteStore::open(&source.name, &self.db_path(source), &source.table)?;
        Ok(Box::new(store))
    }
}
