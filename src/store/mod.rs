//! Raw listing stores
//!
//! A store is the read-only collaborator holding the listings one source
//! scraped. The engine only needs to list every row, in store order.

use crate::models::{RawRow, Source};
use std::collections::HashMap;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteStore, SqliteStoreProvider};

/// Error type for raw store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store backing a source does not exist
    #[error("Missing source database for '{source_name}': {location}")]
    NotFound {
        source_name: String,
        location: String,
    },

    /// The store exists but could not be opened
    #[error("Failed to open source '{source_name}': {message}")]
    OpenFailed {
        source_name: String,
        message: String,
    },

    /// Listing rows could not be read
    #[error("Failed to read listings from '{source_name}': {message}")]
    ReadFailed {
        source_name: String,
        message: String,
    },
}

/// Result type for raw store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only access to one source's listings
pub trait RawStore {
    /// All listing rows in store order
    fn list_records(&self) -> StoreResult<Vec<RawRow>>;
}

/// Opens the raw store declared for a source
pub trait StoreProvider {
    fn open(&self, source: &Source) -> StoreResult<Box<dyn RawStore + '_>>;
}

/// In-memory store, mainly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: Vec<RawRow>,
}

impl MemoryStore {
    pub fn new(rows: Vec<RawRow>) -> Self {
        Self { rows }
    }
}

impl RawStore for MemoryStore {
    fn list_records(&self) -> StoreResult<Vec<RawRow>> {
        Ok(self.rows.clone())
    }
}

/// In-memory stores keyed by source name
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreProvider {
    stores: HashMap<String, MemoryStore>,
}

impl MemoryStoreProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the rows of a source
    pub fn with_source(mut self, name: impl Into<String>, rows: Vec<RawRow>) -> Self {
        self.stores.insert(name.into(), MemoryStore::new(rows));
        self
    }
}

impl StoreProvider for MemoryStoreProvider {
    fn open(&self, source: &Source) -> StoreResult<Box<dyn RawStore + '_>> {
        match self.stores.get(&source.name) {
            Some(store) => Ok(Box::new(store.clone())),
            None => Err(StoreError::NotFound {
                source_name: source.name.clone(),
                location: source.db.clone(),
            }),
        }
    }
}
