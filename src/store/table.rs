//! Typed access to one collection of a record store.

use std::sync::Arc;

use serde_json::Value;

use crate::config::StorageSettings;
use crate::error::StoreResult;

use super::{Record, RecordStore, RowLayout};

/// A collection of a [`RecordStore`] together with its layout.
///
/// All engine reads and writes go through a `Table`, so every row written
/// has passed the collection's layout and every row read has been mapped by
/// its entity's [`Record`] implementation.
#[derive(Clone)]
pub struct Table {
    store: Arc<dyn RecordStore>,
    layout: RowLayout,
}

impl Table {
    /// Binds `collection` of `store` using the configured layout.
    pub fn new(store: Arc<dyn RecordStore>, collection: &str, storage: &StorageSettings) -> Self {
        Self {
            store,
            layout: RowLayout::for_collection(collection, storage),
        }
    }

    /// Returns the collection name.
    pub fn name(&self) -> &str {
        self.layout.collection()
    }

    /// Appends a record and returns its row index.
    pub fn append<R: Record>(&self, record: &R) -> StoreResult<usize> {
        let row = self.layout.shape(record.to_row())?;
        self.store.append(self.name(), row)
    }

    /// Returns every record with its row index, in insertion order.
    pub fn scan<R: Record>(&self) -> StoreResult<Vec<(usize, R)>> {
        self.store
            .scan_all(self.name())?
            .iter()
            .enumerate()
            .map(|(index, row)| R::from_row(self.name(), row).map(|record| (index, record)))
            .collect()
    }

    /// Returns the records whose `field` holds `value`, with their row
    /// indices, in insertion order. Other rows are not mapped.
    pub fn scan_where<R: Record>(&self, field: &str, value: &str) -> StoreResult<Vec<(usize, R)>> {
        self.store
            .scan_all(self.name())?
            .iter()
            .enumerate()
            .filter(|(_, row)| row.get(field).and_then(Value::as_str) == Some(value))
            .map(|(index, row)| R::from_row(self.name(), row).map(|record| (index, record)))
            .collect()
    }

    /// Returns the first record whose `field` holds `value`.
    pub fn find<R: Record>(&self, field: &str, value: &str) -> StoreResult<Option<R>> {
        self.store
            .lookup(self.name(), field, &Value::String(value.to_string()))?
            .map(|row| R::from_row(self.name(), &row))
            .transpose()
    }

    /// Overwrites one field of the row at `row`.
    pub fn update(&self, row: usize, field: &str, value: Value) -> StoreResult<()> {
        self.layout.check_field(field)?;
        self.store.update_cell(self.name(), row, field, value)
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("collection", &self.name())
            .finish()
    }
}
