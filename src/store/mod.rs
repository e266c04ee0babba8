//! Record store boundary.
//!
//! The engines persist everything through the [`RecordStore`] trait: a set
//! of named collections of rows that support append, full scan, point update
//! by row index, and key lookup. [`Record`] maps each entity to and from a
//! row explicitly, and [`Table`] binds a collection name and its configured
//! layout to a store.

mod fields;
mod layout;
mod memory;
mod records;
mod table;

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::StoreResult;

pub use fields::RowReader;
pub(crate) use fields::decimal_value;
pub use layout::{RowLayout, check_layouts};
pub use memory::InMemoryStore;
pub use records::Record;
pub(crate) use records::{BALANCE_AFTER, BALANCE_BEFORE, EMPLOYEE_ID};
pub use table::Table;

/// A stored row: field name to value.
pub type Row = BTreeMap<String, Value>;

/// A durable collection of rows keyed by collection name.
///
/// Row indices are positions in insertion order and never change.
pub trait RecordStore: Send + Sync {
    /// Appends a row and returns its index.
    fn append(&self, collection: &str, row: Row) -> StoreResult<usize>;

    /// Returns every row of the collection in insertion order.
    fn scan_all(&self, collection: &str) -> StoreResult<Vec<Row>>;

    /// Overwrites one field of the row at `row`.
    fn update_cell(&self, collection: &str, row: usize, field: &str, value: Value)
    -> StoreResult<()>;

    /// Returns the first row whose `key_field` equals `key_value`.
    fn lookup(&self, collection: &str, key_field: &str, key_value: &Value) -> StoreResult<Option<Row>> {
        Ok(self
            .scan_all(collection)?
            .into_iter()
            .find(|row| row.get(key_field) == Some(key_value)))
    }
}
