//! In-memory record store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use serde_json::Value;

use crate::error::{StoreError, StoreResult};

use super::{RecordStore, Row};

/// A [`RecordStore`] that keeps every collection in memory.
///
/// Appends and updates can be made to fail on demand, which lets callers
/// exercise the engine's store-failure paths.
///
/// # Example
///
/// ```
/// use payroll_ledger::store::{InMemoryStore, RecordStore, Row};
///
/// let store = InMemoryStore::new();
/// let index = store.append("Loans", Row::new()).unwrap();
/// assert_eq!(index, 0);
/// assert_eq!(store.scan_all("Loans").unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, Vec<Row>>>,
    fail_appends: AtomicBool,
    fail_updates: AtomicBool,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent append fail (or succeed again).
    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent cell update fail (or succeed again).
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    fn collections(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Row>>> {
        self.collections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordStore for InMemoryStore {
    fn append(&self, collection: &str, row: Row) -> StoreResult<usize> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: format!("append to '{}' rejected", collection),
            });
        }
        let mut collections = self.collections();
        let rows = collections.entry(collection.to_string()).or_default();
        rows.push(row);
        Ok(rows.len() - 1)
    }

    fn scan_all(&self, collection: &str) -> StoreResult<Vec<Row>> {
        Ok(self
            .collections()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    fn update_cell(
        &self,
        collection: &str,
        row: usize,
        field: &str,
        value: Value,
    ) -> StoreResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                message: format!("update of '{}' rejected", collection),
            });
        }
        let mut collections = self.collections();
        let target = collections
            .get_mut(collection)
            .and_then(|rows| rows.get_mut(row))
            .ok_or_else(|| StoreError::RowOutOfRange {
                collection: collection.to_string(),
                row,
            })?;
        target.insert(field.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> Row {
        let mut row = Row::new();
        row.insert("id".to_string(), Value::String(id.to_string()));
        row
    }

    #[test]
    fn test_scan_unknown_collection_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.scan_all("Nothing").unwrap().is_empty());
    }

    #[test]
    fn test_append_returns_insertion_index() {
        let store = InMemoryStore::new();
        assert_eq!(store.append("Loans", row("a")).unwrap(), 0);
        assert_eq!(store.append("Loans", row("b")).unwrap(), 1);
        assert_eq!(store.append("Payslips", row("c")).unwrap(), 0);

        let rows = store.scan_all("Loans").unwrap();
        assert_eq!(rows[0]["id"], "a");
        assert_eq!(rows[1]["id"], "b");
    }

    #[test]
    fn test_update_cell_overwrites_value() {
        let store = InMemoryStore::new();
        store.append("Loans", row("a")).unwrap();
        store
            .update_cell("Loans", 0, "balance_after", Value::String("10".to_string()))
            .unwrap();
        assert_eq!(store.scan_all("Loans").unwrap()[0]["balance_after"], "10");
    }

    #[test]
    fn test_update_cell_out_of_range() {
        let store = InMemoryStore::new();
        let result = store.update_cell("Loans", 3, "id", Value::Null);
        assert_eq!(
            result,
            Err(StoreError::RowOutOfRange {
                collection: "Loans".to_string(),
                row: 3,
            })
        );
    }

    #[test]
    fn test_lookup_finds_first_match() {
        let store = InMemoryStore::new();
        store.append("Employees", row("emp_001")).unwrap();
        store.append("Employees", row("emp_002")).unwrap();

        let found = store
            .lookup("Employees", "id", &Value::String("emp_002".to_string()))
            .unwrap();
        assert_eq!(found, Some(row("emp_002")));

        let missing = store
            .lookup("Employees", "id", &Value::String("emp_404".to_string()))
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_failure_injection() {
        let store = InMemoryStore::new();
        store.append("Loans", row("a")).unwrap();

        store.set_fail_appends(true);
        assert!(store.append("Loans", row("b")).is_err());
        store.set_fail_appends(false);

        store.set_fail_updates(true);
        assert!(store.update_cell("Loans", 0, "id", Value::Null).is_err());
        store.set_fail_updates(false);

        assert_eq!(store.scan_all("Loans").unwrap().len(), 1);
    }
}
