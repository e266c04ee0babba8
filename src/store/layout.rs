//! Collection layouts and the unmapped-field policy.
//!
//! A layout is the list of headers a collection is configured with. When a
//! record is written, its row is projected onto the layout. A header the
//! record does not produce is resolved by [`UnmappedFieldPolicy`]; a record
//! field with no header always fails the write.

use serde_json::Value;

use crate::config::{CollectionNames, StorageSettings, UnmappedFieldPolicy};
use crate::error::{StoreError, StoreResult};
use crate::models::{Employee, LeaveRecord, LoanTransaction, Payslip};

use super::{Record, Row};

/// The header layout of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowLayout {
    collection: String,
    headers: Option<Vec<String>>,
    policy: UnmappedFieldPolicy,
}

impl RowLayout {
    /// Builds the layout for `collection` from the storage settings.
    pub fn for_collection(collection: &str, storage: &StorageSettings) -> Self {
        Self {
            collection: collection.to_string(),
            headers: storage.layouts.get(collection).cloned(),
            policy: storage.unmapped_fields,
        }
    }

    /// A layout that accepts whatever fields the record produces.
    pub fn open(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            headers: None,
            policy: UnmappedFieldPolicy::Reject,
        }
    }

    /// Returns the collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Projects a record row onto the configured headers.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UnmappedField`] for a header the record does not
    ///   produce, under [`UnmappedFieldPolicy::Reject`]. Under
    ///   [`UnmappedFieldPolicy::Blank`] the header is written as null.
    /// - [`StoreError::UnstoredField`] for a record field that has no header,
    ///   under either policy.
    pub fn shape(&self, mut row: Row) -> StoreResult<Row> {
        let Some(headers) = &self.headers else {
            return Ok(row);
        };

        let mut shaped = Row::new();
        for header in headers {
            match row.remove(header) {
                Some(value) => {
                    shaped.insert(header.clone(), value);
                }
                None => match self.policy {
                    UnmappedFieldPolicy::Reject => {
                        return Err(StoreError::UnmappedField {
                            collection: self.collection.clone(),
                            field: header.clone(),
                        });
                    }
                    UnmappedFieldPolicy::Blank => {
                        shaped.insert(header.clone(), Value::Null);
                    }
                },
            }
        }

        if let Some(field) = row.keys().next() {
            return Err(StoreError::UnstoredField {
                collection: self.collection.clone(),
                field: field.clone(),
            });
        }

        Ok(shaped)
    }

    /// Returns the `fields` this layout has no header for, in the given order.
    pub fn missing_fields(&self, fields: &[&str]) -> Vec<String> {
        match &self.headers {
            Some(headers) => fields
                .iter()
                .filter(|field| !headers.iter().any(|h| h == *field))
                .map(|field| field.to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Checks that a single field may be written to this collection.
    pub fn check_field(&self, field: &str) -> StoreResult<()> {
        match &self.headers {
            Some(headers) if !headers.iter().any(|h| h == field) => {
                Err(StoreError::UnstoredField {
                    collection: self.collection.clone(),
                    field: field.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Checks that every configured layout has a header for each field of the
/// record kept in its collection.
///
/// Returns one message per missing field.
pub fn check_layouts(collections: &CollectionNames, storage: &StorageSettings) -> Result<(), Vec<String>> {
    let entities: [(&str, &[&str]); 4] = [
        (collections.employees.as_str(), Employee::FIELDS),
        (collections.loans.as_str(), LoanTransaction::FIELDS),
        (collections.payslips.as_str(), Payslip::FIELDS),
        (collections.leave.as_str(), LeaveRecord::FIELDS),
    ];

    let problems: Vec<String> = entities
        .into_iter()
        .flat_map(|(collection, fields)| {
            RowLayout::for_collection(collection, storage)
                .missing_fields(fields)
                .into_iter()
                .map(move |field| {
                    format!("layout of collection '{}' has no header for field '{}'", collection, field)
                })
        })
        .collect();

    if problems.is_empty() { Ok(()) } else { Err(problems) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(headers: &[&str], policy: UnmappedFieldPolicy) -> StorageSettings {
        let mut layouts = HashMap::new();
        layouts.insert(
            "Loans".to_string(),
            headers.iter().map(|h| h.to_string()).collect(),
        );
        StorageSettings {
            unmapped_fields: policy,
            layouts,
        }
    }

    fn row() -> Row {
        let mut row = Row::new();
        row.insert("id".to_string(), Value::String("t1".to_string()));
        row.insert("amount".to_string(), Value::String("10".to_string()));
        row
    }

    #[test]
    fn test_open_layout_passes_row_through() {
        let layout = RowLayout::for_collection("Payslips", &settings(&["id"], UnmappedFieldPolicy::Reject));
        assert_eq!(layout.shape(row()).unwrap(), row());
    }

    #[test]
    fn test_matching_layout_keeps_all_fields() {
        let layout = RowLayout::for_collection("Loans", &settings(&["id", "amount"], UnmappedFieldPolicy::Reject));
        assert_eq!(layout.shape(row()).unwrap(), row());
    }

    #[test]
    fn test_reject_policy_fails_on_unknown_header() {
        let layout = RowLayout::for_collection(
            "Loans",
            &settings(&["id", "amount", "ammount"], UnmappedFieldPolicy::Reject),
        );
        match layout.shape(row()) {
            Err(StoreError::UnmappedField { field, .. }) => assert_eq!(field, "ammount"),
            other => panic!("Expected UnmappedField, got {:?}", other),
        }
    }

    #[test]
    fn test_reject_policy_fails_on_field_without_header() {
        let layout = RowLayout::for_collection("Loans", &settings(&["id"], UnmappedFieldPolicy::Reject));
        match layout.shape(row()) {
            Err(StoreError::UnstoredField { field, .. }) => assert_eq!(field, "amount"),
            other => panic!("Expected UnstoredField, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_policy_nulls_unknown_headers() {
        let layout = RowLayout::for_collection(
            "Loans",
            &settings(&["id", "amount", "notes"], UnmappedFieldPolicy::Blank),
        );
        let shaped = layout.shape(row()).unwrap();
        assert_eq!(shaped.len(), 3);
        assert_eq!(shaped["notes"], Value::Null);
        assert_eq!(shaped["amount"], Value::String("10".to_string()));
    }

    #[test]
    fn test_blank_policy_still_fails_on_field_without_header() {
        let layout = RowLayout::for_collection(
            "Loans",
            &settings(&["id", "notes"], UnmappedFieldPolicy::Blank),
        );
        match layout.shape(row()) {
            Err(StoreError::UnstoredField { field, .. }) => assert_eq!(field, "amount"),
            other => panic!("Expected UnstoredField, got {:?}", other),
        }
    }

    #[test]
    fn test_check_layouts_names_missing_fields() {
        let mut headers: Vec<&str> = LoanTransaction::FIELDS
            .iter()
            .copied()
            .filter(|field| *field != "recorded_by")
            .collect();
        headers.push("notes");
        let storage = settings(&headers, UnmappedFieldPolicy::Blank);

        assert_eq!(
            check_layouts(&CollectionNames::default(), &storage),
            Err(vec![
                "layout of collection 'Loans' has no header for field 'recorded_by'".to_string()
            ])
        );
    }

    #[test]
    fn test_check_layouts_accepts_complete_and_absent_layouts() {
        let mut headers: Vec<&str> = LoanTransaction::FIELDS.to_vec();
        headers.push("notes");
        let storage = settings(&headers, UnmappedFieldPolicy::Blank);

        assert_eq!(check_layouts(&CollectionNames::default(), &storage), Ok(()));
        assert_eq!(check_layouts(&CollectionNames::default(), &StorageSettings::default()), Ok(()));
    }

    #[test]
    fn test_check_field_against_layout() {
        let layout = RowLayout::for_collection("Loans", &settings(&["id"], UnmappedFieldPolicy::Blank));
        assert!(layout.check_field("id").is_ok());
        assert!(layout.check_field("balance_after").is_err());
        assert!(RowLayout::open("Loans").check_field("anything").is_ok());
    }
}
