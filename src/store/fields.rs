//! Typed field access on stored rows.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

use super::Row;

/// Reads typed values out of a row, reporting the collection and field of
/// anything that does not parse.
pub struct RowReader<'a> {
    collection: &'a str,
    row: &'a Row,
}

impl<'a> RowReader<'a> {
    /// Creates a reader over a row of the given collection.
    pub fn new(collection: &'a str, row: &'a Row) -> Self {
        Self { collection, row }
    }

    fn malformed(&self, field: &str, message: impl Into<String>) -> StoreError {
        StoreError::MalformedRow {
            collection: self.collection.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Reads a field as text. Numbers are accepted in their display form.
    pub fn text(&self, field: &str) -> StoreResult<String> {
        match self.row.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Null) | None => Err(self.malformed(field, "missing value")),
            Some(other) => Err(self.malformed(field, format!("expected text, found {}", other))),
        }
    }

    /// Reads a field and parses it with `FromStr`.
    pub fn parse<T>(&self, field: &str) -> StoreResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let text = self.text(field)?;
        text.trim()
            .parse()
            .map_err(|e: T::Err| self.malformed(field, e.to_string()))
    }

    /// Reads a monetary or quantity field.
    pub fn decimal(&self, field: &str) -> StoreResult<Decimal> {
        self.parse(field)
    }

    /// Reads an ISO `YYYY-MM-DD` date field.
    pub fn date(&self, field: &str) -> StoreResult<NaiveDate> {
        self.parse(field)
    }

    /// Reads an RFC 3339 timestamp field.
    pub fn timestamp(&self, field: &str) -> StoreResult<DateTime<Utc>> {
        let text = self.text(field)?;
        DateTime::parse_from_rfc3339(text.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| self.malformed(field, e.to_string()))
    }

    /// Reads an optional date; null, absent and blank mean `None`.
    pub fn optional_date(&self, field: &str) -> StoreResult<Option<NaiveDate>> {
        match self.row.get(field) {
            Some(Value::Null) | None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(_) => self.date(field).map(Some),
        }
    }
}

/// Stored form of a decimal.
pub(crate) fn decimal_value(value: Decimal) -> Value {
    Value::String(value.to_string())
}

/// Stored form of a date.
pub(crate) fn date_value(value: NaiveDate) -> Value {
    Value::String(value.format("%Y-%m-%d").to_string())
}

/// Stored form of a timestamp, with nanosecond precision so that recording
/// order survives the round trip.
pub(crate) fn timestamp_value(value: DateTime<Utc>) -> Value {
    Value::String(value.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true))
}

/// Stored form of text.
pub(crate) fn text_value(value: impl Into<String>) -> Value {
    Value::String(value.into())
}
