//! Error types for the payroll ledger engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! [`EngineError`] is what every public operation returns; [`StoreError`]
//! describes failures of the record store collaborator underneath.

use thiserror::Error;

use crate::models::TransactionId;

/// Failures reported by a record store or by the row mapping layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the operation.
    #[error("Record store unavailable: {message}")]
    Unavailable {
        /// A description of the failure.
        message: String,
    },

    /// A row index did not address an existing row.
    #[error("Row {row} does not exist in collection '{collection}'")]
    RowOutOfRange {
        /// The collection that was addressed.
        collection: String,
        /// The row index that was requested.
        row: usize,
    },

    /// A stored row could not be mapped back to a typed record.
    #[error("Malformed row in collection '{collection}', field '{field}': {message}")]
    MalformedRow {
        /// The collection holding the row.
        collection: String,
        /// The field that could not be read.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// A configured header has no value produced by the record mapping.
    #[error("Header '{field}' of collection '{collection}' is not produced by any record field")]
    UnmappedField {
        /// The collection whose layout names the header.
        collection: String,
        /// The header with no mapping.
        field: String,
    },

    /// A record field has no header in the configured layout.
    #[error("Field '{field}' has no header in the layout of collection '{collection}'")]
    UnstoredField {
        /// The collection being written.
        collection: String,
        /// The record field that would be lost.
        field: String,
    },

    /// Stored transactions sum to a running balance that cannot be represented.
    #[error("Running loan balance of employee '{employee_id}' in collection '{collection}' is out of range")]
    BalanceOverflow {
        /// The loans collection.
        collection: String,
        /// The employee whose ledger overflows.
        employee_id: String,
    },
}

/// A type alias for Results that return StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Broad classification of an [`EngineError`].
///
/// Callers use this to tell "fix your input" apart from "system problem"
/// without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Engine configuration could not be loaded.
    Config,
    /// Bad or missing input.
    Validation,
    /// A referenced employee, transaction or payslip does not exist.
    NotFound,
    /// A uniqueness rule was violated.
    Conflict,
    /// The record store failed or returned inconsistent data.
    Store,
    /// A payslip and its ledger entries could not be recorded together.
    Integrity,
}

/// The main error type for the payroll ledger engine.
///
/// # Example
///
/// ```
/// use payroll_ledger::error::{EngineError, ErrorKind};
///
/// let error = EngineError::Validation {
///     violations: vec!["amount must be greater than zero".to_string()],
/// };
/// assert_eq!(error.kind(), ErrorKind::Validation);
/// assert_eq!(
///     error.to_string(),
///     "Validation failed: amount must be greater than zero"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Input failed one or more validation rules.
    #[error("Validation failed: {}", violations.join("; "))]
    Validation {
        /// Every violated rule, in the order the rules were checked.
        violations: Vec<String>,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "employee", "payslip").
        entity: &'static str,
        /// The identifier that did not resolve.
        id: String,
    },

    /// A uniqueness rule was violated.
    #[error("Conflict: {}", violations.join("; "))]
    Conflict {
        /// Every uniqueness violation found.
        violations: Vec<String>,
    },

    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A loan transaction was appended but its employee's balances could not
    /// be recomputed. Re-running `recompute` for the employee closes the gap.
    #[error(
        "Transaction {transaction_id} was recorded but balances for employee '{employee_id}' are stale: {source}"
    )]
    StaleBalances {
        /// The employee whose ledger needs recomputation.
        employee_id: String,
        /// The transaction that was appended.
        transaction_id: TransactionId,
        /// The store failure hit during recomputation.
        #[source]
        source: StoreError,
    },

    /// A payslip was appended but its ledger entries could not all be recorded.
    #[error(
        "Payslip {record_number} was recorded but its loan entries were not ({} of them recorded): {source}",
        recorded.len()
    )]
    Integrity {
        /// The record number of the appended payslip.
        record_number: u64,
        /// Ledger transactions that were recorded before the failure.
        recorded: Vec<TransactionId>,
        /// The ledger failure.
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Creates a not-found error for the given entity.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Returns the broad kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigNotFound { .. } | Self::ConfigParseError { .. } => ErrorKind::Config,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Store(_) | Self::StaleBalances { .. } => ErrorKind::Store,
            Self::Integrity { .. } => ErrorKind::Integrity,
        }
    }

    /// Returns a stable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } | Self::ConfigParseError { .. } => "CONFIG_ERROR",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Conflict { .. } => "CONFLICT",
            Self::Store(_) => "STORE_ERROR",
            Self::StaleBalances { .. } => "STALE_BALANCES",
            Self::Integrity { .. } => "INTEGRITY_ERROR",
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_validation_lists_every_violation() {
        let error = EngineError::Validation {
            violations: vec![
                "employee reference is required".to_string(),
                "amount must be greater than zero".to_string(),
            ],
        };
        assert_eq!(
            error.to_string(),
            "Validation failed: employee reference is required; amount must be greater than zero"
        );
        assert_eq!(error.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_not_found_displays_entity_and_id() {
        let error = EngineError::not_found("employee", "emp_404");
        assert_eq!(error.to_string(), "employee not found: emp_404");
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_store_error_converts_with_question_mark() {
        fn fails() -> StoreResult<()> {
            Err(StoreError::Unavailable {
                message: "offline".to_string(),
            })
        }

        fn propagates() -> EngineResult<()> {
            fails()?;
            Ok(())
        }

        let error = propagates().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Store);
        assert_eq!(error.to_string(), "Record store unavailable: offline");
    }

    #[test]
    fn test_stale_balances_is_a_store_kind() {
        let error = EngineError::StaleBalances {
            employee_id: "emp_001".to_string(),
            transaction_id: TransactionId::new(),
            source: StoreError::Unavailable {
                message: "timeout".to_string(),
            },
        };
        assert_eq!(error.kind(), ErrorKind::Store);
        assert_eq!(error.code(), "STALE_BALANCES");
    }

    #[test]
    fn test_integrity_keeps_source() {
        use std::error::Error as _;

        let error = EngineError::Integrity {
            record_number: 7,
            recorded: vec![],
            source: Box::new(EngineError::Store(StoreError::Unavailable {
                message: "down".to_string(),
            })),
        };
        assert_eq!(error.kind(), ErrorKind::Integrity);
        assert!(error.source().is_some());
        assert!(error.to_string().starts_with("Payslip 7 was recorded"));
    }

    #[test]
    fn test_balance_overflow_names_the_employee() {
        let error = EngineError::from(StoreError::BalanceOverflow {
            collection: "Loans".to_string(),
            employee_id: "emp_001".to_string(),
        });
        assert_eq!(error.kind(), ErrorKind::Store);
        assert_eq!(
            error.to_string(),
            "Running loan balance of employee 'emp_001' in collection 'Loans' is out of range"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
        assert_error::<StoreError>();
    }
}
