//! Field-level and cross-record validation rules.
//!
//! Every rule set is a stateless function returning a [`ValidationReport`].
//! Expected bad input never panics or short-circuits: each function checks
//! every rule and reports every violation it finds.

mod employee;
mod leave;
mod loan;
mod timesheet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub use employee::validate_employee;
pub use leave::{leave_total_days, validate_leave};
pub use loan::validate_loan;
pub use timesheet::{MAX_WEEKLY_HOURS, validate_timesheet};

/// A single violated rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// The field the rule applies to.
    pub field: String,
    /// Human-readable description of the violation.
    pub message: String,
    /// True when the violation is a uniqueness conflict with existing records.
    pub conflict: bool,
}

/// The outcome of validating one record.
///
/// # Example
///
/// ```
/// use payroll_ledger::validation::validate_loan;
/// use rust_decimal::Decimal;
///
/// let report = validate_loan("", Decimal::ZERO, None);
/// assert!(!report.is_valid());
/// assert_eq!(report.violations().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// Creates an empty (valid) report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation of a field rule.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(Violation {
            field: field.to_string(),
            message: message.into(),
            conflict: false,
        });
    }

    /// Records a uniqueness conflict.
    pub fn push_conflict(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(Violation {
            field: field.to_string(),
            message: message.into(),
            conflict: true,
        });
    }

    /// Records a violation of `field` unless `holds` is true.
    pub fn check(&mut self, holds: bool, field: &str, message: impl Into<String>) {
        if !holds {
            self.push(field, message);
        }
    }

    /// Returns true if no rule was violated.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns every violation, in the order the rules were checked.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns the message of every violation.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.message.clone()).collect()
    }

    /// Converts the report into an engine result.
    ///
    /// A report holding only uniqueness conflicts becomes
    /// [`EngineError::Conflict`]; any other violation makes it
    /// [`EngineError::Validation`] listing every violation.
    pub fn into_result(self) -> EngineResult<()> {
        if self.is_valid() {
            return Ok(());
        }
        let violations = self.messages();
        if self.violations.iter().all(|v| v.conflict) {
            Err(EngineError::Conflict { violations })
        } else {
            Err(EngineError::Validation { violations })
        }
    }
}
