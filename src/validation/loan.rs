//! Loan transaction rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::ValidationReport;

/// Validates the inputs of a loan transaction.
///
/// The amount is the unsigned size of the transaction; its sign comes from
/// the transaction kind.
pub fn validate_loan(
    employee_id: &str,
    amount: Decimal,
    transaction_date: Option<NaiveDate>,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.check(
        !employee_id.trim().is_empty(),
        "employee_id",
        "employee reference is required",
    );
    report.check(
        amount > Decimal::ZERO,
        "amount",
        "amount must be greater than zero",
    );
    report.check(
        transaction_date.is_some(),
        "transaction_date",
        "transaction date is required",
    );
    report
}
