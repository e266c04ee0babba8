//! Leave rules.

use chrono::NaiveDate;

use crate::models::LeaveRequest;

use super::ValidationReport;

/// Days of leave between two dates, counting both endpoints.
///
/// ```
/// use payroll_ledger::validation::leave_total_days;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2026, 4, 6).unwrap();
/// let back = NaiveDate::from_ymd_opt(2026, 4, 10).unwrap();
/// assert_eq!(leave_total_days(start, back), 5);
/// assert_eq!(leave_total_days(start, start), 1);
/// ```
pub fn leave_total_days(start_date: NaiveDate, return_date: NaiveDate) -> i64 {
    (return_date - start_date).num_days().abs() + 1
}

/// Validates a leave request.
pub fn validate_leave(request: &LeaveRequest) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.check(
        request
            .employee_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty()),
        "employee_id",
        "employee reference is required",
    );
    report.check(
        request.start_date.is_some(),
        "start_date",
        "start date is required",
    );
    report.check(
        request.return_date.is_some(),
        "return_date",
        "return date is required",
    );
    report.check(
        request
            .reason
            .as_deref()
            .is_some_and(|r| !r.trim().is_empty()),
        "reason",
        "reason is required",
    );

    if let (Some(start), Some(back)) = (request.start_date, request.return_date) {
        report.check(
            back >= start,
            "return_date",
            "return date cannot be before start date",
        );
    }
    report
}
