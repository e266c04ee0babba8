//! Timesheet and payslip input rules.

use rust_decimal::Decimal;

use crate::models::PeriodInputs;

use super::ValidationReport;

/// Hours in one calendar week: the most a single period may record.
pub const MAX_WEEKLY_HOURS: Decimal = Decimal::from_parts(168, 0, 0, false, 0);

/// Validates the period inputs of a payslip.
///
/// # Examples
///
/// ```
/// use payroll_ledger::models::PeriodInputs;
/// use payroll_ledger::validation::validate_timesheet;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let inputs = PeriodInputs {
///     week_ending: NaiveDate::from_ymd_opt(2026, 3, 6),
///     hours: Decimal::new(100, 0),
///     overtime_hours: Decimal::new(68, 0),
///     ..Default::default()
/// };
/// assert!(validate_timesheet("emp_001", &inputs).is_valid());
/// ```
pub fn validate_timesheet(employee_id: &str, inputs: &PeriodInputs) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.check(
        !employee_id.trim().is_empty(),
        "employee_id",
        "employee reference is required",
    );
    report.check(
        inputs.week_ending.is_some(),
        "week_ending",
        "week ending date is required",
    );
    report.check(
        inputs.hours >= Decimal::ZERO,
        "hours",
        "hours cannot be negative",
    );
    report.check(
        inputs.overtime_hours >= Decimal::ZERO,
        "overtime_hours",
        "overtime hours cannot be negative",
    );

    match inputs.hours.checked_add(inputs.overtime_hours) {
        Some(total) => report.check(
            total <= MAX_WEEKLY_HOURS,
            "hours",
            format!(
                "total hours ({}) exceed the {} hours in a week",
                total.normalize(),
                MAX_WEEKLY_HOURS
            ),
        ),
        None => report.push(
            "hours",
            format!("total hours exceed the {} hours in a week", MAX_WEEKLY_HOURS),
        ),
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn inputs(hours: i64, overtime_hours: i64) -> PeriodInputs {
        PeriodInputs {
            week_ending: NaiveDate::from_ymd_opt(2026, 3, 6),
            hours: Decimal::new(hours, 0),
            overtime_hours: Decimal::new(overtime_hours, 0),
            ..Default::default()
        }
    }

    #[test]
    fn test_sum_over_a_week_fails() {
        let report = validate_timesheet("emp_001", &inputs(100, 70));
        assert_eq!(
            report.messages(),
            vec!["total hours (170) exceed the 168 hours in a week".to_string()]
        );
    }

    #[test]
    fn test_sum_of_exactly_a_week_passes() {
        assert!(validate_timesheet("emp_001", &inputs(100, 68)).is_valid());
    }

    #[test]
    fn test_negative_hours_rejected() {
        let report = validate_timesheet("emp_001", &inputs(-1, 0));
        assert_eq!(report.violations()[0].field, "hours");
    }

    #[test]
    fn test_negative_overtime_rejected() {
        let report = validate_timesheet("emp_001", &inputs(40, -2));
        assert_eq!(
            report.messages(),
            vec!["overtime hours cannot be negative".to_string()]
        );
    }

    #[test]
    fn test_unrepresentable_total_is_a_violation() {
        let period = PeriodInputs {
            week_ending: NaiveDate::from_ymd_opt(2026, 3, 6),
            hours: Decimal::MAX,
            overtime_hours: Decimal::MAX,
            ..Default::default()
        };
        let report = validate_timesheet("emp_001", &period);
        assert_eq!(
            report.messages(),
            vec!["total hours exceed the 168 hours in a week".to_string()]
        );
    }

    #[test]
    fn test_missing_references_all_reported() {
        let mut period = inputs(200, 0);
        period.week_ending = None;
        let report = validate_timesheet("", &period);
        assert_eq!(report.violations().len(), 3);
    }
}
