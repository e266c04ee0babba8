//! Employee registration rules.

use rust_decimal::Decimal;

use crate::config::EmployeeRules;
use crate::models::{Employee, NewEmployee};

use super::ValidationReport;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Validates a new employee against the configured rules and the employees
/// already registered.
///
/// Duplicate ID numbers and clock-in references are reported as conflicts.
pub fn validate_employee(
    candidate: &NewEmployee,
    existing: &[Employee],
    rules: &EmployeeRules,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    for field in &rules.required_fields {
        match candidate.has_field(field) {
            Some(true) => {}
            Some(false) => report.push(field, format!("{} is required", field)),
            None => report.push(field, format!("unknown required field '{}'", field)),
        }
    }

    if let Some(rate) = candidate.hourly_rate {
        report.check(
            rate > Decimal::ZERO,
            "hourly_rate",
            "hourly rate must be greater than zero",
        );
    }

    let id_number = non_blank(&candidate.id_number);
    if let Some(id_number) = id_number {
        let well_formed = id_number.len() == rules.id_number_length
            && id_number.chars().all(|c| c.is_ascii_digit());
        report.check(
            well_formed,
            "id_number",
            format!(
                "ID number must be exactly {} digits",
                rules.id_number_length
            ),
        );
    }

    if let Some(phone) = non_blank(&candidate.phone) {
        report.check(
            rules.phone_pattern.is_match(phone),
            "phone",
            format!("phone number '{}' is not a valid mobile number", phone),
        );
    }

    if let Some(id_number) = id_number {
        if existing.iter().any(|e| e.id_number == id_number) {
            report.push_conflict(
                "id_number",
                format!("ID number {} is already registered", id_number),
            );
        }
    }

    if let Some(clock_in_ref) = non_blank(&candidate.clock_in_ref) {
        if existing.iter().any(|e| e.clock_in_ref == clock_in_ref) {
            report.push_conflict(
                "clock_in_ref",
                format!("clock-in reference {} is already in use", clock_in_ref),
            );
        }
    }

    report
}
