//! Payslip field derivation.
//!
//! Every field is a pure function of the period inputs and the employee's
//! hourly rate and employment status. Fields are evaluated in a fixed order
//! and each is rounded to cents as it is produced, so later fields build on
//! the rounded figures.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, PayslipComputed, PeriodInputs};

/// Overtime is paid at time and a half.
pub const OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Unemployment insurance contribution rate for permanent employees (1%).
pub const UIF_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Minutes in an hour, used to pay part hours at the hourly rate.
pub const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Rounds a monetary amount to cents, halves away from zero.
///
/// # Example
///
/// ```
/// use payroll_ledger::payroll::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(47505, 3)), Decimal::new(4751, 2));
/// assert_eq!(round_money(Decimal::new(-47505, 3)), Decimal::new(-4751, 2));
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Derives the payslip fields for one period.
///
/// The formula, in order:
///
/// - standard time: `hours * rate + (rate / 60) * minutes`
/// - overtime: `overtime_hours * rate * 1.5 + (rate / 60) * overtime_minutes * 1.5`
/// - gross salary: standard time, overtime, leave pay, bonus pay and other income
/// - UIF: 1% of gross salary for permanent employees, otherwise zero
/// - total deductions: UIF, other deductions and the loan repayment
/// - net salary: gross salary less total deductions
/// - paid to account: net salary less the loan repayment plus any new loan
///
/// # Errors
///
/// Returns `Validation` naming the first field whose value cannot be
/// represented.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::{Employee, EmploymentStatus, PeriodInputs};
/// use payroll_ledger::payroll::calculate_payslip;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     first_name: "Thandi".to_string(),
///     last_name: "Nkosi".to_string(),
///     id_number: "9001015009087".to_string(),
///     phone: "0821234567".to_string(),
///     clock_in_ref: "CLK-001".to_string(),
///     hourly_rate: Decimal::new(100, 0),
///     employment_status: EmploymentStatus::Permanent,
/// };
/// let inputs = PeriodInputs {
///     hours: Decimal::new(40, 0),
///     overtime_hours: Decimal::new(5, 0),
///     ..Default::default()
/// };
///
/// let computed = calculate_payslip(&employee, &inputs).unwrap();
/// assert_eq!(computed.gross_salary, Decimal::new(4750, 0));
/// assert_eq!(computed.paid_to_account, Decimal::new(470250, 2));
/// ```
pub fn calculate_payslip(employee: &Employee, inputs: &PeriodInputs) -> EngineResult<PayslipComputed> {
    let rate = employee.hourly_rate;
    let per_minute = rate / MINUTES_PER_HOUR;

    let standard_time = money(
        "standard time",
        &[
            product("standard time", &[inputs.hours, rate])?,
            product("standard time", &[per_minute, inputs.minutes])?,
        ],
    )?;
    let overtime = money(
        "overtime",
        &[
            product("overtime", &[inputs.overtime_hours, rate, OVERTIME_MULTIPLIER])?,
            product("overtime", &[per_minute, inputs.overtime_minutes, OVERTIME_MULTIPLIER])?,
        ],
    )?;
    let gross_salary = money(
        "gross salary",
        &[
            standard_time,
            overtime,
            inputs.leave_pay,
            inputs.bonus_pay,
            inputs.other_income,
        ],
    )?;
    let uif = if employee.is_permanent() {
        round_money(product("UIF", &[gross_salary, UIF_RATE])?)
    } else {
        Decimal::ZERO
    };
    let total_deductions = money(
        "total deductions",
        &[uif, inputs.other_deductions, inputs.loan_deduction_this_week],
    )?;
    let net_salary = money("net salary", &[gross_salary, -total_deductions])?;
    let paid_to_account = money(
        "paid to account",
        &[
            net_salary,
            -inputs.loan_deduction_this_week,
            inputs.new_loan_this_week,
        ],
    )?;

    Ok(PayslipComputed {
        standard_time,
        overtime,
        gross_salary,
        uif,
        total_deductions,
        net_salary,
        paid_to_account,
    })
}

fn out_of_range(field: &str) -> EngineError {
    EngineError::Validation {
        violations: vec![format!("{} is too large to calculate", field)],
    }
}

fn product(field: &str, factors: &[Decimal]) -> EngineResult<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, factor| acc.checked_mul(*factor))
        .ok_or_else(|| out_of_range(field))
}

/// Sums `terms` and rounds the total to cents.
fn money(field: &str, terms: &[Decimal]) -> EngineResult<Decimal> {
    terms
        .iter()
        .try_fold(Decimal::ZERO, |acc, term| acc.checked_add(*term))
        .map(round_money)
        .ok_or_else(|| out_of_range(field))
}
