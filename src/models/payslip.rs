//! Payslip models.
//!
//! [`PeriodInputs`] carries the raw time and adjustment figures for one pay
//! period, [`PayslipComputed`] the fields derived from them, and [`Payslip`]
//! the full record that is stored.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw inputs for one pay period.
///
/// Monetary and time figures default to zero when omitted.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::PeriodInputs;
/// use rust_decimal::Decimal;
///
/// let inputs: PeriodInputs = serde_json::from_str(
///     r#"{"week_ending": "2026-03-06", "hours": "40", "overtime_hours": "5"}"#,
/// )
/// .unwrap();
/// assert_eq!(inputs.hours, Decimal::new(40, 0));
/// assert_eq!(inputs.bonus_pay, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodInputs {
    /// The last day of the pay week.
    #[serde(default)]
    pub week_ending: Option<NaiveDate>,
    /// Whole ordinary hours worked.
    #[serde(default)]
    pub hours: Decimal,
    /// Ordinary minutes worked on top of `hours`.
    #[serde(default)]
    pub minutes: Decimal,
    /// Whole overtime hours worked.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Overtime minutes worked on top of `overtime_hours`.
    #[serde(default)]
    pub overtime_minutes: Decimal,
    /// Leave pay for the period.
    #[serde(default)]
    pub leave_pay: Decimal,
    /// Bonus pay for the period.
    #[serde(default)]
    pub bonus_pay: Decimal,
    /// Any other income for the period.
    #[serde(default)]
    pub other_income: Decimal,
    /// Deductions other than UIF and loan repayments.
    #[serde(default)]
    pub other_deductions: Decimal,
    /// Loan repayment withheld this period.
    #[serde(default)]
    pub loan_deduction_this_week: Decimal,
    /// New loan paid out with this period's salary.
    #[serde(default)]
    pub new_loan_this_week: Decimal,
}

/// Fields derived from [`PeriodInputs`] and the employee's rate and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipComputed {
    /// Pay for ordinary time.
    pub standard_time: Decimal,
    /// Pay for overtime.
    pub overtime: Decimal,
    /// Standard time, overtime and all additional income.
    pub gross_salary: Decimal,
    /// Unemployment insurance contribution.
    pub uif: Decimal,
    /// UIF, other deductions and the loan repayment.
    pub total_deductions: Decimal,
    /// Gross salary less total deductions.
    pub net_salary: Decimal,
    /// Amount transferred to the employee's account.
    pub paid_to_account: Decimal,
}

/// A stored payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// Unique, increasing record number.
    pub record_number: u64,
    /// The employee paid.
    pub employee_id: String,
    /// The last day of the pay week.
    pub week_ending: NaiveDate,
    /// The raw period inputs.
    pub inputs: PeriodInputs,
    /// The derived payroll fields.
    pub computed: PayslipComputed,
    /// Loan balance before this payslip's ledger entries.
    pub loan_balance_brought_forward: Decimal,
    /// Loan balance once this payslip's ledger entries are applied.
    pub loan_balance_carried_forward: Decimal,
    /// Who created the payslip.
    pub created_by: String,
    /// When the payslip was created.
    pub created_at: DateTime<Utc>,
}

impl Payslip {
    /// Returns true if this payslip records a loan repayment or a new loan.
    pub fn touches_ledger(&self) -> bool {
        self.inputs.loan_deduction_this_week > Decimal::ZERO
            || self.inputs.new_loan_this_week > Decimal::ZERO
    }
}
