//! Explicit row mappings for every stored entity.
//!
//! Each entity has exactly one function from record to row and one back.
//! The field lists here are the default collection layouts.

use serde_json::Value;

use crate::error::StoreResult;
use crate::models::{
    Employee, LeaveRecord, LoanTransaction, Payslip, PayslipComputed, PeriodInputs,
};

use super::Row;
use super::fields::{RowReader, date_value, decimal_value, text_value, timestamp_value};

/// Field holding the owning employee on loan, payslip and leave rows.
pub(crate) const EMPLOYEE_ID: &str = "employee_id";
/// Loan row field holding the balance before the transaction.
pub(crate) const BALANCE_BEFORE: &str = "balance_before";
/// Loan row field holding the balance after the transaction.
pub(crate) const BALANCE_AFTER: &str = "balance_after";

/// An entity with an explicit mapping to and from a stored row.
pub trait Record: Sized {
    /// The fields `to_row` produces, in layout order.
    const FIELDS: &'static [&'static str];

    /// Maps the record to a row.
    fn to_row(&self) -> Row;

    /// Maps a row of `collection` back to a record.
    fn from_row(collection: &str, row: &Row) -> StoreResult<Self>;
}

fn build(pairs: Vec<(&str, Value)>) -> Row {
    pairs
        .into_iter()
        .map(|(field, value)| (field.to_string(), value))
        .collect()
}

impl Record for Employee {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "first_name",
        "last_name",
        "id_number",
        "phone",
        "clock_in_ref",
        "hourly_rate",
        "employment_status",
    ];

    fn to_row(&self) -> Row {
        build(vec![
            ("id", text_value(&self.id)),
            ("first_name", text_value(&self.first_name)),
            ("last_name", text_value(&self.last_name)),
            ("id_number", text_value(&self.id_number)),
            ("phone", text_value(&self.phone)),
            ("clock_in_ref", text_value(&self.clock_in_ref)),
            ("hourly_rate", decimal_value(self.hourly_rate)),
            ("employment_status", text_value(self.employment_status.as_str())),
        ])
    }

    fn from_row(collection: &str, row: &Row) -> StoreResult<Self> {
        let r = RowReader::new(collection, row);
        Ok(Self {
            id: r.text("id")?,
            first_name: r.text("first_name")?,
            last_name: r.text("last_name")?,
            id_number: r.text("id_number")?,
            phone: r.text("phone")?,
            clock_in_ref: r.text("clock_in_ref")?,
            hourly_rate: r.decimal("hourly_rate")?,
            employment_status: r.parse("employment_status")?,
        })
    }
}

impl Record for LoanTransaction {
    const FIELDS: &'static [&'static str] = &[
        "id",
        EMPLOYEE_ID,
        "kind",
        "amount",
        "transaction_date",
        "recorded_at",
        "recorded_by",
        BALANCE_BEFORE,
        BALANCE_AFTER,
    ];

    fn to_row(&self) -> Row {
        build(vec![
            ("id", text_value(self.id.to_string())),
            (EMPLOYEE_ID, text_value(&self.employee_id)),
            ("kind", text_value(self.kind.as_str())),
            ("amount", decimal_value(self.amount)),
            ("transaction_date", date_value(self.transaction_date)),
            ("recorded_at", timestamp_value(self.recorded_at)),
            ("recorded_by", text_value(&self.recorded_by)),
            (BALANCE_BEFORE, decimal_value(self.balance_before)),
            (BALANCE_AFTER, decimal_value(self.balance_after)),
        ])
    }

    fn from_row(collection: &str, row: &Row) -> StoreResult<Self> {
        let r = RowReader::new(collection, row);
        Ok(Self {
            id: r.parse("id")?,
            employee_id: r.text(EMPLOYEE_ID)?,
            kind: r.parse("kind")?,
            amount: r.decimal("amount")?,
            transaction_date: r.date("transaction_date")?,
            recorded_at: r.timestamp("recorded_at")?,
            recorded_by: r.text("recorded_by")?,
            balance_before: r.decimal(BALANCE_BEFORE)?,
            balance_after: r.decimal(BALANCE_AFTER)?,
        })
    }
}

impl Record for Payslip {
    const FIELDS: &'static [&'static str] = &[
        "record_number",
        EMPLOYEE_ID,
        "week_ending",
        "hours",
        "minutes",
        "overtime_hours",
        "overtime_minutes",
        "leave_pay",
        "bonus_pay",
        "other_income",
        "other_deductions",
        "loan_deduction_this_week",
        "new_loan_this_week",
        "standard_time",
        "overtime",
        "gross_salary",
        "uif",
        "total_deductions",
        "net_salary",
        "paid_to_account",
        "loan_balance_brought_forward",
        "loan_balance_carried_forward",
        "created_by",
        "created_at",
    ];

    fn to_row(&self) -> Row {
        let i = &self.inputs;
        let c = &self.computed;
        build(vec![
            ("record_number", Value::from(self.record_number)),
            (EMPLOYEE_ID, text_value(&self.employee_id)),
            ("week_ending", date_value(self.week_ending)),
            ("hours", decimal_value(i.hours)),
            ("minutes", decimal_value(i.minutes)),
            ("overtime_hours", decimal_value(i.overtime_hours)),
            ("overtime_minutes", decimal_value(i.overtime_minutes)),
            ("leave_pay", decimal_value(i.leave_pay)),
            ("bonus_pay", decimal_value(i.bonus_pay)),
            ("other_income", decimal_value(i.other_income)),
            ("other_deductions", decimal_value(i.other_deductions)),
            ("loan_deduction_this_week", decimal_value(i.loan_deduction_this_week)),
            ("new_loan_this_week", decimal_value(i.new_loan_this_week)),
            ("standard_time", decimal_value(c.standard_time)),
            ("overtime", decimal_value(c.overtime)),
            ("gross_salary", decimal_value(c.gross_salary)),
            ("uif", decimal_value(c.uif)),
            ("total_deductions", decimal_value(c.total_deductions)),
            ("net_salary", decimal_value(c.net_salary)),
            ("paid_to_account", decimal_value(c.paid_to_account)),
            (
                "loan_balance_brought_forward",
                decimal_value(self.loan_balance_brought_forward),
            ),
            (
                "loan_balance_carried_forward",
                decimal_value(self.loan_balance_carried_forward),
            ),
            ("created_by", text_value(&self.created_by)),
            ("created_at", timestamp_value(self.created_at)),
        ])
    }

    fn from_row(collection: &str, row: &Row) -> StoreResult<Self> {
        let r = RowReader::new(collection, row);
        let week_ending = r.date("week_ending")?;
        Ok(Self {
            record_number: r.parse("record_number")?,
            employee_id: r.text(EMPLOYEE_ID)?,
            week_ending,
            inputs: PeriodInputs {
                week_ending: Some(week_ending),
                hours: r.decimal("hours")?,
                minutes: r.decimal("minutes")?,
                overtime_hours: r.decimal("overtime_hours")?,
                overtime_minutes: r.decimal("overtime_minutes")?,
                leave_pay: r.decimal("leave_pay")?,
                bonus_pay: r.decimal("bonus_pay")?,
                other_income: r.decimal("other_income")?,
                other_deductions: r.decimal("other_deductions")?,
                loan_deduction_this_week: r.decimal("loan_deduction_this_week")?,
                new_loan_this_week: r.decimal("new_loan_this_week")?,
            },
            computed: PayslipComputed {
                standard_time: r.decimal("standard_time")?,
                overtime: r.decimal("overtime")?,
                gross_salary: r.decimal("gross_salary")?,
                uif: r.decimal("uif")?,
                total_deductions: r.decimal("total_deductions")?,
                net_salary: r.decimal("net_salary")?,
                paid_to_account: r.decimal("paid_to_account")?,
            },
            loan_balance_brought_forward: r.decimal("loan_balance_brought_forward")?,
            loan_balance_carried_forward: r.decimal("loan_balance_carried_forward")?,
            created_by: r.text("created_by")?,
            created_at: r.timestamp("created_at")?,
        })
    }
}

impl Record for LeaveRecord {
    const FIELDS: &'static [&'static str] = &[
        "id",
        EMPLOYEE_ID,
        "start_date",
        "return_date",
        "reason",
        "total_days",
        "recorded_by",
    ];

    fn to_row(&self) -> Row {
        build(vec![
            ("id", text_value(&self.id)),
            (EMPLOYEE_ID, text_value(&self.employee_id)),
            ("start_date", date_value(self.start_date)),
            ("return_date", date_value(self.return_date)),
            ("reason", text_value(&self.reason)),
            ("total_days", Value::from(self.total_days)),
            ("recorded_by", text_value(&self.recorded_by)),
        ])
    }

    fn from_row(collection: &str, row: &Row) -> StoreResult<Self> {
        let r = RowReader::new(collection, row);
        Ok(Self {
            id: r.text("id")?,
            employee_id: r.text(EMPLOYEE_ID)?,
            start_date: r.date("start_date")?,
            return_date: r.date("return_date")?,
            reason: r.text("reason")?,
            total_days: r.parse("total_days")?,
            recorded_by: r.text("recorded_by")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::{EmploymentStatus, TransactionId, TransactionKind};
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn assert_fields_match<R: Record>(record: &R) {
        let row = record.to_row();
        let mut produced: Vec<&str> = row.keys().map(String::as_str).collect();
        let mut declared = R::FIELDS.to_vec();
        produced.sort_unstable();
        declared.sort_unstable();
        assert_eq!(produced, declared);
    }

    fn loan() -> LoanTransaction {
        LoanTransaction {
            id: TransactionId::new(),
            employee_id: "emp_001".to_string(),
            kind: TransactionKind::Repayment,
            amount: Decimal::new(-25050, 2),
            transaction_date: NaiveDate::from_ymd_opt(2026, 3, 6).unwrap(),
            recorded_at: Utc::now(),
            recorded_by: "clerk".to_string(),
            balance_before: Decimal::new(1000, 0),
            balance_after: Decimal::new(74950, 2),
        }
    }

    #[test]
    fn test_loan_row_declares_every_field() {
        assert_fields_match(&loan());
    }

    #[test]
    fn test_loan_row_maps_back() {
        let original = loan();
        let row = original.to_row();
        assert_eq!(row["amount"], "-250.50");
        assert_eq!(row["kind"], "repayment");
        assert_eq!(LoanTransaction::from_row("Loans", &row).unwrap(), original);
    }

    #[test]
    fn test_employee_row_reads_capitalised_status() {
        let employee = Employee {
            id: "emp_001".to_string(),
            first_name: "Thandi".to_string(),
            last_name: "Nkosi".to_string(),
            id_number: "9001015009087".to_string(),
            phone: "0821234567".to_string(),
            clock_in_ref: "CLK-001".to_string(),
            hourly_rate: Decimal::new(100, 0),
            employment_status: EmploymentStatus::Permanent,
        };
        assert_fields_match(&employee);

        let mut row = employee.to_row();
        row.insert("employment_status".to_string(), text_value("Permanent"));
        assert_eq!(Employee::from_row("Employees", &row).unwrap(), employee);
    }

    #[test]
    fn test_leave_row_declares_every_field() {
        let record = LeaveRecord {
            id: "leave_1".to_string(),
            employee_id: "emp_001".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2026, 4, 3).unwrap(),
            reason: "Family".to_string(),
            total_days: 3,
            recorded_by: "clerk".to_string(),
        };
        assert_fields_match(&record);
        assert_eq!(LeaveRecord::from_row("Leave", &record.to_row()).unwrap(), record);
    }

    #[test]
    fn test_bad_kind_reports_field() {
        let mut row = loan().to_row();
        row.insert("kind".to_string(), text_value("gift"));
        match LoanTransaction::from_row("Loans", &row) {
            Err(StoreError::MalformedRow { field, .. }) => assert_eq!(field, "kind"),
            other => panic!("Expected MalformedRow, got {:?}", other),
        }
    }
}
