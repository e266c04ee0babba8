//! The payroll engine: payslip creation and its coupling to the loan ledger.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::ledger::{LedgerEngine, LockedLedger};
use crate::models::{
    ActorContext, Payslip, PayslipComputed, PeriodInputs, TransactionId, TransactionKind,
};
use crate::staff::EmployeeDirectory;
use crate::store::{EMPLOYEE_ID, RecordStore, Table};
use crate::validation::validate_timesheet;

use super::calculation::calculate_payslip;

/// Calculates and records payslips.
///
/// Payslips carrying a loan repayment or a new loan are paired with ledger
/// entries dated at the payslip's week ending.
#[derive(Debug, Clone)]
pub struct PayrollEngine {
    payslips: Table,
    employees: EmployeeDirectory,
    ledger: LedgerEngine,
    record_number_floor: u64,
    sequence: Arc<Mutex<()>>,
}

impl PayrollEngine {
    /// Creates a payroll engine over the configured payslips collection.
    pub fn new(
        store: Arc<dyn RecordStore>,
        config: &ConfigLoader,
        employees: EmployeeDirectory,
        ledger: LedgerEngine,
    ) -> Self {
        Self {
            payslips: Table::new(store, &config.collections().payslips, &config.config().storage),
            employees,
            ledger,
            record_number_floor: config.record_number_floor(),
            sequence: Arc::new(Mutex::new(())),
        }
    }

    /// Derives the payslip fields for an employee without storing anything.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the employee does not exist.
    /// - `Validation` if a field cannot be represented.
    pub fn calculate(&self, employee_id: &str, inputs: &PeriodInputs) -> EngineResult<PayslipComputed> {
        let employee = self.employees.find(employee_id)?;
        calculate_payslip(&employee, inputs)
    }

    /// Validates, calculates and records a payslip, returning its record
    /// number.
    ///
    /// When the inputs carry a loan repayment or a new loan, the matching
    /// Repayment and then Disbursement are recorded in the ledger after the
    /// payslip is appended. The brought-forward balance is read, and the
    /// entries recorded, while the employee's ledger lock is held.
    ///
    /// # Errors
    ///
    /// - `Validation` or `NotFound` before anything is written.
    /// - `Store` if the payslip itself could not be appended.
    /// - `Integrity` if the payslip was appended but its ledger entries were
    ///   not all recorded. The error names the payslip and the entries that
    ///   did make it into the ledger.
    pub fn create_payslip(
        &self,
        actor: &ActorContext,
        employee_id: &str,
        inputs: PeriodInputs,
    ) -> EngineResult<u64> {
        let report = validate_timesheet(employee_id, &inputs);
        let (true, Some(week_ending)) = (report.is_valid(), inputs.week_ending) else {
            warn!(
                actor = %actor.user,
                employee_id = %employee_id,
                violations = ?report.messages(),
                "Payslip rejected"
            );
            return Err(EngineError::Validation {
                violations: report.messages(),
            });
        };

        let employee = self.employees.find(employee_id)?;
        let computed = calculate_payslip(&employee, &inputs).inspect_err(|failure| {
            warn!(
                actor = %actor.user,
                employee_id = %employee_id,
                error = %failure,
                "Payslip rejected"
            );
        })?;

        self.ledger.with_employee(employee_id, |ledger| -> EngineResult<u64> {
            let brought_forward = ledger.balance()?;
            let carried_forward = brought_forward
                .checked_sub(inputs.loan_deduction_this_week)
                .and_then(|balance| balance.checked_add(inputs.new_loan_this_week))
                .ok_or_else(|| EngineError::Validation {
                    violations: vec!["loan balance carried forward is too large to calculate".to_string()],
                })?;

            let payslip = {
                let _guard = self.sequence.lock().unwrap_or_else(PoisonError::into_inner);
                let payslip = Payslip {
                    record_number: self.next_record_number()?,
                    employee_id: employee.id.clone(),
                    week_ending,
                    inputs,
                    computed,
                    loan_balance_brought_forward: brought_forward,
                    loan_balance_carried_forward: carried_forward,
                    created_by: actor.user.clone(),
                    created_at: Utc::now(),
                };
                self.payslips.append(&payslip)?;
                payslip
            };
            info!(
                actor = %actor.user,
                employee_id = %employee_id,
                record_number = payslip.record_number,
                week_ending = %week_ending,
                net_salary = %payslip.computed.net_salary,
                "Created payslip"
            );

            if payslip.touches_ledger() {
                self.record_loan_entries(actor, ledger, &payslip, week_ending)?;
            }
            Ok(payslip.record_number)
        })
    }

    /// Returns the payslip with the given record number.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no payslip has the number.
    pub fn payslip(&self, record_number: u64) -> EngineResult<Payslip> {
        self.payslips
            .scan::<Payslip>()?
            .into_iter()
            .map(|(_, payslip)| payslip)
            .find(|payslip| payslip.record_number == record_number)
            .ok_or_else(|| EngineError::not_found("payslip", record_number.to_string()))
    }

    /// Returns every payslip of an employee, in record-number order.
    pub fn payslips_for(&self, employee_id: &str) -> EngineResult<Vec<Payslip>> {
        let mut payslips: Vec<Payslip> = self
            .payslips
            .scan_where(EMPLOYEE_ID, employee_id)?
            .into_iter()
            .map(|(_, payslip)| payslip)
            .collect();
        payslips.sort_by_key(|payslip| payslip.record_number);
        Ok(payslips)
    }

    /// Returns the record number the next payslip would receive: one past
    /// the highest stored number, or the configured floor when there are no
    /// payslips yet.
    pub fn next_record_number(&self) -> EngineResult<u64> {
        let highest = self
            .payslips
            .scan::<Payslip>()?
            .into_iter()
            .map(|(_, payslip)| payslip.record_number)
            .max();
        Ok(match highest {
            Some(highest) => highest.max(self.record_number_floor.saturating_sub(1)) + 1,
            None => self.record_number_floor,
        })
    }

    fn record_loan_entries(
        &self,
        actor: &ActorContext,
        ledger: &LockedLedger<'_>,
        payslip: &Payslip,
        week_ending: NaiveDate,
    ) -> EngineResult<()> {
        let entries = [
            (TransactionKind::Repayment, payslip.inputs.loan_deduction_this_week),
            (TransactionKind::Disbursement, payslip.inputs.new_loan_this_week),
        ];

        let mut recorded: Vec<TransactionId> = Vec::new();
        for (kind, amount) in entries {
            if amount <= Decimal::ZERO {
                continue;
            }
            let failure = match ledger.record(actor, kind, amount, Some(week_ending)) {
                Ok(transaction_id) => {
                    recorded.push(transaction_id);
                    continue;
                }
                Err(failure) => failure,
            };

            if let EngineError::StaleBalances { transaction_id, .. } = &failure {
                recorded.push(*transaction_id);
            }
            error!(
                employee_id = %payslip.employee_id,
                record_number = payslip.record_number,
                kind = %kind,
                recorded = recorded.len(),
                error = %failure,
                "Payslip recorded without all of its loan entries"
            );
            return Err(EngineError::Integrity {
                record_number: payslip.record_number,
                recorded,
                source: Box::new(failure),
            });
        }
        Ok(())
    }
}
