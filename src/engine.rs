//! Wiring of the engines over one record store.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::ledger::LedgerEngine;
use crate::payroll::PayrollEngine;
use crate::staff::{EmployeeDirectory, LeaveRegister};
use crate::store::RecordStore;

/// The employee directory, leave register, loan ledger and payroll engine,
/// all sharing one record store and configuration.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use payroll_ledger::PayrollLedger;
/// use payroll_ledger::config::ConfigLoader;
/// use payroll_ledger::store::InMemoryStore;
///
/// let engine = PayrollLedger::new(Arc::new(InMemoryStore::new()), &ConfigLoader::default());
/// assert!(engine.employees.all().unwrap().is_empty());
/// assert!(engine.ledger.outstanding_balances().unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct PayrollLedger {
    /// Employee lookup and registration.
    pub employees: EmployeeDirectory,
    /// Leave recording.
    pub leave: LeaveRegister,
    /// The loan ledger.
    pub ledger: LedgerEngine,
    /// Payslip calculation and recording.
    pub payroll: PayrollEngine,
}

impl PayrollLedger {
    /// Builds every engine over `store` using `config`.
    pub fn new(store: Arc<dyn RecordStore>, config: &ConfigLoader) -> Self {
        let employees = EmployeeDirectory::new(Arc::clone(&store), config);
        let leave = LeaveRegister::new(Arc::clone(&store), config, employees.clone());
        let ledger = LedgerEngine::new(Arc::clone(&store), config, employees.clone());
        let payroll = PayrollEngine::new(store, config, employees.clone(), ledger.clone());
        Self {
            employees,
            leave,
            ledger,
            payroll,
        }
    }
}
