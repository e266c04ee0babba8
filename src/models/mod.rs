//! Core data models for the payroll ledger engine.
//!
//! This module contains all the domain models used throughout the engine.

mod context;
mod employee;
mod leave;
mod loan;
mod payslip;

pub use context::ActorContext;
pub use employee::{Employee, EmploymentStatus, NewEmployee};
pub use leave::{LeaveRecord, LeaveRequest};
pub use loan::{LoanTransaction, TransactionId, TransactionKind};
pub use payslip::{Payslip, PayslipComputed, PeriodInputs};
