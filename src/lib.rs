//! Employee Loan Ledger and Payroll Engine
//!
//! This crate keeps an append-only ledger of employee loan disbursements and
//! repayments with consistent running balances, and calculates weekly payslips
//! whose loan deductions and new loans flow into that ledger. All state lives
//! behind the [`store::RecordStore`] boundary.

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod models;
pub mod payroll;
pub mod staff;
pub mod store;
pub mod validation;

pub use engine::PayrollLedger;
pub use error::{EngineError, EngineResult, ErrorKind};
