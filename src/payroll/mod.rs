//! Payroll calculation and payslip recording.
//!
//! [`calculate_payslip`] is the pure field derivation; [`PayrollEngine`]
//! validates period inputs, stores payslips and records their loan entries in
//! the ledger.

mod calculation;
mod engine;

pub use calculation::{
    MINUTES_PER_HOUR, OVERTIME_MULTIPLIER, UIF_RATE, calculate_payslip, round_money,
};
pub use engine::PayrollEngine;
