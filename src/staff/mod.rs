//! Employee and leave records.
//!
//! Employees are owned here, not by the ledger or payroll engines: both
//! engines resolve employees through [`EmployeeDirectory`] and never modify
//! them.

mod employees;
mod leave;

pub use employees::EmployeeDirectory;
pub use leave::LeaveRegister;
