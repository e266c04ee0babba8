//! Employee loan ledger.
//!
//! An append-only history of disbursements and repayments per employee,
//! each carrying the balance immediately before and after it. The
//! [`LedgerEngine`] records transactions and keeps those balances consistent
//! with chronological order, including when transactions arrive backdated.

mod balance;
mod engine;
mod locks;

pub use balance::{BalancePair, first_inconsistency, order_chronologically, running_balances};
pub use engine::{LedgerEngine, RecomputeSummary};
pub(crate) use engine::LockedLedger;
pub use locks::EmployeeLocks;
