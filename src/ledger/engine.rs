//! The loan ledger engine.
//!
//! Transactions are appended to the loans collection and never removed.
//! Their `balance_before`/`balance_after` fields are rewritten only by
//! [`LedgerEngine::recompute`], which re-derives them from the employee's
//! full history in chronological order.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult, StoreError, StoreResult};
use crate::models::{ActorContext, LoanTransaction, TransactionId, TransactionKind};
use crate::staff::EmployeeDirectory;
use crate::store::{BALANCE_AFTER, BALANCE_BEFORE, EMPLOYEE_ID, RecordStore, Table, decimal_value};
use crate::validation::validate_loan;

use super::balance::{first_inconsistency, order_chronologically, running_balances};
use super::locks::EmployeeLocks;

/// The outcome of one recomputation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecomputeSummary {
    /// The employee whose ledger was recomputed.
    pub employee_id: String,
    /// Number of transactions walked.
    pub transactions: usize,
    /// Number of transactions whose stored balances were rewritten.
    pub rewritten: usize,
}

/// Records loan transactions and keeps their running balances consistent.
///
/// Cloning is cheap; clones share the same per-employee locks.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use payroll_ledger::config::ConfigLoader;
/// use payroll_ledger::ledger::LedgerEngine;
/// use payroll_ledger::staff::EmployeeDirectory;
/// use payroll_ledger::store::{InMemoryStore, RecordStore};
/// use rust_decimal::Decimal;
///
/// let store: Arc<dyn RecordStore> = Arc::new(InMemoryStore::new());
/// let config = ConfigLoader::default();
/// let ledger = LedgerEngine::new(
///     Arc::clone(&store),
///     &config,
///     EmployeeDirectory::new(store, &config),
/// );
/// assert_eq!(ledger.current_balance("emp_001").unwrap(), Decimal::ZERO);
/// ```
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    loans: Table,
    employees: EmployeeDirectory,
    locks: Arc<EmployeeLocks>,
}

impl LedgerEngine {
    /// Creates a ledger over the configured loans collection.
    pub fn new(
        store: Arc<dyn RecordStore>,
        config: &ConfigLoader,
        employees: EmployeeDirectory,
    ) -> Self {
        Self {
            loans: Table::new(store, &config.collections().loans, &config.config().storage),
            employees,
            locks: Arc::new(EmployeeLocks::new()),
        }
    }

    /// Records a disbursement or repayment for an employee.
    ///
    /// `amount` must be positive; its sign is derived from `kind`. The
    /// transaction is appended with a provisional balance taken from the
    /// current snapshot, then the employee's whole ledger is recomputed so
    /// that a backdated transaction shifts every later balance.
    ///
    /// # Errors
    ///
    /// - `Validation` if the employee reference is blank, the amount is not
    ///   positive, the date is missing, or the amount would take a running
    ///   balance out of range. Nothing is written.
    /// - `NotFound` if the employee does not exist. Nothing is written.
    /// - `Store` if the append fails. Nothing is written.
    /// - `StaleBalances` if the append succeeded but recomputation failed.
    ///   The transaction stays recorded; calling [`LedgerEngine::recompute`]
    ///   for the employee later restores consistent balances.
    pub fn record_transaction(
        &self,
        actor: &ActorContext,
        employee_id: &str,
        kind: TransactionKind,
        amount: Decimal,
        transaction_date: Option<NaiveDate>,
    ) -> EngineResult<TransactionId> {
        let transaction_date = self.admit(actor, employee_id, amount, transaction_date)?;
        self.locks.with_lock(employee_id, || {
            self.append_locked(actor, employee_id, kind, amount, transaction_date)
        })
    }

    /// Returns the employee's outstanding balance, or zero if they have no
    /// transactions.
    ///
    /// The figure is the running total of the chronological history, which
    /// equals the last transaction's `balance_after` once recomputed. A stored
    /// value that disagrees is logged as a stale ledger.
    pub fn current_balance(&self, employee_id: &str) -> EngineResult<Decimal> {
        let history = self.history(employee_id)?;
        let balance = self.closing_balance(employee_id, &history)?;

        if let Some(index) = first_inconsistency(&history) {
            warn!(
                employee_id = %employee_id,
                transaction_id = %history[index].id,
                "Stored loan balances are stale; recompute pending"
            );
        }
        Ok(balance)
    }

    /// Returns the employee's transactions in ledger order: by transaction
    /// date, then by recording time.
    pub fn history(&self, employee_id: &str) -> EngineResult<Vec<LoanTransaction>> {
        Ok(self
            .load(employee_id)?
            .into_iter()
            .map(|(_, tx)| tx)
            .collect())
    }

    /// Re-derives and rewrites every stored balance of the employee.
    ///
    /// Idempotent: a second run over an unchanged ledger rewrites nothing.
    pub fn recompute(&self, employee_id: &str) -> EngineResult<RecomputeSummary> {
        let summary = self
            .locks
            .with_lock(employee_id, || self.recompute_locked(employee_id))?;
        Ok(summary)
    }

    /// Recomputes the ledger of every employee that has transactions.
    ///
    /// Stops at the first failure; the passes already completed stay applied.
    pub fn repair_all(&self) -> EngineResult<Vec<RecomputeSummary>> {
        let employee_ids: BTreeSet<String> = self
            .loans
            .scan::<LoanTransaction>()?
            .into_iter()
            .map(|(_, tx)| tx.employee_id)
            .collect();

        let mut summaries = Vec::with_capacity(employee_ids.len());
        for employee_id in employee_ids {
            summaries.push(self.recompute(&employee_id)?);
        }
        let rewritten: usize = summaries.iter().map(|s| s.rewritten).sum();
        info!(
            employees = summaries.len(),
            rewritten = rewritten,
            "Repaired loan ledger"
        );
        Ok(summaries)
    }

    /// Returns the outstanding balance of every employee with transactions.
    pub fn outstanding_balances(&self) -> EngineResult<BTreeMap<String, Decimal>> {
        let mut balances: BTreeMap<String, Decimal> = BTreeMap::new();
        for (_, tx) in self.loans.scan::<LoanTransaction>()? {
            let balance = balances.entry(tx.employee_id.clone()).or_insert(Decimal::ZERO);
            *balance = balance
                .checked_add(tx.kind.signed(tx.amount))
                .ok_or_else(|| self.overflow(&tx.employee_id))?;
        }
        Ok(balances)
    }

    /// Runs `f` while holding the employee's ledger lock.
    ///
    /// Reads and writes made through the [`LockedLedger`] cannot interleave
    /// with any other write to the same employee's ledger.
    pub(crate) fn with_employee<T>(
        &self,
        employee_id: &str,
        f: impl FnOnce(&LockedLedger<'_>) -> T,
    ) -> T {
        self.locks.with_lock(employee_id, || {
            f(&LockedLedger {
                engine: self,
                employee_id,
            })
        })
    }

    /// Validates a transaction request and resolves its employee. Returns
    /// the transaction date.
    fn admit(
        &self,
        actor: &ActorContext,
        employee_id: &str,
        amount: Decimal,
        transaction_date: Option<NaiveDate>,
    ) -> EngineResult<NaiveDate> {
        let report = validate_loan(employee_id, amount, transaction_date);
        let (true, Some(transaction_date)) = (report.is_valid(), transaction_date) else {
            warn!(
                actor = %actor.user,
                employee_id = %employee_id,
                violations = ?report.messages(),
                "Loan transaction rejected"
            );
            return Err(EngineError::Validation {
                violations: report.messages(),
            });
        };

        self.employees.find(employee_id)?;
        Ok(transaction_date)
    }

    /// Appends an admitted transaction and recomputes. The caller must hold
    /// the employee's lock.
    fn append_locked(
        &self,
        actor: &ActorContext,
        employee_id: &str,
        kind: TransactionKind,
        amount: Decimal,
        transaction_date: NaiveDate,
    ) -> EngineResult<TransactionId> {
        let history = self.load(employee_id)?;
        let balance_before = self.closing_balance(employee_id, history.iter().map(|(_, tx)| tx))?;
        let signed = kind.signed(amount);

        let mut transaction = LoanTransaction {
            id: TransactionId::new(),
            employee_id: employee_id.to_string(),
            kind,
            amount: signed,
            transaction_date,
            recorded_at: next_recorded_at(&history),
            recorded_by: actor.user.clone(),
            balance_before,
            balance_after: balance_before,
        };

        let mut projected: Vec<&LoanTransaction> = history.iter().map(|(_, tx)| tx).collect();
        projected.push(&transaction);
        projected.sort_by(|a, b| a.chronological_cmp(b));
        let balance_after = running_balances(projected).and_then(|_| balance_before.checked_add(signed));
        let Some(balance_after) = balance_after else {
            warn!(
                actor = %actor.user,
                employee_id = %employee_id,
                amount = %signed,
                "Loan transaction rejected: balance out of range"
            );
            return Err(EngineError::Validation {
                violations: vec!["amount would take the loan balance out of range".to_string()],
            });
        };
        transaction.balance_after = balance_after;

        self.loans.append(&transaction)?;
        info!(
            actor = %actor.user,
            employee_id = %employee_id,
            transaction_id = %transaction.id,
            kind = %kind,
            amount = %signed,
            transaction_date = %transaction_date,
            "Recorded loan transaction"
        );

        if let Err(source) = self.recompute_locked(employee_id) {
            warn!(
                employee_id = %employee_id,
                transaction_id = %transaction.id,
                error = %source,
                "Loan balances left stale after append; recompute must be retried"
            );
            return Err(EngineError::StaleBalances {
                employee_id: employee_id.to_string(),
                transaction_id: transaction.id,
                source,
            });
        }
        Ok(transaction.id)
    }

    /// Loads the employee's transactions with their row indices, in ledger
    /// order.
    fn load(&self, employee_id: &str) -> StoreResult<Vec<(usize, LoanTransaction)>> {
        let mut entries = self.loans.scan_where(EMPLOYEE_ID, employee_id)?;
        order_chronologically(&mut entries);
        Ok(entries)
    }

    /// The balance after the last of `history`, which must be in ledger order.
    fn closing_balance<'a>(
        &self,
        employee_id: &str,
        history: impl IntoIterator<Item = &'a LoanTransaction>,
    ) -> StoreResult<Decimal> {
        let pairs = running_balances(history).ok_or_else(|| self.overflow(employee_id))?;
        Ok(pairs.last().map_or(Decimal::ZERO, |pair| pair.after))
    }

    fn overflow(&self, employee_id: &str) -> StoreError {
        StoreError::BalanceOverflow {
            collection: self.loans.name().to_string(),
            employee_id: employee_id.to_string(),
        }
    }

    /// Recomputation proper. The caller must hold the employee's lock.
    fn recompute_locked(&self, employee_id: &str) -> StoreResult<RecomputeSummary> {
        let entries = self.load(employee_id)?;
        let pairs = running_balances(entries.iter().map(|(_, tx)| tx))
            .ok_or_else(|| self.overflow(employee_id))?;

        let mut rewritten = 0;
        for ((row, tx), pair) in entries.iter().zip(&pairs) {
            if tx.balance_before == pair.before && tx.balance_after == pair.after {
                continue;
            }
            self.loans
                .update(*row, BALANCE_BEFORE, decimal_value(pair.before))?;
            self.loans
                .update(*row, BALANCE_AFTER, decimal_value(pair.after))?;
            rewritten += 1;
        }

        let summary = RecomputeSummary {
            employee_id: employee_id.to_string(),
            transactions: entries.len(),
            rewritten,
        };
        debug!(
            employee_id = %employee_id,
            transactions = summary.transactions,
            rewritten = summary.rewritten,
            "Recomputed loan balances"
        );
        Ok(summary)
    }
}

/// One employee's ledger, borrowed while that employee's lock is held.
pub(crate) struct LockedLedger<'a> {
    engine: &'a LedgerEngine,
    employee_id: &'a str,
}

impl LockedLedger<'_> {
    /// The employee's outstanding balance.
    pub(crate) fn balance(&self) -> EngineResult<Decimal> {
        let history = self.engine.load(self.employee_id)?;
        Ok(self
            .engine
            .closing_balance(self.employee_id, history.iter().map(|(_, tx)| tx))?)
    }

    /// Same as [`LedgerEngine::record_transaction`], without re-taking the lock.
    pub(crate) fn record(
        &self,
        actor: &ActorContext,
        kind: TransactionKind,
        amount: Decimal,
        transaction_date: Option<NaiveDate>,
    ) -> EngineResult<TransactionId> {
        let transaction_date = self
            .engine
            .admit(actor, self.employee_id, amount, transaction_date)?;
        self.engine
            .append_locked(actor, self.employee_id, kind, amount, transaction_date)
    }
}

/// Recording time for a new transaction: now, but strictly after every
/// transaction already recorded for the employee, so same-day entries always
/// apply in the order they were entered.
fn next_recorded_at(history: &[(usize, LoanTransaction)]) -> DateTime<Utc> {
    let now = Utc::now();
    match history.iter().map(|(_, tx)| tx.recorded_at).max() {
        Some(latest) if latest >= now => latest + Duration::nanoseconds(1),
        _ => now,
    }
}
