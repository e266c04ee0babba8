//! Chronological ordering and running balance arithmetic.
//!
//! These are the pure pieces of the ledger: how transactions are ordered and
//! how balances are derived from that order. The engine applies them to
//! stored rows.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::LoanTransaction;

/// The balance immediately before and after one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancePair {
    /// Balance before the transaction.
    pub before: Decimal,
    /// Balance after the transaction.
    pub after: Decimal,
}

/// Sorts `(row index, transaction)` pairs into ledger order: by transaction
/// date, then by recording time, then by row index.
///
/// The sort is stable, so rows with identical keys keep insertion order.
pub fn order_chronologically(entries: &mut [(usize, LoanTransaction)]) {
    entries.sort_by(|(row_a, a), (row_b, b)| a.chronological_cmp(b).then(row_a.cmp(row_b)));
}

/// Derives the balance pair of every transaction, walking them in the given
/// order from a zero balance.
///
/// The sign of each amount is taken from the transaction kind. Returns `None`
/// if any running balance cannot be represented.
///
/// # Example
///
/// ```
/// use payroll_ledger::ledger::running_balances;
/// use payroll_ledger::models::{LoanTransaction, TransactionId, TransactionKind};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
///
/// let entry = |kind, amount| LoanTransaction {
///     id: TransactionId::new(),
///     employee_id: "emp_001".to_string(),
///     kind,
///     amount,
///     transaction_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
///     recorded_at: Utc::now(),
///     recorded_by: "clerk".to_string(),
///     balance_before: Decimal::ZERO,
///     balance_after: Decimal::ZERO,
/// };
///
/// let pairs = running_balances([
///     &entry(TransactionKind::Disbursement, Decimal::new(1000, 0)),
///     &entry(TransactionKind::Repayment, Decimal::new(-250, 0)),
/// ])
/// .unwrap();
/// assert_eq!(pairs[1].before, Decimal::new(1000, 0));
/// assert_eq!(pairs[1].after, Decimal::new(750, 0));
/// ```
pub fn running_balances<'a, I>(transactions: I) -> Option<Vec<BalancePair>>
where
    I: IntoIterator<Item = &'a LoanTransaction>,
{
    let mut balance = Decimal::ZERO;
    transactions
        .into_iter()
        .map(|tx| {
            let before = balance;
            balance = before.checked_add(tx.kind.signed(tx.amount))?;
            Some(BalancePair {
                before,
                after: balance,
            })
        })
        .collect()
}

/// Checks the stored balances of a chronologically ordered history.
///
/// Returns the index of the first transaction whose stored pair differs from
/// the derived one, or `None` if the whole history is consistent. A
/// transaction whose running balance cannot be represented is never
/// consistent.
pub fn first_inconsistency(history: &[LoanTransaction]) -> Option<usize> {
    let mut balance = Decimal::ZERO;
    for (index, tx) in history.iter().enumerate() {
        let Some(after) = balance.checked_add(tx.kind.signed(tx.amount)) else {
            return Some(index);
        };
        if tx.balance_before != balance || tx.balance_after != after {
            return Some(index);
        }
        balance = after;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TransactionId, TransactionKind};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn tx(day: u32, recorded_secs: i64, kind: TransactionKind, amount: i64) -> LoanTransaction {
        LoanTransaction {
            id: TransactionId::new(),
            employee_id: "emp_001".to_string(),
            kind,
            amount: kind.signed(Decimal::new(amount, 0)),
            transaction_date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            recorded_at: Utc.timestamp_opt(1_767_225_600, 0).unwrap() + Duration::seconds(recorded_secs),
            recorded_by: "clerk".to_string(),
            balance_before: Decimal::ZERO,
            balance_after: Decimal::ZERO,
        }
    }

    #[test]
    fn test_order_by_date_then_recording_time() {
        let mut entries = vec![
            (0, tx(2, 0, TransactionKind::Disbursement, 1000)),
            (1, tx(1, 10, TransactionKind::Disbursement, 500)),
            (2, tx(1, 5, TransactionKind::Repayment, 100)),
        ];
        order_chronologically(&mut entries);
        let rows: Vec<usize> = entries.iter().map(|(row, _)| *row).collect();
        assert_eq!(rows, vec![2, 1, 0]);
    }

    #[test]
    fn test_identical_keys_keep_row_order() {
        let a = tx(1, 0, TransactionKind::Disbursement, 10);
        let mut b = a.clone();
        b.id = TransactionId::new();
        let mut entries = vec![(1, b), (0, a)];
        order_chronologically(&mut entries);
        assert_eq!(entries[0].0, 0);
    }

    #[test]
    fn test_running_balances_start_at_zero() {
        let history = vec![
            tx(1, 0, TransactionKind::Disbursement, 500),
            tx(2, 0, TransactionKind::Disbursement, 1000),
            tx(3, 0, TransactionKind::Repayment, 300),
        ];
        let pairs = running_balances(&history).unwrap();
        assert_eq!(pairs[0].before, Decimal::ZERO);
        assert_eq!(pairs[0].after, Decimal::new(500, 0));
        assert_eq!(pairs[1].after, Decimal::new(1500, 0));
        assert_eq!(pairs[2].before, Decimal::new(1500, 0));
        assert_eq!(pairs[2].after, Decimal::new(1200, 0));
    }

    #[test]
    fn test_running_balances_use_kind_for_sign() {
        let mut repayment = tx(1, 0, TransactionKind::Repayment, 100);
        repayment.amount = Decimal::new(100, 0);
        let pairs = running_balances([&repayment]).unwrap();
        assert_eq!(pairs[0].after, Decimal::new(-100, 0));
    }

    #[test]
    fn test_first_inconsistency() {
        let mut history = vec![
            tx(1, 0, TransactionKind::Disbursement, 500),
            tx(2, 0, TransactionKind::Disbursement, 1000),
        ];
        let pairs = running_balances(&history).unwrap();
        for (tx, pair) in history.iter_mut().zip(&pairs) {
            tx.balance_before = pair.before;
            tx.balance_after = pair.after;
        }
        assert_eq!(first_inconsistency(&history), None);

        history[1].balance_after = Decimal::new(1000, 0);
        assert_eq!(first_inconsistency(&history), Some(1));
    }

    #[test]
    fn test_unrepresentable_balance_is_none() {
        let history = vec![
            tx(1, 0, TransactionKind::Disbursement, 1),
            tx(2, 0, TransactionKind::Disbursement, 1),
        ];
        let mut huge = history.clone();
        huge[0].amount = Decimal::MAX;
        huge[0].balance_after = Decimal::MAX;
        huge[1].amount = Decimal::MAX;

        assert!(running_balances(&history).is_some());
        assert!(running_balances(&huge).is_none());
        assert_eq!(first_inconsistency(&huge), Some(1));
    }
}
