//! Loan transaction model.
//!
//! A loan transaction is one entry in an employee's loan ledger. Its
//! `balance_before`/`balance_after` pair is a cache that only the ledger's
//! recomputation pass may rewrite.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier of a loan transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub Uuid);

impl TransactionId {
    /// Creates a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Whether a transaction lends money to the employee or pays it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money lent to the employee. Increases the balance.
    Disbursement,
    /// Money paid back by the employee. Decreases the balance.
    Repayment,
}

impl TransactionKind {
    /// Applies the sign convention of this kind to a positive amount.
    ///
    /// ```
    /// use payroll_ledger::models::TransactionKind;
    /// use rust_decimal::Decimal;
    ///
    /// let amount = Decimal::new(250, 0);
    /// assert_eq!(TransactionKind::Disbursement.signed(amount), amount);
    /// assert_eq!(TransactionKind::Repayment.signed(amount), -amount);
    /// ```
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Self::Disbursement => amount.abs(),
            Self::Repayment => -amount.abs(),
        }
    }

    /// Returns the stored name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disbursement => "disbursement",
            Self::Repayment => "repayment",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disbursement" => Ok(Self::Disbursement),
            "repayment" => Ok(Self::Repayment),
            other => Err(format!("unknown transaction kind '{}'", other)),
        }
    }
}

/// A single entry in an employee's loan ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTransaction {
    /// Unique identifier, assigned at creation.
    pub id: TransactionId,
    /// The employee the loan belongs to.
    pub employee_id: String,
    /// Disbursement or repayment.
    pub kind: TransactionKind,
    /// Signed amount: positive for disbursements, negative for repayments.
    pub amount: Decimal,
    /// The business date the transaction takes effect.
    pub transaction_date: NaiveDate,
    /// When the transaction was recorded. Orders same-day transactions.
    pub recorded_at: DateTime<Utc>,
    /// Who recorded the transaction.
    pub recorded_by: String,
    /// Balance immediately before this transaction.
    pub balance_before: Decimal,
    /// Balance immediately after this transaction.
    pub balance_after: Decimal,
}

impl LoanTransaction {
    /// Compares two transactions by ledger order: transaction date first,
    /// then recording time.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.transaction_date
            .cmp(&other.transaction_date)
            .then_with(|| self.recorded_at.cmp(&other.recorded_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn transaction(date: NaiveDate, recorded_secs: i64) -> LoanTransaction {
        LoanTransaction {
            id: TransactionId::new(),
            employee_id: "emp_001".to_string(),
            kind: TransactionKind::Disbursement,
            amount: Decimal::new(100, 0),
            transaction_date: date,
            recorded_at: Utc.timestamp_opt(recorded_secs, 0).unwrap(),
            recorded_by: "clerk".to_string(),
            balance_before: Decimal::ZERO,
            balance_after: Decimal::new(100, 0),
        }
    }

    #[test]
    fn test_signed_ignores_caller_sign() {
        let amount = Decimal::new(-40, 0);
        assert_eq!(
            TransactionKind::Disbursement.signed(amount),
            Decimal::new(40, 0)
        );
        assert_eq!(
            TransactionKind::Repayment.signed(amount),
            Decimal::new(-40, 0)
        );
    }

    #[test]
    fn test_chronological_cmp_orders_by_date_first() {
        let earlier = transaction(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), 500);
        let later = transaction(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(), 100);
        assert_eq!(earlier.chronological_cmp(&later), Ordering::Less);
    }

    #[test]
    fn test_chronological_cmp_breaks_ties_by_recording_time() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let first = transaction(date, 100);
        let second = transaction(date, 200);
        assert_eq!(first.chronological_cmp(&second), Ordering::Less);
        assert_eq!(second.chronological_cmp(&first), Ordering::Greater);
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [TransactionKind::Disbursement, TransactionKind::Repayment] {
            assert_eq!(kind.to_string().parse::<TransactionKind>(), Ok(kind));
        }
        assert_eq!(
            "Repayment".parse::<TransactionKind>(),
            Ok(TransactionKind::Repayment)
        );
    }

    #[test]
    fn test_transaction_id_parses_display_form() {
        let id = TransactionId::new();
        assert_eq!(id.to_string().parse::<TransactionId>().unwrap(), id);
        assert!("not-a-uuid".parse::<TransactionId>().is_err());
    }
}
