//! Leave request and record models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Input for recording a period of leave.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// The employee taking leave.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// First day of leave.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Day the employee returns.
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    /// Why leave is taken.
    #[serde(default)]
    pub reason: Option<String>,
}

/// A stored leave record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// Unique identifier.
    pub id: String,
    /// The employee taking leave.
    pub employee_id: String,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Day the employee returns.
    pub return_date: NaiveDate,
    /// Why leave is taken.
    pub reason: String,
    /// Days of leave, counting both endpoints.
    pub total_days: i64,
    /// Who recorded the leave.
    pub recorded_by: String,
}
