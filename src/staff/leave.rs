//! Leave recording.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::{EngineError, EngineResult};
use crate::models::{ActorContext, LeaveRecord, LeaveRequest};
use crate::store::{EMPLOYEE_ID, RecordStore, Table};
use crate::validation::{leave_total_days, validate_leave};

use super::EmployeeDirectory;

/// Records leave taken by employees.
#[derive(Debug, Clone)]
pub struct LeaveRegister {
    leave: Table,
    employees: EmployeeDirectory,
}

impl LeaveRegister {
    /// Creates a register over the configured leave collection.
    pub fn new(store: Arc<dyn RecordStore>, config: &ConfigLoader, employees: EmployeeDirectory) -> Self {
        Self {
            leave: Table::new(store, &config.collections().leave, &config.config().storage),
            employees,
        }
    }

    /// Validates and records a leave request.
    ///
    /// # Errors
    ///
    /// Returns `Validation` listing every violated rule, or `NotFound` if the
    /// employee does not exist.
    pub fn record(&self, actor: &ActorContext, request: LeaveRequest) -> EngineResult<LeaveRecord> {
        let report = validate_leave(&request);
        let LeaveRequest {
            employee_id: Some(employee_id),
            start_date: Some(start_date),
            return_date: Some(return_date),
            reason: Some(reason),
        } = request
        else {
            warn!(actor = %actor.user, violations = ?report.messages(), "Leave request rejected");
            return Err(EngineError::Validation {
                violations: report.messages(),
            });
        };
        if !report.is_valid() {
            warn!(actor = %actor.user, violations = ?report.messages(), "Leave request rejected");
            report.into_result()?;
        }

        self.employees.find(&employee_id)?;

        let record = LeaveRecord {
            id: format!("leave_{}", Uuid::new_v4().simple()),
            employee_id,
            start_date,
            return_date,
            reason: reason.trim().to_string(),
            total_days: leave_total_days(start_date, return_date),
            recorded_by: actor.user.clone(),
        };
        self.leave.append(&record)?;
        info!(
            actor = %actor.user,
            employee_id = %record.employee_id,
            total_days = record.total_days,
            "Recorded leave"
        );
        Ok(record)
    }

    /// Returns every leave record of an employee, in recording order.
    pub fn for_employee(&self, employee_id: &str) -> EngineResult<Vec<LeaveRecord>> {
        Ok(self
            .leave
            .scan_where(EMPLOYEE_ID, employee_id)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }
}
