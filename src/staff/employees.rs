//! Employee lookup and registration.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{ConfigLoader, EmployeeRules};
use crate::error::{EngineError, EngineResult};
use crate::models::{ActorContext, Employee, NewEmployee};
use crate::store::{RecordStore, Table};
use crate::validation::validate_employee;

/// Resolves employees for the engines and registers new ones.
#[derive(Debug, Clone)]
pub struct EmployeeDirectory {
    employees: Table,
    rules: EmployeeRules,
    registration: Arc<Mutex<()>>,
}

impl EmployeeDirectory {
    /// Creates a directory over the configured employees collection.
    pub fn new(store: Arc<dyn RecordStore>, config: &ConfigLoader) -> Self {
        Self {
            employees: Table::new(
                store,
                &config.collections().employees,
                &config.config().storage,
            ),
            rules: config.employee_rules().clone(),
            registration: Arc::new(Mutex::new(())),
        }
    }

    /// Resolves an employee by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no employee has the id.
    pub fn find(&self, employee_id: &str) -> EngineResult<Employee> {
        self.employees
            .find("id", employee_id)?
            .ok_or_else(|| EngineError::not_found("employee", employee_id))
    }

    /// Returns every registered employee.
    pub fn all(&self) -> EngineResult<Vec<Employee>> {
        Ok(self
            .employees
            .scan()?
            .into_iter()
            .map(|(_, employee)| employee)
            .collect())
    }

    /// Validates and registers a new employee.
    ///
    /// # Errors
    ///
    /// Returns `Validation` listing every violated rule, or `Conflict` when
    /// the only problems are an ID number or clock-in reference already in use.
    pub fn register(&self, actor: &ActorContext, candidate: NewEmployee) -> EngineResult<Employee> {
        let _guard = self
            .registration
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let existing = self.all()?;
        let report = validate_employee(&candidate, &existing, &self.rules);
        if !report.is_valid() {
            warn!(
                actor = %actor.user,
                violations = ?report.messages(),
                "Employee registration rejected"
            );
            report.into_result()?;
        }

        let employee = match candidate {
            NewEmployee {
                first_name: Some(first_name),
                last_name: Some(last_name),
                id_number: Some(id_number),
                phone: Some(phone),
                clock_in_ref: Some(clock_in_ref),
                hourly_rate: Some(hourly_rate),
                employment_status: Some(employment_status),
            } => Employee {
                id: format!("emp_{}", Uuid::new_v4().simple()),
                first_name: first_name.trim().to_string(),
                last_name: last_name.trim().to_string(),
                id_number: id_number.trim().to_string(),
                phone: phone.trim().to_string(),
                clock_in_ref: clock_in_ref.trim().to_string(),
                hourly_rate,
                employment_status,
            },
            candidate => {
                let missing: Vec<String> = NewEmployee::FIELDS
                    .iter()
                    .filter(|field| candidate.has_field(field) == Some(false))
                    .map(|field| format!("{} is required", field))
                    .collect();
                return Err(EngineError::Validation {
                    violations: missing,
                });
            }
        };

        self.employees.append(&employee)?;
        info!(
            actor = %actor.user,
            employee_id = %employee.id,
            "Registered employee"
        );
        Ok(employee)
    }
}
