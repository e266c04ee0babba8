//! Employee model and related types.
//!
//! Employees are owned outside the ledger and payroll engines; both engines
//! only ever read them.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents the employment arrangement of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    /// Permanent employment. Contributes to UIF.
    Permanent,
    /// Fixed-term contract employment.
    Contract,
    /// Casual employment.
    Casual,
}

impl EmploymentStatus {
    /// Returns the stored name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Contract => "contract",
            Self::Casual => "casual",
        }
    }
}

impl fmt::Display for EmploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentStatus {
    type Err = String;

    /// Parses a status name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permanent" => Ok(Self::Permanent),
            "contract" => Ok(Self::Contract),
            "casual" => Ok(Self::Casual),
            other => Err(format!("unknown employment status '{}'", other)),
        }
    }
}

/// An employee as resolved from the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// National identity number.
    pub id_number: String,
    /// Mobile phone number.
    pub phone: String,
    /// Reference used by the clock-in terminal.
    pub clock_in_ref: String,
    /// Hourly rate of pay.
    pub hourly_rate: Decimal,
    /// The employment arrangement.
    pub employment_status: EmploymentStatus,
}

impl Employee {
    /// Returns true if the employee is permanently employed.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_ledger::models::{Employee, EmploymentStatus};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     first_name: "Thandi".to_string(),
    ///     last_name: "Nkosi".to_string(),
    ///     id_number: "9001015009087".to_string(),
    ///     phone: "0821234567".to_string(),
    ///     clock_in_ref: "CLK-001".to_string(),
    ///     hourly_rate: Decimal::new(100, 0),
    ///     employment_status: EmploymentStatus::Permanent,
    /// };
    /// assert!(employee.is_permanent());
    /// ```
    pub fn is_permanent(&self) -> bool {
        self.employment_status == EmploymentStatus::Permanent
    }
}

/// Input for registering a new employee.
///
/// Every field is optional so that missing values can be reported together
/// by the employee validation rules instead of failing at deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// National identity number.
    #[serde(default)]
    pub id_number: Option<String>,
    /// Mobile phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Reference used by the clock-in terminal.
    #[serde(default)]
    pub clock_in_ref: Option<String>,
    /// Hourly rate of pay.
    #[serde(default)]
    pub hourly_rate: Option<Decimal>,
    /// The employment arrangement.
    #[serde(default)]
    pub employment_status: Option<EmploymentStatus>,
}

impl NewEmployee {
    /// Field names understood by [`NewEmployee::has_field`].
    pub const FIELDS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "id_number",
        "phone",
        "clock_in_ref",
        "hourly_rate",
        "employment_status",
    ];

    /// Returns `Some(true)` when the named field holds a non-blank value,
    /// `Some(false)` when it is missing, and `None` for an unknown field name.
    pub fn has_field(&self, name: &str) -> Option<bool> {
        fn present(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        match name {
            "first_name" => Some(present(&self.first_name)),
            "last_name" => Some(present(&self.last_name)),
            "id_number" => Some(present(&self.id_number)),
            "phone" => Some(present(&self.phone)),
            "clock_in_ref" => Some(present(&self.clock_in_ref)),
            "hourly_rate" => Some(self.hourly_rate.is_some()),
            "employment_status" => Some(self.employment_status.is_some()),
            _ => None,
        }
    }
}
