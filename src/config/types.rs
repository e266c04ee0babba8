//! Configuration types for the payroll ledger engine.
//!
//! These structures are deserialized from `engine.yaml`. Every section has
//! defaults, so a partial file (or none at all, via [`EngineConfig::default`])
//! yields a working configuration.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Deserializer};

/// Default regional mobile number pattern (South African numbers).
pub const DEFAULT_PHONE_PATTERN: &str = r"^(\+27|0)[6-8][0-9]{8}$";

/// Default length of a national identity number.
pub const DEFAULT_ID_NUMBER_LENGTH: usize = 13;

/// Names of the record store collections used by the engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionNames {
    /// Collection holding employees.
    pub employees: String,
    /// Collection holding loan transactions.
    pub loans: String,
    /// Collection holding payslips.
    pub payslips: String,
    /// Collection holding leave records.
    pub leave: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            employees: "Employees".to_string(),
            loans: "Loans".to_string(),
            payslips: "Payslips".to_string(),
            leave: "Leave".to_string(),
        }
    }
}

/// Payslip numbering settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayslipSettings {
    /// Record number given to the first payslip when none exist.
    pub record_number_floor: u64,
}

impl Default for PayslipSettings {
    fn default() -> Self {
        Self {
            record_number_floor: 1,
        }
    }
}

/// Rules applied when registering employees.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmployeeRules {
    /// Fields that must be present on a new employee.
    pub required_fields: Vec<String>,
    /// Exact number of digits in a national identity number.
    pub id_number_length: usize,
    /// Pattern a mobile phone number must match.
    #[serde(deserialize_with = "deserialize_regex")]
    pub phone_pattern: Regex,
}

impl Default for EmployeeRules {
    fn default() -> Self {
        Self {
            required_fields: [
                "first_name",
                "last_name",
                "id_number",
                "phone",
                "clock_in_ref",
                "hourly_rate",
                "employment_status",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            id_number_length: DEFAULT_ID_NUMBER_LENGTH,
            phone_pattern: Regex::new(DEFAULT_PHONE_PATTERN)
                .expect("default phone pattern is a valid regex"),
        }
    }
}

fn deserialize_regex<'de, D>(deserializer: D) -> Result<Regex, D::Error>
where
    D: Deserializer<'de>,
{
    let pattern = String::deserialize(deserializer)?;
    Regex::new(&pattern).map_err(serde::de::Error::custom)
}

/// What to do with fields that a collection layout and a record disagree on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedFieldPolicy {
    /// Fail the write.
    #[default]
    Reject,
    /// Write unknown headers as null. Record fields with no header still fail.
    Blank,
}

/// Record store layout settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Policy for layout/record mismatches.
    pub unmapped_fields: UnmappedFieldPolicy,
    /// Header list per collection name. Collections without an entry use
    /// the record's own fields.
    pub layouts: HashMap<String, Vec<String>>,
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Record store collection names.
    pub collections: CollectionNames,
    /// Payslip numbering.
    pub payslips: PayslipSettings,
    /// Employee registration rules.
    pub employees: EmployeeRules,
    /// Record store layouts.
    pub storage: StorageSettings,
}
