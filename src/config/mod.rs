//! Configuration loading and management for the payroll ledger engine.
//!
//! This module loads the engine configuration from a YAML file: record
//! store collection names, payslip numbering, employee registration rules,
//! and record store layouts.
//!
//! # Example
//!
//! ```no_run
//! use payroll_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("First payslip number: {}", config.record_number_floor());
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_FILE_NAME, ConfigLoader};
pub use types::{
    CollectionNames, DEFAULT_ID_NUMBER_LENGTH, DEFAULT_PHONE_PATTERN, EmployeeRules, EngineConfig,
    PayslipSettings, StorageSettings, UnmappedFieldPolicy,
};
