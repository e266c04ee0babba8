//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::store::check_layouts;

use super::types::{CollectionNames, EmployeeRules, EngineConfig};

/// File name read from the configuration directory.
pub const CONFIG_FILE_NAME: &str = "engine.yaml";

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// └── engine.yaml   # Collections, numbering, employee rules, layouts
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Loans live in: {}", loader.collections().loans);
/// # Ok::<(), payroll_ledger::error::EngineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from `engine.yaml` in the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML, an invalid phone pattern, or a
    ///   collection layout missing a field its records need
    ///   (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let file_path = path.as_ref().join(CONFIG_FILE_NAME);
        let config: EngineConfig = Self::load_yaml(&file_path)?;
        check_layouts(&config.collections, &config.storage).map_err(|problems| {
            EngineError::ConfigParseError {
                path: file_path.display().to_string(),
                message: problems.join("; "),
            }
        })?;
        info!(path = %file_path.display(), "Loaded engine configuration");
        Ok(Self { config })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the record store collection names.
    pub fn collections(&self) -> &CollectionNames {
        &self.config.collections
    }

    /// Returns the employee registration rules.
    pub fn employee_rules(&self) -> &EmployeeRules {
        &self.config.employees
    }

    /// Returns the record number given to the first payslip.
    pub fn record_number_floor(&self) -> u64 {
        self.config.payslips.record_number_floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnmappedFieldPolicy;

    fn config_path() -> &'static str {
        "./config"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.collections().employees, "Employees");
        assert_eq!(loader.collections().loans, "Loans");
        assert_eq!(loader.record_number_floor(), 1);
        assert_eq!(loader.employee_rules().id_number_length, 13);
        assert_eq!(
            loader.config().storage.unmapped_fields,
            UnmappedFieldPolicy::Reject
        );
    }

    #[test]
    fn test_loaded_phone_pattern_matches_mobile_numbers() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let pattern = &loader.employee_rules().phone_pattern;
        assert!(pattern.is_match("0831234567"));
        assert!(!pattern.is_match("0111234567"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_load_invalid_yaml_returns_parse_error() {
        let dir = std::env::temp_dir().join(format!("payroll-ledger-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE_NAME), "payslips: [not, a, map]").unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).unwrap();

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => {
                assert!(path.contains("engine.yaml"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_layout_missing_a_record_field_is_rejected() {
        let dir = std::env::temp_dir().join(format!("payroll-ledger-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let yaml = "\
storage:
  unmapped_fields: blank
  layouts:
    Loans: [id, employee_id, kind, amount, transaction_date, recorded_at, balance_before, balance_after, notes]
";
        fs::write(dir.join(CONFIG_FILE_NAME), yaml).unwrap();

        let result = ConfigLoader::load(&dir);
        fs::remove_dir_all(&dir).unwrap();

        match result {
            Err(EngineError::ConfigParseError { message, .. }) => assert_eq!(
                message,
                "layout of collection 'Loans' has no header for field 'recorded_by'"
            ),
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_default_loader_matches_default_config() {
        let loader = ConfigLoader::default();
        assert_eq!(loader.collections().payslips, "Payslips");
        assert_eq!(loader.record_number_floor(), 1);
    }
}
