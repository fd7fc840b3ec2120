//! Configuration validation.
//!
//! Validation collects every problem instead of stopping at the first one.

use super::types::{AppConfig, CatalogConfig, OutputConfig, PredicateConfig};

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.predicate.validate());
        errors.extend(self.catalog.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for PredicateConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let [first, second] = &self.licenses;

        for license in &self.licenses {
            if license.trim().is_empty() {
                errors.push(ConfigError::new("predicate.licenses", "License must not be empty"));
            }
        }
        if !first.trim().is_empty() && first.trim().eq_ignore_ascii_case(second.trim()) {
            errors.push(ConfigError::new(
                "predicate.licenses",
                format!("The two licenses must differ, both are '{first}'"),
            ));
        }

        if self.copyright_contains.is_empty() {
            errors.push(ConfigError::new(
                "predicate.copyright_contains",
                "Copyright substring must not be empty",
            ));
        }
        errors
    }
}

impl Validatable for CatalogConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(path) = &self.license_list {
            if !path.is_file() {
                errors.push(ConfigError::new(
                    "catalog.license_list",
                    format!("File not found: {}", path.display()),
                ));
            }
        }
        if let Some(path) = &self.exception_list {
            if !path.is_file() {
                errors.push(ConfigError::new(
                    "catalog.exception_list",
                    format!("File not found: {}", path.display()),
                ));
            }
            if self.license_list.is_none() {
                errors.push(ConfigError::new(
                    "catalog.exception_list",
                    "An exception list requires catalog.license_list",
                ));
            }
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if let Some(file) = &self.file {
            if let Some(parent) = file.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_same_license_twice() {
        let config = AppConfig::builder().licenses("MIT", "mit").build();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "predicate.licenses");
    }

    #[test]
    fn test_all_errors_collected() {
        let config = AppConfig::builder()
            .licenses("", "MIT")
            .copyright_contains("")
            .license_list(Some(PathBuf::from("/nonexistent/licenses.json")))
            .output_file(Some(PathBuf::from("/nonexistent/dir/out.json")))
            .build();

        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "predicate.licenses",
                "predicate.copyright_contains",
                "catalog.license_list",
                "output.file",
            ]
        );
    }

    #[test]
    fn test_exception_list_needs_license_list() {
        let tmp = tempfile::NamedTempFile::new().expect("temp file");
        let config = AppConfig::builder()
            .exception_list(Some(tmp.path().to_path_buf()))
            .build();
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("license_list"));
    }

    #[test]
    fn test_relative_output_file_is_valid() {
        let config = AppConfig::builder()
            .output_file(Some(PathBuf::from("matches.txt")))
            .build();
        assert!(config.is_valid());
    }
}
