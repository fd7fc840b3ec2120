//! Configuration types for dual-license-finder.

use super::defaults::{DEFAULT_COPYRIGHT_SUBSTRING, DEFAULT_LICENSES};
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments override values loaded from a config file
/// (see [`AppConfig::apply_overrides`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Which files are reported
    pub predicate: PredicateConfig,
    /// License list used to resolve identifiers
    pub catalog: CatalogConfig,
    /// Output configuration (format, file)
    pub output: OutputConfig,
    /// Behavior flags
    pub behavior: BehaviorConfig,
}

impl AppConfig {
    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the two required licenses.
    pub fn licenses(mut self, first: impl Into<String>, second: impl Into<String>) -> Self {
        self.config.predicate.licenses = [first.into(), second.into()];
        self
    }

    /// Set the required copyright substring.
    pub fn copyright_contains(mut self, substring: impl Into<String>) -> Self {
        self.config.predicate.copyright_contains = substring.into();
        self
    }

    /// Load licenses from an SPDX `licenses.json`.
    pub fn license_list(mut self, path: Option<PathBuf>) -> Self {
        self.config.catalog.license_list = path;
        self
    }

    /// Load exceptions from an SPDX `exceptions.json`.
    pub fn exception_list(mut self, path: Option<PathBuf>) -> Self {
        self.config.catalog.exception_list = path;
        self
    }

    pub fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Continue with the next input after a failure.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.config.behavior.keep_going = keep_going;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.config.behavior.quiet = quiet;
        self
    }

    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Command-line Overrides
// ============================================================================

/// Settings given on the command line. `Some` (or `true`) replaces the
/// config file value, even when it equals the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub licenses: Option<[String; 2]>,
    pub copyright_contains: Option<String>,
    pub format: Option<ReportFormat>,
    pub output_file: Option<PathBuf>,
    pub license_list: Option<PathBuf>,
    pub exception_list: Option<PathBuf>,
    pub keep_going: bool,
    pub quiet: bool,
}

// ============================================================================
// Section Types
// ============================================================================

/// The dual-license predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PredicateConfig {
    /// The two licenses a file must list, and only these
    pub licenses: [String; 2],
    /// Case-sensitive text the copyright statement must contain
    pub copyright_contains: String,
}

impl Default for PredicateConfig {
    fn default() -> Self {
        Self {
            licenses: DEFAULT_LICENSES.map(str::to_string),
            copyright_contains: DEFAULT_COPYRIGHT_SUBSTRING.to_string(),
        }
    }
}

/// License list source. Without paths the list compiled into the binary is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CatalogConfig {
    /// SPDX license-list-data `licenses.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_list: Option<PathBuf>,
    /// SPDX license-list-data `exceptions.json`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_list: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (stdout when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Report a failed input and continue with the next one
    pub keep_going: bool,
    /// Only log errors
    pub quiet: bool,
}
