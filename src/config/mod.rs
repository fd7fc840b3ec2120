//! Configuration module for dual-license-finder.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation collecting every problem
//! - YAML config file loading and discovery
//! - CLI argument overrides
//!
//! # Configuration File
//!
//! Place a `.dual-license-finder.yaml` file in your project root or
//! `~/.config/dual-license-finder/`:
//!
//! ```yaml
//! predicate:
//!   licenses: [Apache-2.0, MIT]
//!   copyright_contains: Khronos
//! behavior:
//!   keep_going: true
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{DEFAULT_COPYRIGHT_SUBSTRING, DEFAULT_LICENSES};
pub use types::{
    AppConfig, AppConfigBuilder, BehaviorConfig, CatalogConfig, CliOverrides, OutputConfig,
    PredicateConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and complete config files.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
