//! **Find exactly dual-licensed files in SPDX documents.**
//!
//! `dual-license-finder` reads SPDX 2.x documents in the Tag/Value
//! serialization and reports the files they describe that are licensed under
//! exactly two licenses (by default `Apache-2.0` and `MIT`) and whose
//! copyright text mentions a given holder (by default `Khronos`).
//!
//! ## Core Concepts & Modules
//!
//! - **[`parsers`]**: Tag/Value lexing, document construction and format
//!   detection. JSON and RDF/XML inputs are recognized and rejected.
//! - **[`model`]**: The [`Document`] model and its exhaustive verification.
//! - **[`license`]**: The [`LicenseCatalog`] of known identifiers and the SPDX
//!   license-expression parser.
//! - **[`matching`]**: The [`FilePredicate`] trait and the
//!   [`DualLicensePredicate`].
//! - **[`pipeline`]** and **[`cli`]**: Per-input parse → verify → evaluate,
//!   fail-fast or keep-going.
//! - **[`reports`]**: Text and JSON reporters.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use dual_license_finder::{parse_document, DualLicensePredicate, LicenseCatalog};
//! use dual_license_finder::pipeline::scan_document;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = LicenseCatalog::builtin();
//!     let document = parse_document(Path::new("vulkan.spdx"), &catalog)?.verify()?;
//!     let predicate =
//!         DualLicensePredicate::from_ids(&catalog, ["Apache-2.0", "MIT"], "Khronos")?;
//!
//!     for name in scan_document(&document, &predicate) {
//!         println!("{name}");
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors / # Panics sections are not written for every fn
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::fn_params_excessive_bools,
    // Variable names like `first`/`second` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod license;
pub mod matching;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reports;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, BehaviorConfig, CatalogConfig, OutputConfig};
pub use config::{CliOverrides, ConfigError, PredicateConfig, Validatable};
pub use error::{ErrorContext, FinderError, Result};
pub use license::{parse_expression, LicenseCatalog, LicenseParseError};
pub use matching::{DualLicensePredicate, FilePredicate, MatchOutcome};
pub use model::{DescribedElement, Document, FileRecord, LicenseExpression};
pub use parsers::{parse_document, parse_document_str, DocumentParser, SpdxTagValueParser};
pub use reports::{ReportFormat, ScanReporter};
