//! In-memory SPDX document model.
//!
//! A [`Document`] is produced by the Tag/Value parser and checked with
//! [`Document::verify`] before any file is evaluated. License fields are
//! stored as parsed [`LicenseExpression`] trees with canonical identifiers.

mod document;
mod license;

pub use document::*;
pub use license::*;
