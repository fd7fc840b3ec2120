//! Report generation for scan results.
//!
//! This module provides two output formats:
//! - Text: one normalized file name per line, the classic output
//! - JSON: structured data for programmatic integration
//!
//! Reporters receive inputs one at a time through [`ScanReporter`]. The
//! text reporter writes each block as soon as it arrives; the JSON
//! reporter writes a single document when the scan finishes.

mod json;
mod text;
mod types;

pub use json::JsonReporter;
pub use text::TextReporter;
pub use types::ReportFormat;

use crate::pipeline::InputScan;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Scan context shared by every reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    /// `FilePredicate::describe()` of the predicate in use
    pub predicate: String,
    /// Number of inputs the scan was started with
    pub input_count: usize,
}

/// Receives scan results as they are produced.
pub trait ScanReporter {
    /// Called once before the first input.
    fn begin(&mut self, context: &ReportContext) -> Result<(), ReportError>;

    /// Called before each input is read, in input order.
    fn begin_input(&mut self, _display_name: &str) -> Result<(), ReportError> {
        Ok(())
    }

    /// Called once per input that finished, successfully or not.
    fn report_input(&mut self, scan: &InputScan) -> Result<(), ReportError>;

    /// Called once after the last input, including after a fail-fast abort.
    fn finish(&mut self) -> Result<(), ReportError>;
}

/// Create the reporter for a concrete `format`.
///
/// `Auto` must be resolved beforehand; it is treated as text.
pub fn create_reporter<'w>(
    format: ReportFormat,
    writer: Box<dyn Write + 'w>,
) -> Box<dyn ScanReporter + 'w> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new(writer)),
        ReportFormat::Auto | ReportFormat::Text => Box::new(TextReporter::new(writer)),
    }
}
