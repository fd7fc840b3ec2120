//! Pipeline orchestration for scans.
//!
//! This module provides the stages shared by CLI handlers:
//! parse → verify → evaluate predicate → report.

mod output;
mod parse;
mod scan;

pub use output::{auto_detect_format, OutputTarget};
pub use parse::parse_document_with_context;
pub use scan::{display_name, scan_document, InputScan};

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An input could not be scanned
    #[error("Scan failed for {path}: {source}")]
    ScanFailed {
        path: String,
        #[source]
        source: crate::error::FinderError,
    },

    /// Some inputs failed while running with keep-going
    #[error("{failed} of {total} input(s) failed")]
    PartialFailure { failed: usize, total: usize },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: crate::reports::ReportError,
    },
}

/// Process exit codes
pub mod exit_codes {
    /// Every input was scanned
    pub const SUCCESS: i32 = 0;
    /// An error stopped the scan
    pub const ERROR: i32 = 1;
    /// Keep-going mode: at least one input failed, the rest were scanned
    pub const PARTIAL_FAILURE: i32 = 2;
}
