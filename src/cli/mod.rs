//! CLI command handlers.
//!
//! This module provides testable handlers invoked by main.rs.

mod scan;
mod setup;

pub use scan::{run_scan, scan_inputs, ScanSummary};
pub use setup::{build_catalog, build_predicate};
