//! Scan command handler.
//!
//! Runs every input through parse → verify → predicate and hands the
//! results to a reporter, in input order.

use crate::config::AppConfig;
use crate::license::LicenseCatalog;
use crate::matching::FilePredicate;
use crate::pipeline::{
    auto_detect_format, display_name, exit_codes, parse_document_with_context, InputScan,
    OutputTarget, PipelineError,
};
use crate::reports::{create_reporter, ReportContext, ReportError, ScanReporter};
use anyhow::Result;
use std::path::PathBuf;

use super::setup::{build_catalog, build_predicate};

/// Totals for a finished scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: usize,
    pub failed: usize,
}

impl ScanSummary {
    /// Process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.failed == 0 {
            exit_codes::SUCCESS
        } else {
            exit_codes::PARTIAL_FAILURE
        }
    }
}

/// Run the scan command end to end: build the catalog and predicate from
/// `config`, open the output and scan `paths`.
pub fn run_scan(paths: &[PathBuf], config: &AppConfig) -> Result<ScanSummary> {
    let catalog = build_catalog(&config.catalog)?;
    let predicate = build_predicate(&config.predicate, &catalog)?;
    tracing::info!("Reporting files {}", predicate.describe());

    let target = OutputTarget::from_option(config.output.file.clone());
    let format = auto_detect_format(config.output.format, &target);
    let mut reporter = create_reporter(format, target.open()?);

    scan_inputs(
        paths,
        &catalog,
        &predicate,
        reporter.as_mut(),
        config.behavior.keep_going,
        config.behavior.quiet,
    )
}

/// Scan `paths` in order, feeding each result to `reporter`.
///
/// Without `keep_going` the first failing input stops the scan: results
/// of earlier inputs are still finished off, then the error is returned.
/// With `keep_going` a failing input is logged, reported with its error
/// and counted in the summary.
pub fn scan_inputs(
    paths: &[PathBuf],
    catalog: &LicenseCatalog,
    predicate: &dyn FilePredicate,
    reporter: &mut dyn ScanReporter,
    keep_going: bool,
    quiet: bool,
) -> Result<ScanSummary> {
    let report_failed = |source: ReportError| PipelineError::ReportFailed { source };

    reporter
        .begin(&ReportContext {
            predicate: predicate.describe(),
            input_count: paths.len(),
        })
        .map_err(report_failed)?;

    let mut summary = ScanSummary {
        total: paths.len(),
        failed: 0,
    };

    for path in paths {
        reporter
            .begin_input(&display_name(path))
            .map_err(report_failed)?;
        let scan = match parse_document_with_context(path, catalog, quiet) {
            Ok(document) => InputScan::scanned(path, &document, predicate),
            Err(source) => {
                let failure = PipelineError::ScanFailed {
                    path: path.display().to_string(),
                    source,
                };
                if !keep_going {
                    reporter.finish().map_err(report_failed)?;
                    return Err(failure.into());
                }
                let message = format!("{:#}", anyhow::Error::new(failure));
                tracing::warn!("{message}");
                summary.failed += 1;
                InputScan::failed(path, message)
            }
        };
        reporter.report_input(&scan).map_err(report_failed)?;
    }

    reporter.finish().map_err(report_failed)?;

    if summary.failed > 0 {
        tracing::warn!(
            "{}",
            PipelineError::PartialFailure {
                failed: summary.failed,
                total: summary.total,
            }
        );
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::DualLicensePredicate;
    use crate::reports::TextReporter;
    use std::path::Path;
    use tempfile::TempDir;

    fn document(file_name: &str, copyright: &str) -> String {
        format!(
            "SPDXVersion: SPDX-2.2\n\
             DataLicense: CC0-1.0\n\
             SPDXID: SPDXRef-DOCUMENT\n\
             DocumentName: test\n\
             DocumentNamespace: https://example.org/test\n\
             Relationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-1\n\
             \n\
             FileName: {file_name}\n\
             SPDXID: SPDXRef-1\n\
             LicenseInfoInFile: Apache-2.0\n\
             LicenseInfoInFile: MIT\n\
             FileCopyrightText: {copyright}\n"
        )
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).expect("write");
        path
    }

    fn run(paths: &[PathBuf], keep_going: bool) -> (Result<ScanSummary>, String) {
        let catalog = LicenseCatalog::builtin();
        let predicate = DualLicensePredicate::from_ids(&catalog, ["Apache-2.0", "MIT"], "Khronos")
            .expect("predicate");
        let mut out = Vec::new();
        let result = {
            let mut reporter = TextReporter::new(&mut out);
            scan_inputs(paths, &catalog, &predicate, &mut reporter, keep_going, true)
        };
        (result, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn test_multiple_inputs_in_order() {
        let tmp = TempDir::new().expect("temp dir");
        let a = write(tmp.path(), "a.spdx", &document("a.c", "Copyright Khronos Group"));
        let b = write(tmp.path(), "b.spdx", &document("b.c", "Copyright Khronos Group"));

        let (result, output) = run(&[a, b], false);
        assert_eq!(result.expect("scan"), ScanSummary { total: 2, failed: 0 });
        assert_eq!(output, "a.spdx\na.c\nb.spdx\nb.c\n");
    }

    #[test]
    fn test_fail_fast_stops_at_first_failure() {
        let tmp = TempDir::new().expect("temp dir");
        let a = write(tmp.path(), "a.spdx", &document("a.c", "Copyright Khronos Group"));
        let bad = write(tmp.path(), "bad.spdx", "SPDXVersion: SPDX-2.2\nnot a tag\n");
        let c = write(tmp.path(), "c.spdx", &document("c.c", "Copyright Khronos Group"));

        let (result, output) = run(&[a, bad, c], false);
        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("bad.spdx"), "{err:#}");
        assert_eq!(output, "a.spdx\na.c\nbad.spdx\n");
    }

    #[test]
    fn test_keep_going_reports_remaining_inputs() {
        let tmp = TempDir::new().expect("temp dir");
        let a = write(tmp.path(), "a.spdx", &document("a.c", "Copyright Khronos Group"));
        let missing = tmp.path().join("missing.spdx");
        let c = write(tmp.path(), "c.spdx", &document("c.c", "Copyright Khronos Group"));

        let (result, output) = run(&[a, missing, c], true);
        let summary = result.expect("scan");
        assert_eq!(summary, ScanSummary { total: 3, failed: 1 });
        assert_eq!(summary.exit_code(), exit_codes::PARTIAL_FAILURE);
        assert_eq!(output, "a.spdx\na.c\nmissing.spdx\nc.spdx\nc.c\n");
    }

    #[test]
    fn test_non_matching_copyright() {
        let tmp = TempDir::new().expect("temp dir");
        let a = write(tmp.path(), "a.spdx", &document("src/foo.c", "Copyright (c) 2020 Acme Inc"));

        let (result, output) = run(&[a], false);
        assert_eq!(result.expect("scan").exit_code(), exit_codes::SUCCESS);
        assert!(output.is_empty());
    }
}
