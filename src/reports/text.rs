//! Line-oriented text reporter.

use super::{ReportContext, ReportError, ScanReporter};
use crate::pipeline::InputScan;
use std::io::Write;

/// Writes one matching file name per line.
///
/// With more than one input, each input's display name is written as a
/// header before the input is read, so it precedes its block (even an
/// empty one) and any error that aborts the scan there.
pub struct TextReporter<W: Write> {
    writer: W,
    show_headers: bool,
}

impl<W: Write> TextReporter<W> {
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            show_headers: false,
        }
    }
}

impl<W: Write> ScanReporter for TextReporter<W> {
    fn begin(&mut self, context: &ReportContext) -> Result<(), ReportError> {
        self.show_headers = context.input_count > 1;
        Ok(())
    }

    fn begin_input(&mut self, display_name: &str) -> Result<(), ReportError> {
        if self.show_headers {
            writeln!(self.writer, "{display_name}")?;
            // The header must be out before a failure is logged
            self.writer.flush()?;
        }
        Ok(())
    }

    fn report_input(&mut self, scan: &InputScan) -> Result<(), ReportError> {
        for name in &scan.matches {
            writeln!(self.writer, "{name}")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ReportError> {
        self.writer.flush()?;
        Ok(())
    }
}
