//! JSON report generator.

use super::{ReportContext, ReportError, ScanReporter};
use crate::pipeline::InputScan;
use chrono::Utc;
use serde::Serialize;
use std::io::Write;

/// Collects every input and writes one JSON document on `finish`.
pub struct JsonReporter<W: Write> {
    writer: W,
    predicate: String,
    inputs: Vec<InputScan>,
    pretty: bool,
}

impl<W: Write> JsonReporter<W> {
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            predicate: String::new(),
            inputs: Vec::new(),
            pretty: true,
        }
    }

    /// Set pretty printing
    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

#[derive(Serialize)]
struct JsonScanReport<'a> {
    tool: ToolInfo,
    generated_at: String,
    predicate: &'a str,
    inputs: &'a [InputScan],
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

impl<W: Write> ScanReporter for JsonReporter<W> {
    fn begin(&mut self, context: &ReportContext) -> Result<(), ReportError> {
        self.predicate.clone_from(&context.predicate);
        self.inputs.reserve(context.input_count);
        Ok(())
    }

    fn report_input(&mut self, scan: &InputScan) -> Result<(), ReportError> {
        self.inputs.push(scan.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ReportError> {
        let report = JsonScanReport {
            tool: ToolInfo {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
            generated_at: Utc::now().to_rfc3339(),
            predicate: &self.predicate,
            inputs: &self.inputs,
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &report)?;
        } else {
            serde_json::to_writer(&mut self.writer, &report)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
