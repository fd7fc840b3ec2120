//! Output handling for scan reports.
//!
//! Provides utilities for resolving the output format and opening the sink.

use crate::reports::ReportFormat;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }

    /// Open a buffered writer for this target.
    pub fn open(&self) -> Result<Box<dyn Write>> {
        match self {
            Self::Stdout => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
            Self::File(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file {}", path.display()))?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// Resolve `Auto` to a concrete format.
///
/// A file target ending in `.json` gets JSON; everything else gets text.
#[must_use]
pub fn auto_detect_format(format: ReportFormat, target: &OutputTarget) -> ReportFormat {
    match format {
        ReportFormat::Auto => match target {
            OutputTarget::File(path) if has_json_extension(path) => ReportFormat::Json,
            _ => ReportFormat::Text,
        },
        other => other,
    }
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_target_from_option() {
        assert_eq!(OutputTarget::from_option(None), OutputTarget::Stdout);
        let path = PathBuf::from("/tmp/matches.txt");
        assert_eq!(
            OutputTarget::from_option(Some(path.clone())),
            OutputTarget::File(path)
        );
    }

    #[test]
    fn test_auto_detect_format_explicit() {
        let target = OutputTarget::File(PathBuf::from("out.json"));
        assert_eq!(auto_detect_format(ReportFormat::Text, &target), ReportFormat::Text);
    }

    #[test]
    fn test_auto_detect_format_by_extension() {
        let json = OutputTarget::File(PathBuf::from("out.JSON"));
        assert_eq!(auto_detect_format(ReportFormat::Auto, &json), ReportFormat::Json);

        let txt = OutputTarget::File(PathBuf::from("out.txt"));
        assert_eq!(auto_detect_format(ReportFormat::Auto, &txt), ReportFormat::Text);
        assert_eq!(
            auto_detect_format(ReportFormat::Auto, &OutputTarget::Stdout),
            ReportFormat::Text
        );
    }

    #[test]
    fn test_open_file_target() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let path = tmp.path().join("out.txt");
        {
            let mut writer = OutputTarget::File(path.clone()).open().expect("open");
            writeln!(writer, "src/foo.c").expect("write");
        }
        assert_eq!(std::fs::read_to_string(path).expect("read"), "src/foo.c\n");
    }
}
