//! Predicate evaluation stage.

use crate::matching::FilePredicate;
use crate::model::Document;
use serde::Serialize;
use std::path::Path;

/// Outcome of scanning one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InputScan {
    /// Input path as given
    pub path: String,
    /// Final component of the input path
    pub display_name: String,
    pub document_name: Option<String>,
    pub document_namespace: Option<String>,
    /// Normalized names of matching files, in describes order
    pub matches: Vec<String>,
    /// Error chain when the input could not be scanned
    pub error: Option<String>,
}

impl InputScan {
    /// Scan result for a verified document.
    pub fn scanned(path: &Path, document: &Document, predicate: &dyn FilePredicate) -> Self {
        Self {
            path: path.display().to_string(),
            display_name: display_name(path),
            document_name: document.name.clone(),
            document_namespace: document.namespace.clone(),
            matches: scan_document(document, predicate),
            error: None,
        }
    }

    /// Placeholder for an input that failed.
    pub fn failed(path: &Path, error: impl Into<String>) -> Self {
        Self {
            path: path.display().to_string(),
            display_name: display_name(path),
            error: Some(error.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Final path component, or the whole path when there is none.
#[must_use]
pub fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Names of the described files that satisfy `predicate`, with `\`
/// normalized to `/`.
pub fn scan_document(document: &Document, predicate: &dyn FilePredicate) -> Vec<String> {
    document
        .described_files()
        .filter(|file| {
            let matched = predicate.matches(file);
            tracing::debug!(file = %file.name, matched, "Evaluated predicate");
            matched
        })
        .map(crate::model::FileRecord::normalized_name)
        .collect()
}
