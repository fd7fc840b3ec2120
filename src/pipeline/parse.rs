//! Document loading stage: read, parse and verify one input.

use crate::error::{ErrorContext, FinderError, Result};
use crate::license::LicenseCatalog;
use crate::model::Document;
use std::path::Path;

/// Parse and verify the document at `path`.
///
/// Every error carries the path as context. Verification failures list all
/// violations found, not just the first.
pub fn parse_document_with_context(
    path: &Path,
    catalog: &LicenseCatalog,
    quiet: bool,
) -> Result<Document> {
    if !path.is_file() {
        return Err(FinderError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "input file does not exist"),
        ));
    }

    if !quiet {
        tracing::info!("Parsing SPDX document: {}", path.display());
    }

    let document = crate::parsers::parse_document(path, catalog)
        .with_context(|| path.display().to_string())?
        .verify()
        .with_context(|| path.display().to_string())?;

    if !quiet {
        tracing::info!(
            files = document.files.len(),
            packages = document.packages.len(),
            described = document.described().count(),
            "Parsed {}",
            document.name.as_deref().unwrap_or("unnamed document")
        );
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn test_missing_input() {
        let catalog = LicenseCatalog::builtin();
        let err = parse_document_with_context(Path::new("/nonexistent.spdx"), &catalog, true)
            .unwrap_err();
        assert!(matches!(err, FinderError::Io { .. }));
    }

    #[test]
    fn test_parse_error_names_path() {
        let file = write_temp("SPDXVersion: SPDX-2.2\nnot a tag line\n");
        let catalog = LicenseCatalog::builtin();
        let err = parse_document_with_context(file.path(), &catalog, true).unwrap_err();
        match err {
            FinderError::Parse { context, .. } => {
                assert_eq!(context, file.path().display().to_string());
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_verification_error() {
        let file = write_temp("SPDXVersion: SPDX-2.2\nSPDXID: SPDXRef-DOCUMENT\n");
        let catalog = LicenseCatalog::builtin();
        let err = parse_document_with_context(file.path(), &catalog, true).unwrap_err();
        assert!(matches!(err, FinderError::Verification { .. }));
    }
}
