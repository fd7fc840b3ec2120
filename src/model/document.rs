//! Typed SPDX document built from a Tag/Value parse.

use super::LicenseExpression;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexSet;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Identifier every document must use for itself.
pub const DOCUMENT_SPDX_ID: &str = "SPDXRef-DOCUMENT";

const EXTERNAL_DOCUMENT_PREFIX: &str = "DocumentRef-";

static SPDX_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SPDX-\d+\.\d+$").expect("static regex"));

/// An SPDX document: metadata plus the packages, files and snippets it
/// contains.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    pub spdx_version: Option<String>,
    pub data_license: Option<String>,
    pub spdx_id: Option<String>,
    pub name: Option<String>,
    /// `DocumentNamespace`, the URI identifying this document
    pub namespace: Option<String>,
    pub creation_info: CreationInfo,
    pub comment: Option<String>,
    pub packages: Vec<PackageRecord>,
    pub files: Vec<FileRecord>,
    pub snippets: Vec<SnippetRecord>,
    pub extracted_licenses: Vec<ExtractedLicense>,
    pub relationships: Vec<Relationship>,
    /// Resolved describes relation, in document order
    pub(crate) describes: Vec<ElementRef>,
    /// Describes targets naming no element of this document
    pub(crate) unresolved_describes: Vec<String>,
}

/// Creation metadata (`Creator`, `Created`, `LicenseListVersion`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreationInfo {
    pub creators: Vec<String>,
    /// Raw `Created` value; see [`CreationInfo::created_at`]
    pub created: Option<String>,
    pub license_list_version: Option<String>,
    pub comment: Option<String>,
}

impl CreationInfo {
    /// The `Created` timestamp, if present and valid RFC 3339.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        self.created
            .as_deref()
            .and_then(|c| DateTime::parse_from_rfc3339(c).ok())
    }
}

/// One file element.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileRecord {
    /// `FileName`, as written (either path separator)
    pub name: String,
    pub spdx_id: Option<String>,
    /// One entry per distinct `LicenseInfoInFile`, in first-seen order
    pub license_info_in_files: IndexSet<LicenseExpression>,
    pub license_concluded: Option<LicenseExpression>,
    /// `FileCopyrightText`; may be `NOASSERTION` or `NONE`
    pub copyright_text: String,
    pub file_types: Vec<String>,
    pub checksums: Vec<Checksum>,
    pub comment: Option<String>,
    pub notice: Option<String>,
}

impl FileRecord {
    /// File name with `\` separators replaced by `/`.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        self.name.replace('\\', "/")
    }
}

/// `FileChecksum: <ALGORITHM>: <value>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checksum {
    pub algorithm: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageRecord {
    pub name: String,
    pub spdx_id: Option<String>,
    pub version: Option<String>,
    pub file_name: Option<String>,
    pub download_location: Option<String>,
    pub license_concluded: Option<LicenseExpression>,
    pub license_declared: Option<LicenseExpression>,
    pub license_info_from_files: Vec<LicenseExpression>,
    pub copyright_text: Option<String>,
    pub files_analyzed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SnippetRecord {
    pub spdx_id: String,
    pub from_file: Option<String>,
    pub name: Option<String>,
    pub license_concluded: Option<LicenseExpression>,
    pub license_info_in_snippet: Vec<LicenseExpression>,
    pub copyright_text: Option<String>,
}

/// `LicenseID` / `LicenseName` / `ExtractedText` block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractedLicense {
    pub id: String,
    pub name: Option<String>,
    pub text: Option<String>,
}

/// `Relationship: <element> <TYPE> <related element>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relationship {
    pub element: String,
    pub kind: String,
    pub related: String,
}

/// Index of a described element in its owning collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) enum ElementRef {
    File(usize),
    Package(usize),
    Snippet(usize),
}

/// An element the document describes.
#[derive(Debug, Clone, Copy)]
pub enum DescribedElement<'a> {
    File(&'a FileRecord),
    Package(&'a PackageRecord),
    Snippet(&'a SnippetRecord),
}

impl<'a> DescribedElement<'a> {
    #[must_use]
    pub fn spdx_id(&self) -> Option<&'a str> {
        match *self {
            Self::File(f) => f.spdx_id.as_deref(),
            Self::Package(p) => p.spdx_id.as_deref(),
            Self::Snippet(s) => Some(&s.spdx_id),
        }
    }
}

impl Document {
    /// Elements of the describes relation, in document order.
    pub fn described(&self) -> impl Iterator<Item = DescribedElement<'_>> {
        self.describes.iter().filter_map(|r| match *r {
            ElementRef::File(i) => self.files.get(i).map(DescribedElement::File),
            ElementRef::Package(i) => self.packages.get(i).map(DescribedElement::Package),
            ElementRef::Snippet(i) => self.snippets.get(i).map(DescribedElement::Snippet),
        })
    }

    /// The described elements that are files.
    pub fn described_files(&self) -> impl Iterator<Item = &FileRecord> {
        self.described().filter_map(|e| match e {
            DescribedElement::File(f) => Some(f),
            _ => None,
        })
    }

    /// Rebuild the describes relation from `DESCRIBES` / `DESCRIBED_BY`
    /// relationships, in document order.
    pub(crate) fn resolve_describes(&mut self) {
        let doc_id = self.spdx_id.as_deref().unwrap_or(DOCUMENT_SPDX_ID);

        let mut targets: IndexSet<&str> = IndexSet::new();
        for rel in &self.relationships {
            match rel.kind.as_str() {
                "DESCRIBES" if rel.element == doc_id => {
                    targets.insert(&rel.related);
                }
                "DESCRIBED_BY" if rel.related == doc_id => {
                    targets.insert(&rel.element);
                }
                _ => {}
            }
        }

        let mut ids: HashMap<&str, ElementRef> = HashMap::new();
        for (i, file) in self.files.iter().enumerate() {
            if let Some(id) = file.spdx_id.as_deref() {
                ids.entry(id).or_insert(ElementRef::File(i));
            }
        }
        for (i, package) in self.packages.iter().enumerate() {
            if let Some(id) = package.spdx_id.as_deref() {
                ids.entry(id).or_insert(ElementRef::Package(i));
            }
        }
        for (i, snippet) in self.snippets.iter().enumerate() {
            ids.entry(snippet.spdx_id.as_str())
                .or_insert(ElementRef::Snippet(i));
        }

        let mut describes = Vec::new();
        let mut unresolved = Vec::new();
        for target in targets {
            if target.starts_with(EXTERNAL_DOCUMENT_PREFIX) {
                tracing::debug!(target, "Skipping describes target in another document");
                continue;
            }
            match ids.get(target) {
                Some(element) => describes.push(*element),
                None => unresolved.push(target.to_string()),
            }
        }

        self.describes = describes;
        self.unresolved_describes = unresolved;
    }

    /// Every structural problem in the document.
    #[must_use]
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        match self.spdx_version.as_deref() {
            None => violations.push(Violation::MissingSpdxVersion),
            Some(v) if !SPDX_VERSION.is_match(v) => {
                violations.push(Violation::InvalidSpdxVersion(v.to_string()));
            }
            Some(_) => {}
        }

        if self.namespace.as_deref().map_or(true, |ns| ns.trim().is_empty()) {
            violations.push(Violation::MissingNamespace);
        }

        if self.spdx_id.as_deref() != Some(DOCUMENT_SPDX_ID) {
            violations.push(Violation::InvalidDocumentId(self.spdx_id.clone()));
        }

        if let Some(created) = &self.creation_info.created {
            if self.creation_info.created_at().is_none() {
                violations.push(Violation::InvalidCreated(created.clone()));
            }
        }

        for (index, file) in self.files.iter().enumerate() {
            if file.name.trim().is_empty() {
                violations.push(Violation::MissingFileName { index });
            }
            if file.spdx_id.is_none() {
                violations.push(Violation::MissingFileId {
                    name: file.name.clone(),
                });
            }
        }

        for (index, package) in self.packages.iter().enumerate() {
            if package.name.trim().is_empty() {
                violations.push(Violation::MissingPackageName { index });
            }
            if package.spdx_id.is_none() {
                violations.push(Violation::MissingPackageId {
                    name: package.name.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let ids = self
            .files
            .iter()
            .filter_map(|f| f.spdx_id.as_deref())
            .chain(self.packages.iter().filter_map(|p| p.spdx_id.as_deref()))
            .chain(self.snippets.iter().map(|s| s.spdx_id.as_str()));
        for id in ids {
            if !seen.insert(id) && reported.insert(id) {
                violations.push(Violation::DuplicateId(id.to_string()));
            }
        }

        violations.extend(
            self.unresolved_describes
                .iter()
                .cloned()
                .map(Violation::UnknownDescribesTarget),
        );

        violations
    }

    /// Return the document if it has no violations.
    pub fn verify(self) -> Result<Self, VerificationError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(self)
        } else {
            Err(VerificationError { violations })
        }
    }
}

/// A single structural problem found by [`Document::violations`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("missing SPDXVersion")]
    MissingSpdxVersion,

    #[error("invalid SPDXVersion '{0}', expected SPDX-<major>.<minor>")]
    InvalidSpdxVersion(String),

    #[error("missing DocumentNamespace")]
    MissingNamespace,

    #[error(
        "document SPDXID must be SPDXRef-DOCUMENT, found {}",
        .0.as_deref().unwrap_or("nothing")
    )]
    InvalidDocumentId(Option<String>),

    #[error("Created '{0}' is not an RFC 3339 timestamp")]
    InvalidCreated(String),

    #[error("file #{index} has no FileName")]
    MissingFileName { index: usize },

    #[error("file '{name}' has no SPDXID")]
    MissingFileId { name: String },

    #[error("package #{index} has no PackageName")]
    MissingPackageName { index: usize },

    #[error("package '{name}' has no SPDXID")]
    MissingPackageId { name: String },

    #[error("duplicate SPDXID '{0}'")]
    DuplicateId(String),

    #[error("DESCRIBES target '{0}' is not an element of this document")]
    UnknownDescribesTarget(String),
}

/// A document failed verification. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationError {
    pub violations: Vec<Violation>,
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} verification failure(s): ", self.violations.len())?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for VerificationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_document() -> Document {
        Document {
            spdx_version: Some("SPDX-2.3".to_string()),
            spdx_id: Some(DOCUMENT_SPDX_ID.to_string()),
            namespace: Some("https://example.org/spdx/doc-1".to_string()),
            files: vec![FileRecord {
                name: "src\\foo.c".to_string(),
                spdx_id: Some("SPDXRef-foo".to_string()),
                ..FileRecord::default()
            }],
            describes: vec![ElementRef::File(0)],
            ..Document::default()
        }
    }

    #[test]
    fn test_valid_document_verifies() {
        let doc = valid_document().verify().expect("should verify");
        assert_eq!(doc.described_files().count(), 1);
    }

    #[test]
    fn test_violations_are_exhaustive() {
        let mut doc = valid_document();
        doc.spdx_version = None;
        doc.namespace = Some(String::new());
        doc.files[0].name = String::new();
        doc.creation_info.created = Some("yesterday".to_string());

        let err = doc.verify().unwrap_err();
        assert_eq!(
            err.violations,
            vec![
                Violation::MissingSpdxVersion,
                Violation::MissingNamespace,
                Violation::InvalidCreated("yesterday".to_string()),
                Violation::MissingFileName { index: 0 },
            ]
        );
        assert!(err.to_string().starts_with("4 verification failure(s)"));
    }

    #[test]
    fn test_invalid_version_and_document_id() {
        let mut doc = valid_document();
        doc.spdx_version = Some("2.3".to_string());
        doc.spdx_id = Some("SPDXRef-Other".to_string());

        let violations = doc.violations();
        assert!(violations.contains(&Violation::InvalidSpdxVersion("2.3".to_string())));
        assert!(violations.contains(&Violation::InvalidDocumentId(Some(
            "SPDXRef-Other".to_string()
        ))));
    }

    #[test]
    fn test_duplicate_ids_reported_once() {
        let mut doc = valid_document();
        let copy = doc.files[0].clone();
        doc.files.push(copy.clone());
        doc.files.push(copy);

        let duplicates: Vec<_> = doc
            .violations()
            .into_iter()
            .filter(|v| matches!(v, Violation::DuplicateId(_)))
            .collect();
        assert_eq!(duplicates, vec![Violation::DuplicateId("SPDXRef-foo".to_string())]);
    }

    #[test]
    fn test_unknown_describes_target() {
        let mut doc = valid_document();
        doc.unresolved_describes.push("SPDXRef-missing".to_string());
        assert_eq!(
            doc.violations(),
            vec![Violation::UnknownDescribesTarget("SPDXRef-missing".to_string())]
        );
    }

    #[test]
    fn test_created_timestamp() {
        let info = CreationInfo {
            created: Some("2024-01-15T10:00:00Z".to_string()),
            ..CreationInfo::default()
        };
        assert!(info.created_at().is_some());
    }

    #[test]
    fn test_normalized_name() {
        let doc = valid_document();
        assert_eq!(doc.files[0].normalized_name(), "src/foo.c");
    }

    #[test]
    fn test_described_skips_non_files() {
        let mut doc = valid_document();
        doc.packages.push(PackageRecord {
            name: "pkg".to_string(),
            spdx_id: Some("SPDXRef-pkg".to_string()),
            ..PackageRecord::default()
        });
        doc.describes.insert(0, ElementRef::Package(0));

        let ids: Vec<_> = doc.described().filter_map(|e| e.spdx_id()).collect();
        assert_eq!(ids, vec!["SPDXRef-pkg", "SPDXRef-foo"]);
        assert_eq!(doc.described_files().count(), 1);
    }
}
