//! SPDX Tag/Value document parser.
//!
//! Builds a typed [`Document`] from the records produced by the Tag/Value
//! lexer, parsing every license field against the injected catalog and
//! resolving the describes relation. JSON and RDF/XML serializations are
//! recognized and rejected.

use super::tag_value::{lex, Section, TagValue, TagValueRecord};
use super::traits::{DocumentParser, FormatConfidence, FormatDetection, ParseError};
use crate::license::{parse_expression, LicenseCatalog};
use crate::model::{
    Checksum, Document, ExtractedLicense, FileRecord, LicenseExpression, PackageRecord,
    Relationship, SnippetRecord,
};
use indexmap::IndexSet;

pub(crate) const TAG_VALUE_VARIANT: &str = "tag-value";
const JSON_VARIANT: &str = "JSON";
const RDF_VARIANT: &str = "RDF/XML";

/// Parser for SPDX Tag/Value documents
pub struct SpdxTagValueParser<'c> {
    catalog: &'c LicenseCatalog,
}

impl<'c> SpdxTagValueParser<'c> {
    /// Create a parser resolving license identifiers through `catalog`
    #[must_use]
    pub const fn new(catalog: &'c LicenseCatalog) -> Self {
        Self { catalog }
    }

    fn license(&self, tag: &str, value: &TagValue) -> Result<LicenseExpression, ParseError> {
        parse_expression(&value.value, self.catalog).map_err(|source| ParseError::License {
            tag: tag.to_string(),
            line: value.line,
            source,
        })
    }

    fn optional_license(
        &self,
        record: &TagValueRecord,
        tag: &str,
    ) -> Result<Option<LicenseExpression>, ParseError> {
        record
            .first(tag)
            .map(|value| self.license(tag, value))
            .transpose()
    }

    fn licenses(
        &self,
        record: &TagValueRecord,
        tag: &str,
    ) -> Result<Vec<LicenseExpression>, ParseError> {
        record
            .all(tag)
            .iter()
            .map(|value| self.license(tag, value))
            .collect()
    }

    fn build_document(&self, records: &[TagValueRecord]) -> Result<Document, ParseError> {
        let mut doc = Document::default();

        for record in records {
            for value in record.all("Relationship") {
                doc.relationships.push(parse_relationship(value)?);
            }

            match record.section {
                Section::Document => Self::fill_document_info(&mut doc, record),
                Section::File => doc.files.push(self.convert_file(record)?),
                Section::Package => doc.packages.push(self.convert_package(record)?),
                Section::Snippet => doc.snippets.push(self.convert_snippet(record)?),
                Section::ExtractedLicense => doc.extracted_licenses.push(ExtractedLicense {
                    id: text(record, "LicenseID").unwrap_or_default(),
                    name: text(record, "LicenseName"),
                    text: text(record, "ExtractedText"),
                }),
            }
        }

        doc.resolve_describes();
        Ok(doc)
    }

    fn fill_document_info(doc: &mut Document, record: &TagValueRecord) {
        doc.spdx_version = text(record, "SPDXVersion");
        doc.data_license = text(record, "DataLicense");
        doc.spdx_id = text(record, "SPDXID");
        doc.name = text(record, "DocumentName");
        doc.namespace = text(record, "DocumentNamespace");
        doc.comment = text(record, "DocumentComment");

        let info = &mut doc.creation_info;
        info.creators = record
            .all("Creator")
            .iter()
            .map(|v| v.value.clone())
            .collect();
        info.created = text(record, "Created");
        info.license_list_version = text(record, "LicenseListVersion");
        info.comment = text(record, "CreatorComment");
    }

    fn convert_file(&self, record: &TagValueRecord) -> Result<FileRecord, ParseError> {
        let license_info_in_files: IndexSet<LicenseExpression> = self
            .licenses(record, "LicenseInfoInFile")?
            .into_iter()
            .collect();

        let checksums = record
            .all("FileChecksum")
            .iter()
            .map(parse_checksum)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FileRecord {
            name: text(record, "FileName").unwrap_or_default(),
            spdx_id: text(record, "SPDXID"),
            license_info_in_files,
            license_concluded: self.optional_license(record, "LicenseConcluded")?,
            copyright_text: text(record, "FileCopyrightText").unwrap_or_default(),
            file_types: record
                .all("FileType")
                .iter()
                .map(|v| v.value.clone())
                .collect(),
            checksums,
            comment: text(record, "FileComment"),
            notice: text(record, "FileNotice"),
        })
    }

    fn convert_package(&self, record: &TagValueRecord) -> Result<PackageRecord, ParseError> {
        let files_analyzed = record
            .first("FilesAnalyzed")
            .map(|v| match v.value.to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(ParseError::invalid_value(
                    "FilesAnalyzed",
                    v.line,
                    format!("expected true or false, found '{}'", v.value),
                )),
            })
            .transpose()?;

        Ok(PackageRecord {
            name: text(record, "PackageName").unwrap_or_default(),
            spdx_id: text(record, "SPDXID"),
            version: text(record, "PackageVersion"),
            file_name: text(record, "PackageFileName"),
            download_location: text(record, "PackageDownloadLocation"),
            license_concluded: self.optional_license(record, "PackageLicenseConcluded")?,
            license_declared: self.optional_license(record, "PackageLicenseDeclared")?,
            license_info_from_files: self.licenses(record, "PackageLicenseInfoFromFiles")?,
            copyright_text: text(record, "PackageCopyrightText"),
            files_analyzed,
        })
    }

    fn convert_snippet(&self, record: &TagValueRecord) -> Result<SnippetRecord, ParseError> {
        Ok(SnippetRecord {
            spdx_id: text(record, "SnippetSPDXID").unwrap_or_default(),
            from_file: text(record, "SnippetFromFileSPDXID"),
            name: text(record, "SnippetName"),
            license_concluded: self.optional_license(record, "SnippetLicenseConcluded")?,
            license_info_in_snippet: self.licenses(record, "LicenseInfoInSnippet")?,
            copyright_text: text(record, "SnippetCopyrightText"),
        })
    }

    /// Extract SPDX version from tag-value content
    fn extract_tag_value_version(content: &str) -> Option<String> {
        content.lines().find_map(|line| {
            line.trim_start().strip_prefix("SPDXVersion:").map(|rest| {
                let version = rest.trim();
                version.strip_prefix("SPDX-").unwrap_or(version).to_string()
            })
        })
    }
}

impl DocumentParser for SpdxTagValueParser<'_> {
    fn parse_str(&self, content: &str) -> Result<Document, ParseError> {
        let detection = self.detect(content);
        if !detection.is_tag_value() && detection.confidence.can_parse() {
            if let Some(variant) = detection.variant {
                return Err(ParseError::UnsupportedFormat(variant));
            }
        }

        let records = lex(content)?;
        let doc = self.build_document(&records)?;
        tracing::debug!(
            records = records.len(),
            files = doc.files.len(),
            packages = doc.packages.len(),
            "Built SPDX document"
        );
        Ok(doc)
    }

    fn format_name(&self) -> &str {
        "SPDX tag-value"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        let trimmed = content.trim_start_matches('\u{feff}').trim();

        if trimmed.starts_with('{') {
            let has_spdx_version = content.contains("\"spdxVersion\"");
            let has_spdx_id = content.contains("\"SPDXID\"");
            return if has_spdx_version && has_spdx_id {
                FormatDetection::with_confidence(FormatConfidence::CERTAIN).variant(JSON_VARIANT)
            } else if has_spdx_version || has_spdx_id {
                FormatDetection::with_confidence(FormatConfidence::HIGH).variant(JSON_VARIANT)
            } else {
                FormatDetection::no_match()
            };
        }

        if trimmed.starts_with('<')
            && (content.contains("spdx.org/rdf/terms")
                || content.contains("SpdxDocument")
                || content.contains("spdx:Package"))
        {
            return FormatDetection::with_confidence(FormatConfidence::HIGH).variant(RDF_VARIANT);
        }

        if trimmed.starts_with("SPDXVersion:") || content.contains("\nSPDXVersion:") {
            let confidence = if content.contains("SPDXID:") {
                FormatConfidence::CERTAIN
            } else {
                FormatConfidence::HIGH
            };
            let mut detection =
                FormatDetection::with_confidence(confidence).variant(TAG_VALUE_VARIANT);
            if let Some(v) = Self::extract_tag_value_version(content) {
                detection = detection.version(&v);
            }
            return detection;
        }

        FormatDetection::no_match()
    }
}

fn text(record: &TagValueRecord, tag: &str) -> Option<String> {
    record.first(tag).map(|v| v.value.clone())
}

/// Parse a relationship value: `<element> <TYPE> <related element>`
fn parse_relationship(value: &TagValue) -> Result<Relationship, ParseError> {
    let parts: Vec<&str> = value.value.split_whitespace().collect();
    match parts.as_slice() {
        [element, kind, related] => Ok(Relationship {
            element: (*element).to_string(),
            kind: kind.to_ascii_uppercase(),
            related: (*related).to_string(),
        }),
        _ => Err(ParseError::invalid_value(
            "Relationship",
            value.line,
            format!("expected '<id> <TYPE> <id>', found '{}'", value.value),
        )),
    }
}

/// Parse a checksum value: `<ALGORITHM>: <value>`
fn parse_checksum(value: &TagValue) -> Result<Checksum, ParseError> {
    value
        .value
        .split_once(':')
        .map(|(algorithm, checksum)| Checksum {
            algorithm: algorithm.trim().to_string(),
            value: checksum.trim().to_string(),
        })
        .filter(|c| !c.algorithm.is_empty() && !c.value.is_empty())
        .ok_or_else(|| {
            ParseError::invalid_value(
                "FileChecksum",
                value.line,
                format!("expected '<ALGORITHM>: <value>', found '{}'", value.value),
            )
        })
}
