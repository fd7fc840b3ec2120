//! Parser trait definitions and error types.
//!
//! This module defines the `DocumentParser` trait for serialization-specific
//! parsers and the confidence scoring used to recognize (and reject) SPDX
//! serializations this crate does not read.

use crate::license::LicenseParseError;
use crate::model::Document;
use thiserror::Error;

/// Errors that can occur while parsing an SPDX document
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("unsupported SPDX serialization: {0} (only tag-value is supported)")]
    UnsupportedFormat(String),

    #[error("document contains no tags")]
    EmptyDocument,

    #[error("line {line}: value without a preceding tag")]
    OrphanValue { line: usize },

    #[error("line {line}: <text> value of tag '{tag}' is never closed")]
    UnterminatedText { tag: String, line: usize },

    #[error("line {line}: invalid {tag} value: {message}")]
    InvalidValue {
        tag: String,
        line: usize,
        message: String,
    },

    #[error("line {line}: invalid license expression in {tag}")]
    License {
        tag: String,
        line: usize,
        #[source]
        source: LicenseParseError,
    },
}

impl ParseError {
    /// Create an invalid value error
    pub fn invalid_value(tag: &str, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            tag: tag.to_string(),
            line,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Confidence level for format detection
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FormatConfidence(f32);

impl FormatConfidence {
    /// Definitely not this format
    pub const NONE: Self = Self(0.0);
    pub const LOW: Self = Self(0.25);
    pub const HIGH: Self = Self(0.75);
    pub const CERTAIN: Self = Self(1.0);

    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Check if this confidence indicates the format can be parsed
    #[must_use]
    pub fn can_parse(&self) -> bool {
        self.0 >= Self::LOW.0
    }
}

impl Default for FormatConfidence {
    fn default() -> Self {
        Self::NONE
    }
}

/// Detection result from a parser
#[derive(Debug, Clone, Default)]
pub struct FormatDetection {
    /// Confidence that the content is in the detected serialization
    pub confidence: FormatConfidence,
    /// Detected serialization ("tag-value", "JSON", "RDF/XML")
    pub variant: Option<String>,
    /// Detected SPDX version, without the `SPDX-` prefix
    pub version: Option<String>,
}

impl FormatDetection {
    #[must_use]
    pub const fn no_match() -> Self {
        Self {
            confidence: FormatConfidence::NONE,
            variant: None,
            version: None,
        }
    }

    #[must_use]
    pub const fn with_confidence(confidence: FormatConfidence) -> Self {
        Self {
            confidence,
            variant: None,
            version: None,
        }
    }

    #[must_use]
    pub fn variant(mut self, variant: &str) -> Self {
        self.variant = Some(variant.to_string());
        self
    }

    #[must_use]
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Whether the content was recognized as tag-value
    #[must_use]
    pub fn is_tag_value(&self) -> bool {
        self.variant.as_deref() == Some(super::spdx::TAG_VALUE_VARIANT)
    }
}

/// Trait for SPDX document parsers
///
/// Implementors provide `parse_str()` and `detect()`; byte input is
/// decoded by the default method. Files are read through
/// [`super::parse_document`], which applies the size cap.
pub trait DocumentParser {
    /// Parse a document from raw bytes, decoding them first
    fn parse_bytes(&self, bytes: &[u8]) -> Result<Document, ParseError> {
        let content = super::tag_value::decode(bytes)?;
        self.parse_str(content)
    }

    /// Parse a document from string content
    fn parse_str(&self, content: &str) -> Result<Document, ParseError>;

    /// Get format name
    fn format_name(&self) -> &str;

    /// Detect which serialization the content uses
    ///
    /// This performs a lightweight structural check without full parsing.
    fn detect(&self, content: &str) -> FormatDetection;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(FormatConfidence::new(2.0), FormatConfidence::CERTAIN);
        assert_eq!(FormatConfidence::new(-1.0), FormatConfidence::NONE);
        assert!(FormatConfidence::HIGH > FormatConfidence::LOW);
    }

    #[test]
    fn test_can_parse_threshold() {
        assert!(FormatConfidence::LOW.can_parse());
        assert!(!FormatConfidence::new(0.1).can_parse());
    }

    #[test]
    fn test_license_error_keeps_source() {
        use std::error::Error as _;

        let err = ParseError::License {
            tag: "LicenseInfoInFile".to_string(),
            line: 12,
            source: LicenseParseError::Empty,
        };
        assert!(err.to_string().contains("line 12"));
        assert!(err.source().is_some());
    }
}
