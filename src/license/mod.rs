//! SPDX license expressions: catalog, tokenizer and parser.
//!
//! Parsing is catalog-driven. Every identifier is resolved against an
//! injected [`LicenseCatalog`], so the same input parses identically no
//! matter which process built the catalog, and tests can supply a catalog
//! of their own.

mod catalog;
mod lexer;
mod parser;

pub use catalog::{CatalogEntry, CatalogError, LicenseCatalog};
pub use parser::parse_expression;

use thiserror::Error;

/// Errors produced while parsing a license expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LicenseParseError {
    #[error("empty license expression")]
    Empty,

    #[error("invalid character '{character}' at offset {offset}")]
    InvalidCharacter { character: char, offset: usize },

    #[error("unexpected {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        found: String,
        offset: usize,
        expected: &'static str,
    },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("parentheses nested deeper than {limit} at offset {offset}")]
    NestingTooDeep { offset: usize, limit: usize },

    #[error("expression has {count} tokens, more than the limit of {limit}")]
    TooManyTokens { count: usize, limit: usize },

    #[error("unbalanced parenthesis at offset {offset}")]
    UnbalancedParenthesis { offset: usize },

    #[error("unknown license identifier '{id}' at offset {offset}")]
    UnknownLicense { id: String, offset: usize },

    #[error("unknown license exception '{id}' at offset {offset}")]
    UnknownException { id: String, offset: usize },

    #[error("malformed license reference '{id}' at offset {offset}")]
    InvalidLicenseRef { id: String, offset: usize },

    #[error("'{value}' at offset {offset} must be the entire expression")]
    MisplacedSpecialValue { value: String, offset: usize },
}
