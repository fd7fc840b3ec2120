//! Unified error types for dual-license-finder.
//!
//! Each layer has its own `thiserror` enum (`ParseError`, `VerificationError`,
//! `LicenseParseError`, ...). [`FinderError`] wraps them with a context chain
//! naming the input being processed.

use crate::license::{CatalogError, LicenseParseError};
use crate::matching::PredicateError;
use crate::model::VerificationError;
use crate::parsers::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dual-license-finder operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum FinderError {
    /// Malformed or unsupported input document
    #[error("Failed to parse document: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseError,
    },

    /// Document parsed but failed structural verification
    #[error("Failed verification: {context}")]
    Verification {
        context: String,
        #[source]
        source: VerificationError,
    },

    /// Invalid license expression outside a document (configuration, CLI)
    #[error("Invalid license expression: {context}")]
    License {
        context: String,
        #[source]
        source: LicenseParseError,
    },

    /// Predicate could not be built
    #[error("Invalid predicate: {context}")]
    Predicate {
        context: String,
        #[source]
        source: PredicateError,
    },

    /// License list could not be loaded
    #[error("Failed to load license catalog: {context}")]
    Catalog {
        context: String,
        #[source]
        source: CatalogError,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenient Result type for dual-license-finder operations
pub type Result<T> = std::result::Result<T, FinderError>;

impl FinderError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseError) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Create a verification error with context
    pub fn verification(context: impl Into<String>, source: VerificationError) -> Self {
        Self::Verification {
            context: context.into(),
            source,
        }
    }

    /// Create a license expression error with context
    pub fn license(context: impl Into<String>, source: LicenseParseError) -> Self {
        Self::License {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            message: source.to_string(),
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<std::io::Error> for FinderError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<ParseError> for FinderError {
    fn from(err: ParseError) -> Self {
        Self::parse(String::new(), err)
    }
}

impl From<VerificationError> for FinderError {
    fn from(err: VerificationError) -> Self {
        Self::verification(String::new(), err)
    }
}

impl From<LicenseParseError> for FinderError {
    fn from(err: LicenseParseError) -> Self {
        Self::license(String::new(), err)
    }
}

impl From<PredicateError> for FinderError {
    fn from(err: PredicateError) -> Self {
        Self::Predicate {
            context: String::new(),
            source: err,
        }
    }
}

impl From<CatalogError> for FinderError {
    fn from(err: CatalogError) -> Self {
        Self::Catalog {
            context: String::new(),
            source: err,
        }
    }
}

/// Extension trait for adding context to errors.
///
/// Context strings chain outermost first: `"outer: inner"`.
///
/// ```ignore
/// use dual_license_finder::error::ErrorContext;
///
/// let doc = parse_document(path, &catalog)
///     .with_context(|| path.display().to_string())?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, called only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<FinderError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

fn add_context_to_error(err: FinderError, new_ctx: &str) -> FinderError {
    match err {
        FinderError::Parse { context, source } => FinderError::Parse {
            context: chain_context(new_ctx, &context),
            source,
        },
        FinderError::Verification { context, source } => FinderError::Verification {
            context: chain_context(new_ctx, &context),
            source,
        },
        FinderError::License { context, source } => FinderError::License {
            context: chain_context(new_ctx, &context),
            source,
        },
        FinderError::Predicate { context, source } => FinderError::Predicate {
            context: chain_context(new_ctx, &context),
            source,
        },
        FinderError::Catalog { context, source } => FinderError::Catalog {
            context: chain_context(new_ctx, &context),
            source,
        },
        FinderError::Io {
            path,
            message,
            source,
        } => FinderError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        FinderError::Config(msg) => FinderError::Config(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings: `"new: existing"`, or `new` alone when
/// there is no existing context.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Violation;

    #[test]
    fn test_error_display() {
        let err = FinderError::parse("vulkan.spdx", ParseError::EmptyDocument);
        let display = err.to_string();
        assert!(display.contains("vulkan.spdx"), "{display}");

        let err = FinderError::verification(
            "vulkan.spdx",
            VerificationError {
                violations: vec![Violation::MissingNamespace],
            },
        );
        assert!(err.to_string().starts_with("Failed verification"));
    }

    #[test]
    fn test_io_error_names_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = FinderError::io("/path/to/doc.spdx", io_err);
        assert!(err.to_string().contains("/path/to/doc.spdx"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> std::result::Result<(), ParseError> {
            Err(ParseError::OrphanValue { line: 3 })
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(FinderError::Parse { context, source }) => {
                assert_eq!(context, "outer layer: middle layer");
                assert!(matches!(source, ParseError::OrphanValue { line: 3 }));
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(FinderError::config("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("outer", "middle: inner"), "outer: middle: inner");
    }
}
