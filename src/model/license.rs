//! License expression tree and equivalence.
//!
//! Expressions are produced by [`crate::license::parse_expression`], which
//! resolves every identifier against a [`crate::license::LicenseCatalog`].
//! Identifiers stored here are therefore already canonical: catalog casing,
//! deprecated aliases replaced.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single license term: an SPDX-listed identifier or a user-defined reference.
///
/// User-defined references compare and hash without regard to ASCII case,
/// so `LicenseRef-Foo` and `licenseref-foo` are one set member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LicenseItem {
    /// An identifier from the license catalog, in canonical spelling
    Spdx {
        id: String,
        /// Trailing `+` ("this version or any later version")
        or_later: bool,
    },
    /// `LicenseRef-…`, optionally qualified by `DocumentRef-…:`
    Other {
        document_ref: Option<String>,
        license_ref: String,
    },
}

impl LicenseItem {
    /// Same license term, ignoring ASCII case for user-defined references.
    fn same_as(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::Spdx { id, or_later },
                Self::Spdx {
                    id: other_id,
                    or_later: other_or_later,
                },
            ) => id == other_id && or_later == other_or_later,
            (
                Self::Other {
                    document_ref,
                    license_ref,
                },
                Self::Other {
                    document_ref: other_doc,
                    license_ref: other_ref,
                },
            ) => {
                let docs_match = match (document_ref, other_doc) {
                    (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                    (None, None) => true,
                    _ => false,
                };
                docs_match && license_ref.eq_ignore_ascii_case(other_ref)
            }
            _ => false,
        }
    }
}

impl PartialEq for LicenseItem {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

impl Eq for LicenseItem {}

impl Hash for LicenseItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Spdx { id, or_later } => {
                state.write_u8(0);
                id.hash(state);
                or_later.hash(state);
            }
            Self::Other {
                document_ref,
                license_ref,
            } => {
                state.write_u8(1);
                match document_ref {
                    Some(doc) => {
                        state.write_u8(1);
                        hash_ignore_case(doc, state);
                    }
                    None => state.write_u8(0),
                }
                hash_ignore_case(license_ref, state);
            }
        }
    }
}

fn hash_ignore_case<H: Hasher>(s: &str, state: &mut H) {
    for b in s.bytes() {
        state.write_u8(b.to_ascii_lowercase());
    }
    state.write_u8(0xff);
}

impl fmt::Display for LicenseItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spdx { id, or_later } => {
                write!(f, "{id}")?;
                if *or_later {
                    write!(f, "+")?;
                }
                Ok(())
            }
            Self::Other {
                document_ref: Some(doc),
                license_ref,
            } => write!(f, "{doc}:{license_ref}"),
            Self::Other {
                document_ref: None,
                license_ref,
            } => write!(f, "{license_ref}"),
        }
    }
}

/// A license term with an optional exception (`<license> WITH <exception>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LicenseReq {
    pub license: LicenseItem,
    pub exception: Option<String>,
}

impl LicenseReq {
    /// A requirement without an exception
    pub const fn new(license: LicenseItem) -> Self {
        Self {
            license,
            exception: None,
        }
    }
}

impl fmt::Display for LicenseReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.exception {
            Some(exception) => write!(f, "{} WITH {exception}", self.license),
            None => write!(f, "{}", self.license),
        }
    }
}

/// Parsed SPDX license expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseExpression {
    /// `NOASSERTION`
    NoAssertion,
    /// `NONE`
    None,
    /// A single license term, possibly carrying an exception
    Req(LicenseReq),
    /// Conjunction: all of the operands apply
    And(Box<LicenseExpression>, Box<LicenseExpression>),
    /// Disjunction: the licensee may choose
    Or(Box<LicenseExpression>, Box<LicenseExpression>),
}

impl LicenseExpression {
    /// Expression for a single canonical catalog identifier.
    pub fn spdx_id(id: impl Into<String>) -> Self {
        Self::Req(LicenseReq::new(LicenseItem::Spdx {
            id: id.into(),
            or_later: false,
        }))
    }

    /// The bare license term, if this expression is exactly one identifier
    /// with no exception and no operators.
    #[must_use]
    pub const fn as_bare_identifier(&self) -> Option<&LicenseItem> {
        match self {
            Self::Req(LicenseReq {
                license,
                exception: None,
            }) => Some(license),
            _ => None,
        }
    }

    /// Whether this expression combines terms with `AND` / `OR`.
    #[must_use]
    pub const fn is_compound(&self) -> bool {
        matches!(self, Self::And(..) | Self::Or(..))
    }

    /// Equivalence as used by file predicates.
    ///
    /// Only bare identifiers are comparable: two expressions are equivalent
    /// when both are a single identifier with the same canonical form.
    /// Compound or `WITH` expressions are never equivalent to anything, so
    /// `A OR B` does not equal `B OR A` here. `NOASSERTION` and `NONE` are
    /// each equivalent only to themselves.
    #[must_use]
    pub fn equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NoAssertion, Self::NoAssertion) | (Self::None, Self::None) => true,
            _ => match (self.as_bare_identifier(), other.as_bare_identifier()) {
                (Some(a), Some(b)) => a.same_as(b),
                _ => false,
            },
        }
    }

    /// All license terms referenced by the expression, left to right.
    #[must_use]
    pub fn requirements(&self) -> Vec<&LicenseReq> {
        let mut reqs = Vec::new();
        self.collect_requirements(&mut reqs);
        reqs
    }

    fn collect_requirements<'a>(&'a self, out: &mut Vec<&'a LicenseReq>) {
        match self {
            Self::Req(req) => out.push(req),
            Self::And(lhs, rhs) | Self::Or(lhs, rhs) => {
                lhs.collect_requirements(out);
                rhs.collect_requirements(out);
            }
            Self::NoAssertion | Self::None => {}
        }
    }

    const fn precedence(&self) -> u8 {
        match self {
            Self::Or(..) => 1,
            Self::And(..) => 2,
            _ => 3,
        }
    }

    fn fmt_operand(&self, operand: &Self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if operand.precedence() < self.precedence() {
            write!(f, "({operand})")
        } else {
            write!(f, "{operand}")
        }
    }
}

impl fmt::Display for LicenseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAssertion => write!(f, "NOASSERTION"),
            Self::None => write!(f, "NONE"),
            Self::Req(req) => write!(f, "{req}"),
            Self::And(lhs, rhs) => {
                self.fmt_operand(lhs, f)?;
                write!(f, " AND ")?;
                self.fmt_operand(rhs, f)
            }
            Self::Or(lhs, rhs) => {
                self.fmt_operand(lhs, f)?;
                write!(f, " OR ")?;
                self.fmt_operand(rhs, f)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn license_ref(name: &str) -> LicenseExpression {
        LicenseExpression::Req(LicenseReq::new(LicenseItem::Other {
            document_ref: None,
            license_ref: name.to_string(),
        }))
    }

    #[test]
    fn test_bare_identifiers_equivalent() {
        let a = LicenseExpression::spdx_id("MIT");
        let b = LicenseExpression::spdx_id("MIT");
        assert!(a.equivalent(&b));
        assert!(!a.equivalent(&LicenseExpression::spdx_id("Apache-2.0")));
    }

    #[test]
    fn test_or_later_is_a_different_license() {
        let plain = LicenseExpression::spdx_id("GPL-2.0-only");
        let later = LicenseExpression::Req(LicenseReq::new(LicenseItem::Spdx {
            id: "GPL-2.0-only".to_string(),
            or_later: true,
        }));
        assert!(!plain.equivalent(&later));
    }

    #[test]
    fn test_compound_never_equivalent() {
        let or = LicenseExpression::Or(
            Box::new(LicenseExpression::spdx_id("Apache-2.0")),
            Box::new(LicenseExpression::spdx_id("MIT")),
        );
        assert!(!or.equivalent(&or.clone()));
        assert!(!or.equivalent(&LicenseExpression::spdx_id("MIT")));
        assert!(or.is_compound());
    }

    #[test]
    fn test_with_exception_not_bare() {
        let with = LicenseExpression::Req(LicenseReq {
            license: LicenseItem::Spdx {
                id: "Apache-2.0".to_string(),
                or_later: false,
            },
            exception: Some("LLVM-exception".to_string()),
        });
        assert!(with.as_bare_identifier().is_none());
        assert!(!with.equivalent(&LicenseExpression::spdx_id("Apache-2.0")));
    }

    #[test]
    fn test_license_refs_ignore_case() {
        assert!(license_ref("LicenseRef-Foo").equivalent(&license_ref("licenseref-foo")));
        assert!(!license_ref("LicenseRef-Foo").equivalent(&license_ref("LicenseRef-Bar")));
    }

    #[test]
    fn test_special_values() {
        assert!(LicenseExpression::NoAssertion.equivalent(&LicenseExpression::NoAssertion));
        assert!(!LicenseExpression::NoAssertion.equivalent(&LicenseExpression::None));
        assert!(!LicenseExpression::None.equivalent(&LicenseExpression::spdx_id("MIT")));
    }

    #[test]
    fn test_display_parenthesizes_lower_precedence() {
        let expr = LicenseExpression::And(
            Box::new(LicenseExpression::Or(
                Box::new(LicenseExpression::spdx_id("MIT")),
                Box::new(LicenseExpression::spdx_id("Apache-2.0")),
            )),
            Box::new(LicenseExpression::spdx_id("Unicode-DFS-2016")),
        );
        assert_eq!(expr.to_string(), "(MIT OR Apache-2.0) AND Unicode-DFS-2016");
        assert_eq!(expr.requirements().len(), 3);
    }
}
