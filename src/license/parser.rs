//! Recursive-descent parser for SPDX license expressions.
//!
//! Precedence, tightest first: `WITH`, `AND`, `OR`. Binary operators are
//! left-associative and parentheses group.

use super::lexer::{tokenize, Token, TokenKind};
use super::{LicenseCatalog, LicenseParseError};
use crate::model::{LicenseExpression, LicenseItem, LicenseReq};

const LICENSE_REF_PREFIX: &str = "LicenseRef-";
const DOCUMENT_REF_PREFIX: &str = "DocumentRef-";

/// Deepest parenthesis nesting accepted.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Most tokens accepted in one expression. Operator chains build a
/// tree as deep as they are long, so this bounds recursion on drop and
/// display as well.
pub const MAX_EXPRESSION_TOKENS: usize = 4096;

/// Parse `text` into an expression, resolving identifiers through `catalog`.
pub fn parse_expression(
    text: &str,
    catalog: &LicenseCatalog,
) -> Result<LicenseExpression, LicenseParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LicenseParseError::Empty);
    }
    if trimmed.eq_ignore_ascii_case("NOASSERTION") {
        return Ok(LicenseExpression::NoAssertion);
    }
    if trimmed.eq_ignore_ascii_case("NONE") {
        return Ok(LicenseExpression::None);
    }

    let tokens = tokenize(text)?;
    if tokens.len() > MAX_EXPRESSION_TOKENS {
        return Err(LicenseParseError::TooManyTokens {
            count: tokens.len(),
            limit: MAX_EXPRESSION_TOKENS,
        });
    }
    let mut parser = ExpressionParser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
        catalog,
    };

    let expr = parser.parse_or()?;
    match parser.peek() {
        None => Ok(expr),
        Some(Token {
            kind: TokenKind::CloseParen,
            offset,
        }) => Err(LicenseParseError::UnbalancedParenthesis { offset: *offset }),
        Some(token) => Err(LicenseParseError::UnexpectedToken {
            found: token.kind.to_string(),
            offset: token.offset,
            expected: "AND, OR or end of expression",
        }),
    }
}

struct ExpressionParser<'t, 'a, 'c> {
    tokens: &'t [Token<'a>],
    pos: usize,
    depth: usize,
    catalog: &'c LicenseCatalog,
}

impl<'a> ExpressionParser<'_, 'a, '_> {
    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind<'_>) -> bool {
        if self.peek().is_some_and(|t| t.kind == kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<LicenseExpression, LicenseParseError> {
        let mut lhs = self.parse_and()?;
        while self.eat(TokenKind::Or) {
            let rhs = self.parse_and()?;
            lhs = LicenseExpression::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<LicenseExpression, LicenseParseError> {
        let mut lhs = self.parse_with()?;
        while self.eat(TokenKind::And) {
            let rhs = self.parse_with()?;
            lhs = LicenseExpression::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_with(&mut self) -> Result<LicenseExpression, LicenseParseError> {
        let token = self.next().ok_or(LicenseParseError::UnexpectedEnd {
            expected: "license identifier or '('",
        })?;

        match token.kind {
            TokenKind::OpenParen => {
                if self.depth == MAX_NESTING_DEPTH {
                    return Err(LicenseParseError::NestingTooDeep {
                        offset: token.offset,
                        limit: MAX_NESTING_DEPTH,
                    });
                }
                self.depth += 1;
                let inner = self.parse_or()?;
                self.depth -= 1;
                if !self.eat(TokenKind::CloseParen) {
                    return Err(LicenseParseError::UnbalancedParenthesis {
                        offset: token.offset,
                    });
                }
                Ok(inner)
            }
            TokenKind::Ident(id) => {
                let license = self.resolve_license(id, token.offset)?;
                let exception = if self.eat(TokenKind::With) {
                    Some(self.parse_exception()?)
                } else {
                    None
                };
                Ok(LicenseExpression::Req(LicenseReq { license, exception }))
            }
            other => Err(LicenseParseError::UnexpectedToken {
                found: other.to_string(),
                offset: token.offset,
                expected: "license identifier or '('",
            }),
        }
    }

    fn parse_exception(&mut self) -> Result<String, LicenseParseError> {
        match self.next() {
            Some(Token {
                kind: TokenKind::Ident(id),
                offset,
            }) => self
                .catalog
                .canonical_exception(id)
                .map(str::to_string)
                .ok_or_else(|| LicenseParseError::UnknownException {
                    id: id.to_string(),
                    offset,
                }),
            Some(token) => Err(LicenseParseError::UnexpectedToken {
                found: token.kind.to_string(),
                offset: token.offset,
                expected: "exception identifier",
            }),
            None => Err(LicenseParseError::UnexpectedEnd {
                expected: "exception identifier",
            }),
        }
    }

    fn resolve_license(&self, id: &str, offset: usize) -> Result<LicenseItem, LicenseParseError> {
        if id.eq_ignore_ascii_case("NOASSERTION") || id.eq_ignore_ascii_case("NONE") {
            return Err(LicenseParseError::MisplacedSpecialValue {
                value: id.to_string(),
                offset,
            });
        }

        if let Some(item) = parse_license_ref(id) {
            return item.map_err(|()| LicenseParseError::InvalidLicenseRef {
                id: id.to_string(),
                offset,
            });
        }

        // Deprecated identifiers such as `GPL-2.0+` carry the plus themselves
        if let Some(canonical) = self.catalog.canonicalize(id) {
            return Ok(LicenseItem::Spdx {
                id: canonical.to_string(),
                or_later: false,
            });
        }

        if let Some(base) = id.strip_suffix('+') {
            if let Some(canonical) = self.catalog.canonicalize(base) {
                return Ok(LicenseItem::Spdx {
                    id: canonical.to_string(),
                    or_later: true,
                });
            }
        }

        Err(LicenseParseError::UnknownLicense {
            id: id.to_string(),
            offset,
        })
    }
}

/// `Some(Ok)` for a well-formed reference, `Some(Err)` for one that starts
/// like a reference but is malformed, `None` when `id` is not a reference.
fn parse_license_ref(id: &str) -> Option<Result<LicenseItem, ()>> {
    let has_prefix = |s: &str, prefix: &str| {
        s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix)
    };
    let valid_idstring =
        |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');

    if has_prefix(id, DOCUMENT_REF_PREFIX) {
        let parsed = id.split_once(':').and_then(|(doc, lic)| {
            let doc_ok = valid_idstring(&doc[DOCUMENT_REF_PREFIX.len()..]);
            let lic_ok = has_prefix(lic, LICENSE_REF_PREFIX)
                && valid_idstring(&lic[LICENSE_REF_PREFIX.len()..]);
            (doc_ok && lic_ok).then(|| LicenseItem::Other {
                document_ref: Some(doc.to_string()),
                license_ref: lic.to_string(),
            })
        });
        return Some(parsed.ok_or(()));
    }

    if has_prefix(id, LICENSE_REF_PREFIX) {
        let item = valid_idstring(&id[LICENSE_REF_PREFIX.len()..]).then(|| LicenseItem::Other {
            document_ref: None,
            license_ref: id.to_string(),
        });
        return Some(item.ok_or(()));
    }

    None
}
