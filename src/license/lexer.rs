//! Tokenizer for SPDX license expressions.

use super::LicenseParseError;

/// A lexical token with its byte offset in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    OpenParen,
    CloseParen,
    And,
    Or,
    With,
    /// License or exception identifier, `+` suffix included
    Ident(&'a str),
}

impl std::fmt::Display for TokenKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenParen => write!(f, "'('"),
            Self::CloseParen => write!(f, "')'"),
            Self::And => write!(f, "AND"),
            Self::Or => write!(f, "OR"),
            Self::With => write!(f, "WITH"),
            Self::Ident(id) => write!(f, "'{id}'"),
        }
    }
}

const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '+' | ':')
}

/// Split an expression into tokens.
///
/// Operators are recognized regardless of case.
pub fn tokenize(text: &str) -> Result<Vec<Token<'_>>, LicenseParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let kind = match c {
            '(' => {
                chars.next();
                TokenKind::OpenParen
            }
            ')' => {
                chars.next();
                TokenKind::CloseParen
            }
            c if is_ident_char(c) => {
                let mut end = offset;
                while let Some(&(i, c)) = chars.peek() {
                    if !is_ident_char(c) {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                let word = &text[offset..end];
                if word.eq_ignore_ascii_case("AND") {
                    TokenKind::And
                } else if word.eq_ignore_ascii_case("OR") {
                    TokenKind::Or
                } else if word.eq_ignore_ascii_case("WITH") {
                    TokenKind::With
                } else {
                    TokenKind::Ident(word)
                }
            }
            other => {
                return Err(LicenseParseError::InvalidCharacter {
                    character: other,
                    offset,
                })
            }
        };

        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind<'_>> {
        tokenize(text)
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_simple_or() {
        assert_eq!(
            kinds("Apache-2.0 OR MIT"),
            vec![
                TokenKind::Ident("Apache-2.0"),
                TokenKind::Or,
                TokenKind::Ident("MIT")
            ]
        );
    }

    #[test]
    fn test_parens_without_spaces() {
        assert_eq!(
            kinds("(MIT or Apache-2.0)and ISC"),
            vec![
                TokenKind::OpenParen,
                TokenKind::Ident("MIT"),
                TokenKind::Or,
                TokenKind::Ident("Apache-2.0"),
                TokenKind::CloseParen,
                TokenKind::And,
                TokenKind::Ident("ISC"),
            ]
        );
    }

    #[test]
    fn test_plus_and_document_ref() {
        assert_eq!(
            kinds("GPL-2.0+ WITH Classpath-exception-2.0 AND DocumentRef-x:LicenseRef-y"),
            vec![
                TokenKind::Ident("GPL-2.0+"),
                TokenKind::With,
                TokenKind::Ident("Classpath-exception-2.0"),
                TokenKind::And,
                TokenKind::Ident("DocumentRef-x:LicenseRef-y"),
            ]
        );
    }

    #[test]
    fn test_offsets() {
        let tokens = tokenize("  MIT").expect("tokenize");
        assert_eq!(tokens[0].offset, 2);
    }

    #[test]
    fn test_invalid_character() {
        let err = tokenize("MIT / Apache-2.0").unwrap_err();
        assert!(matches!(
            err,
            LicenseParseError::InvalidCharacter {
                character: '/',
                offset: 4
            }
        ));
    }
}
