//! Typed lexical and structural error kinds.
//!
//! Each variant knows how to render itself into the plain
//! `reqfile_source::Diagnostic` pair both the scanner and the parser emit, so
//! a caller matching on error *kind* — an editor deciding whether to offer a
//! quick-fix — isn't reduced to parsing message strings.

use reqfile_source::{Diagnostic, Position, TokenKind};
use thiserror::Error;

/// Errors the scanner can raise: malformed bytes, not malformed grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A byte sequence that isn't valid UTF-8.
    #[error("invalid utf8 character: {codepoint}")]
    InvalidUtf8 {
        /// The offending byte, rendered as `U+XX`.
        codepoint: String,
    },
    /// `{{` was opened but no matching `}}` was found before end of line or input.
    #[error("unterminated interpolation")]
    UnterminatedInterpolation,
    /// A character that cannot start any token in the current context.
    #[error("unexpected character '{found}'")]
    UnexpectedCharacter {
        /// The offending character.
        found: char,
    },
    /// An `HTTP/` literal not followed by a numeric version.
    #[error("malformed HTTP version literal")]
    MalformedHttpVersion,
    /// A header name on its own line, with no `:` to introduce its value.
    #[error("header is missing its ':'")]
    MissingHeaderColon,
}

impl LexError {
    /// Renders this error as a diagnostic anchored at `position`.
    #[must_use]
    pub fn at(self, position: Position) -> Diagnostic { Diagnostic::new(self.to_string(), position) }
}

/// Errors the parser can raise: the token stream is well-formed, the grammar isn't.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No statement rule recognises the current token as an opener.
    #[error("unrecognised statement, found {found}")]
    UnrecognisedStatement {
        /// The token kind that could not start a statement.
        found: TokenKind,
    },
    /// `expect()` found a token kind outside the accepted set.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What the grammar position accepts.
        expected: &'static str,
        /// What the scanner actually produced.
        found: TokenKind,
    },
    /// `expect()` ran out of input.
    #[error("expected {expected}, found end of file")]
    UnexpectedEof {
        /// What the grammar position accepts.
        expected: &'static str,
    },
    /// A request's method line never produced a recognised method token.
    #[error("request is missing its HTTP method")]
    MissingMethod,
    /// A request's method line had no URL.
    #[error("request is missing its URL")]
    MissingUrl,
    /// A variable declaration ended at `=` with nothing on the right-hand side.
    #[error("variable declaration is missing its value after '='")]
    MissingVariableValue,
}

impl ParseError {
    /// Renders this error as a diagnostic anchored at `position`.
    #[must_use]
    pub fn at(self, position: Position) -> Diagnostic { Diagnostic::new(self.to_string(), position) }
}
