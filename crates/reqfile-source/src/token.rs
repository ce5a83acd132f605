//! Token kinds and classification, shared by the scanner, the parser, and the AST.
//!
//! `Token` lives here rather than in the parser crate because the AST stores
//! `start_token`/`end_token` pairs on every node (per the position model both
//! layers share), so the AST crate needs the type too; keeping it in the
//! lowest crate in the dependency graph avoids a cycle.

use std::fmt;

use serde::Serialize;

/// The closed set of token kinds the scanner can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
pub enum TokenKind {
    /// End of input; emitted exactly once, always the last token.
    Eof,
    /// A lexical error; terminal for a given scan.
    Error,
    /// A `#`-prefixed line comment (or the doc comment attached to a request).
    Comment,
    /// The request separator `###`.
    Separator,
    /// `@`, introducing a variable or prompt declaration.
    At,
    /// An identifier, or a keyword's spelling when `keyword()` didn't match.
    Ident,
    /// `=`.
    Eq,
    /// `:`.
    Colon,
    /// `<`, introducing a body-from-file or response reference.
    LeftAngle,
    /// `>`, introducing a response redirect.
    RightAngle,
    /// `<>`, the response-reference marker.
    ResponseRef,
    /// Plain text content (variable values, prompt descriptions, header values).
    Text,
    /// Request body content.
    Body,
    /// URL content.
    #[serde(rename = "URL")]
    Url,
    /// An `HTTP/x.y` version literal.
    #[serde(rename = "HTTPVersion")]
    HttpVersion,
    /// A header name, preceding its `:` and value.
    Header,
    /// `{{`, opening an interpolation.
    OpenInterp,
    /// `}}`, closing an interpolation.
    CloseInterp,
    /// The `name` keyword.
    #[serde(rename = "Name")]
    KwName,
    /// The `prompt` keyword.
    #[serde(rename = "Prompt")]
    KwPrompt,
    /// The `timeout` keyword.
    #[serde(rename = "Timeout")]
    KwTimeout,
    /// The `connection-timeout` keyword.
    #[serde(rename = "ConnectionTimeout")]
    KwConnectionTimeout,
    /// The `no-redirect` keyword.
    #[serde(rename = "NoRedirect")]
    KwNoRedirect,
    /// `GET`.
    MethodGet,
    /// `HEAD`.
    MethodHead,
    /// `POST`.
    MethodPost,
    /// `PUT`.
    MethodPut,
    /// `DELETE`.
    MethodDelete,
    /// `CONNECT`.
    MethodConnect,
    /// `PATCH`.
    MethodPatch,
    /// `OPTIONS`.
    MethodOptions,
    /// `TRACE`.
    MethodTrace,
}

impl TokenKind {
    const METHODS: [Self; 9] = [
        Self::MethodGet,
        Self::MethodHead,
        Self::MethodPost,
        Self::MethodPut,
        Self::MethodDelete,
        Self::MethodConnect,
        Self::MethodPatch,
        Self::MethodOptions,
        Self::MethodTrace,
    ];

    /// The identifier-style spelling used in diagnostics and test fixtures (e.g. `MethodGet`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Eof => "Eof",
            Self::Error => "Error",
            Self::Comment => "Comment",
            Self::Separator => "Separator",
            Self::At => "At",
            Self::Ident => "Ident",
            Self::Eq => "Eq",
            Self::Colon => "Colon",
            Self::LeftAngle => "LeftAngle",
            Self::RightAngle => "RightAngle",
            Self::ResponseRef => "ResponseRef",
            Self::Text => "Text",
            Self::Body => "Body",
            Self::Url => "URL",
            Self::HttpVersion => "HTTPVersion",
            Self::Header => "Header",
            Self::OpenInterp => "OpenInterp",
            Self::CloseInterp => "CloseInterp",
            Self::KwName => "Name",
            Self::KwPrompt => "Prompt",
            Self::KwTimeout => "Timeout",
            Self::KwConnectionTimeout => "ConnectionTimeout",
            Self::KwNoRedirect => "NoRedirect",
            Self::MethodGet => "MethodGet",
            Self::MethodHead => "MethodHead",
            Self::MethodPost => "MethodPost",
            Self::MethodPut => "MethodPut",
            Self::MethodDelete => "MethodDelete",
            Self::MethodConnect => "MethodConnect",
            Self::MethodPatch => "MethodPatch",
            Self::MethodOptions => "MethodOptions",
            Self::MethodTrace => "MethodTrace",
        }
    }

    /// Whether this kind is one of the nine HTTP method kinds.
    #[must_use]
    pub fn is_method(self) -> bool { Self::METHODS.contains(&self) }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.name()) }
}

/// Exact, case-sensitive match of `text` against the nine HTTP method spellings.
///
/// Returns `(TokenKind::Text, false)` on no match, mirroring `keyword()`.
#[must_use]
pub fn method(text: &str) -> (TokenKind, bool) {
    match text {
        "GET" => (TokenKind::MethodGet, true),
        "HEAD" => (TokenKind::MethodHead, true),
        "POST" => (TokenKind::MethodPost, true),
        "PUT" => (TokenKind::MethodPut, true),
        "DELETE" => (TokenKind::MethodDelete, true),
        "CONNECT" => (TokenKind::MethodConnect, true),
        "PATCH" => (TokenKind::MethodPatch, true),
        "OPTIONS" => (TokenKind::MethodOptions, true),
        "TRACE" => (TokenKind::MethodTrace, true),
        _ => (TokenKind::Text, false),
    }
}

/// Exact, case-sensitive match of `text` against the request-local declaration keywords.
///
/// Returns `(TokenKind::Ident, false)` on no match.
#[must_use]
pub fn keyword(text: &str) -> (TokenKind, bool) {
    match text {
        "name" => (TokenKind::KwName, true),
        "prompt" => (TokenKind::KwPrompt, true),
        "timeout" => (TokenKind::KwTimeout, true),
        "connection-timeout" => (TokenKind::KwConnectionTimeout, true),
        "no-redirect" => (TokenKind::KwNoRedirect, true),
        _ => (TokenKind::Ident, false),
    }
}

/// A single token: a kind and the byte range of source it covers.
///
/// Token text is resolved on demand by slicing the source (`Token::text`)
/// rather than stored inline, so tokens stay cheap to copy and move through
/// the scanner's channel/queue or the parser's two-token lookahead buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    /// The token's kind.
    pub kind: TokenKind,
    /// Start byte offset, inclusive.
    pub start: usize,
    /// End byte offset, exclusive. Always `>= start`.
    pub end: usize,
}

impl Token {
    /// Creates a new token covering `[start, end)`.
    #[must_use]
    pub const fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// The source text this token covers.
    #[must_use]
    pub fn text<'src>(&self, src: &'src str) -> &'src str { &src[self.start..self.end] }

    /// Whether this token's kind is any of `kinds`.
    #[must_use]
    pub fn is(&self, kinds: &[TokenKind]) -> bool { kinds.contains(&self.kind) }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Token::{} start={}, end={}>", self.kind.name(), self.start, self.end)
    }
}
