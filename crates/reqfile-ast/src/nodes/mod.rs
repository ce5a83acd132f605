//! Node type definitions for statements and expressions.
//!
//! Grouped in a single module rather than split one-file-per-category the
//! way a general-purpose language front-end would: the whole tree here is a
//! little over a dozen node shapes.

use reqfile_source::Token;
use serde::Serialize;

/// High-level categorisation of a node; matches its concrete struct name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    VarStatement,
    PromptStatement,
    Comment,
    Request,
    Method,
    #[serde(rename = "HTTPVersion")]
    HttpVersion,
    Header,
    ResponseRedirect,
    ResponseReference,
    Ident,
    TextLiteral,
    #[serde(rename = "URL")]
    Url,
    Body,
    BodyFile,
    Interp,
    InterpolatedExpression,
    File,
}

/// Common accessors every AST node exposes.
///
/// A node's source range is `[start_token().start, end_token().end)`.
pub trait AstNode {
    /// The first token this node covers.
    fn start_token(&self) -> Token;
    /// The last token this node covers.
    fn end_token(&self) -> Token;
    /// This node's kind tag.
    fn kind(&self) -> NodeKind;
}

// ============================================================================
// Expressions
// ============================================================================

/// A bare identifier: a variable name or an interpolation target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub name: String,
    pub token: Token,
}

impl Ident {
    #[must_use]
    pub const fn new(name: String, token: Token) -> Self { Self { name, token } }
}

impl AstNode for Ident {
    fn start_token(&self) -> Token { self.token }

    fn end_token(&self) -> Token { self.token }

    fn kind(&self) -> NodeKind { NodeKind::Ident }
}

/// A run of literal text: a variable value, a prompt description, a header value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLiteral {
    pub value: String,
    pub token: Token,
}

impl TextLiteral {
    #[must_use]
    pub const fn new(value: String, token: Token) -> Self { Self { value, token } }
}

impl AstNode for TextLiteral {
    fn start_token(&self) -> Token { self.token }

    fn end_token(&self) -> Token { self.token }

    fn kind(&self) -> NodeKind { NodeKind::TextLiteral }
}

/// URL content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Url {
    pub value: String,
    pub token: Token,
}

impl Url {
    #[must_use]
    pub const fn new(value: String, token: Token) -> Self { Self { value, token } }
}

impl AstNode for Url {
    fn start_token(&self) -> Token { self.token }

    fn end_token(&self) -> Token { self.token }

    fn kind(&self) -> NodeKind { NodeKind::Url }
}

/// Request body content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Body {
    pub value: String,
    pub token: Token,
}

impl Body {
    #[must_use]
    pub const fn new(value: String, token: Token) -> Self { Self { value, token } }
}

impl AstNode for Body {
    fn start_token(&self) -> Token { self.token }

    fn end_token(&self) -> Token { self.token }

    fn kind(&self) -> NodeKind { NodeKind::Body }
}

/// `< <filepath>` — a request body sourced from a file.
#[derive(Debug, Clone, Serialize)]
pub struct BodyFile {
    pub token: Token,
    pub value: Option<Expression>,
}

impl BodyFile {
    #[must_use]
    pub const fn new(token: Token, value: Option<Expression>) -> Self { Self { token, value } }
}

impl AstNode for BodyFile {
    fn start_token(&self) -> Token { self.token }

    fn end_token(&self) -> Token {
        self.value.as_ref().map_or(self.token, AstNode::end_token)
    }

    fn kind(&self) -> NodeKind { NodeKind::BodyFile }
}

/// `{{ expr }}`.
#[derive(Debug, Clone, Serialize)]
pub struct Interp {
    pub open_token: Token,
    pub expr: Expression,
    pub close_token: Token,
}

impl Interp {
    #[must_use]
    pub const fn new(open_token: Token, expr: Expression, close_token: Token) -> Self {
        Self { open_token, expr, close_token }
    }
}

impl AstNode for Interp {
    fn start_token(&self) -> Token { self.open_token }

    fn end_token(&self) -> Token { self.close_token }

    fn kind(&self) -> NodeKind { NodeKind::Interp }
}

/// A three-way composition of an interpolation with optional text either side.
///
/// `interp` is always present; `left` and `right` are each independently
/// optional, so `{{ a }}`, `prefix{{ a }}`, `{{ a }}suffix`, and
/// `prefix{{ a }}suffix` are all representable.
#[derive(Debug, Clone, Serialize)]
pub struct InterpolatedExpression {
    pub left: Option<Expression>,
    pub interp: Interp,
    pub right: Option<Expression>,
}

impl InterpolatedExpression {
    #[must_use]
    pub const fn new(
        left: Option<Expression>,
        interp: Interp,
        right: Option<Expression>,
    ) -> Self {
        Self { left, interp, right }
    }
}

impl AstNode for InterpolatedExpression {
    fn start_token(&self) -> Token {
        self.left.as_ref().map_or_else(|| self.interp.start_token(), AstNode::start_token)
    }

    fn end_token(&self) -> Token {
        self.right.as_ref().map_or_else(|| self.interp.end_token(), AstNode::end_token)
    }

    fn kind(&self) -> NodeKind { NodeKind::InterpolatedExpression }
}

/// The expression sum type.
///
/// Recursive children are boxed inline in each variant, so `Expression`
/// itself stays pointer-sized and types that hold it (`Option<Expression>`,
/// `Vec<Expression>`) don't need an extra indirection layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum Expression {
    Ident(Box<Ident>),
    TextLiteral(Box<TextLiteral>),
    #[serde(rename = "URL")]
    Url(Box<Url>),
    Body(Box<Body>),
    BodyFile(Box<BodyFile>),
    Interp(Box<Interp>),
    InterpolatedExpression(Box<InterpolatedExpression>),
}

impl AstNode for Expression {
    fn start_token(&self) -> Token {
        match self {
            Self::Ident(n) => n.start_token(),
            Self::TextLiteral(n) => n.start_token(),
            Self::Url(n) => n.start_token(),
            Self::Body(n) => n.start_token(),
            Self::BodyFile(n) => n.start_token(),
            Self::Interp(n) => n.start_token(),
            Self::InterpolatedExpression(n) => n.start_token(),
        }
    }

    fn end_token(&self) -> Token {
        match self {
            Self::Ident(n) => n.end_token(),
            Self::TextLiteral(n) => n.end_token(),
            Self::Url(n) => n.end_token(),
            Self::Body(n) => n.end_token(),
            Self::BodyFile(n) => n.end_token(),
            Self::Interp(n) => n.end_token(),
            Self::InterpolatedExpression(n) => n.end_token(),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Self::Ident(n) => n.kind(),
            Self::TextLiteral(n) => n.kind(),
            Self::Url(n) => n.kind(),
            Self::Body(n) => n.kind(),
            Self::BodyFile(n) => n.kind(),
            Self::Interp(n) => n.kind(),
            Self::InterpolatedExpression(n) => n.kind(),
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// `@<keyword|ident> [=] <expression>` — a request-local or file-level variable.
///
/// When `ident.name` is one of the keyword spellings (`name`, `timeout`,
/// `connection-timeout`), downstream resolution treats it specially. A
/// missing `value` is legal outside `@no-redirect` per the source corpus's
/// more permissive code paths; resolution decides what to do with it.
#[derive(Debug, Clone, Serialize)]
pub struct VarStatement {
    pub at_token: Token,
    pub ident: Ident,
    pub value: Option<Expression>,
}

impl VarStatement {
    #[must_use]
    pub const fn new(at_token: Token, ident: Ident, value: Option<Expression>) -> Self {
        Self { at_token, ident, value }
    }
}

impl AstNode for VarStatement {
    fn start_token(&self) -> Token { self.at_token }

    fn end_token(&self) -> Token {
        self.value.as_ref().map_or_else(|| self.ident.end_token(), AstNode::end_token)
    }

    fn kind(&self) -> NodeKind { NodeKind::VarStatement }
}

/// `@prompt <ident> [<description text>]`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptStatement {
    pub at_token: Token,
    pub ident: Ident,
    pub description: Option<TextLiteral>,
}

impl PromptStatement {
    #[must_use]
    pub const fn new(at_token: Token, ident: Ident, description: Option<TextLiteral>) -> Self {
        Self { at_token, ident, description }
    }
}

impl AstNode for PromptStatement {
    fn start_token(&self) -> Token { self.at_token }

    fn end_token(&self) -> Token {
        self.description.as_ref().map_or_else(|| self.ident.end_token(), AstNode::end_token)
    }

    fn kind(&self) -> NodeKind { NodeKind::PromptStatement }
}

/// A `#`-prefixed line comment. Immediately preceding a `Separator`, it
/// becomes that request's doc comment.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub token: Token,
    pub text: String,
}

impl Comment {
    #[must_use]
    pub const fn new(token: Token, text: String) -> Self { Self { token, text } }
}

impl AstNode for Comment {
    fn start_token(&self) -> Token { self.token }

    fn end_token(&self) -> Token { self.token }

    fn kind(&self) -> NodeKind { NodeKind::Comment }
}

/// One of the nine HTTP method kinds.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Method {
    pub token: Token,
}

impl Method {
    #[must_use]
    pub const fn new(token: Token) -> Self { Self { token } }
}

impl AstNode for Method {
    fn start_token(&self) -> Token { self.token }

    fn end_token(&self) -> Token { self.token }

    fn kind(&self) -> NodeKind { NodeKind::Method }
}

/// An `HTTP/x.y` version literal.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HttpVersion {
    pub token: Token,
}

impl HttpVersion {
    #[must_use]
    pub const fn new(token: Token) -> Self { Self { token } }
}

impl AstNode for HttpVersion {
    fn start_token(&self) -> Token { self.token }

    fn end_token(&self) -> Token { self.token }

    fn kind(&self) -> NodeKind { NodeKind::HttpVersion }
}

/// A request header: name, `:`, and value.
#[derive(Debug, Clone, Serialize)]
pub struct Header {
    pub token: Token,
    pub key: String,
    pub value: Expression,
}

impl Header {
    #[must_use]
    pub const fn new(token: Token, key: String, value: Expression) -> Self {
        Self { token, key, value }
    }
}

impl AstNode for Header {
    fn start_token(&self) -> Token { self.token }

    fn end_token(&self) -> Token { self.value.end_token() }

    fn kind(&self) -> NodeKind { NodeKind::Header }
}

/// `> <filepath>` — save the response body to a file.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseRedirect {
    pub token: Token,
    pub file: Option<Expression>,
}

impl ResponseRedirect {
    #[must_use]
    pub const fn new(token: Token, file: Option<Expression>) -> Self { Self { token, file } }
}

impl AstNode for ResponseRedirect {
    fn start_token(&self) -> Token { self.token }

    fn end_token(&self) -> Token { self.file.as_ref().map_or(self.token, AstNode::end_token) }

    fn kind(&self) -> NodeKind { NodeKind::ResponseRedirect }
}

/// `<> <filepath>` — compare the response body against a file.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseReference {
    pub token: Token,
    pub file: Option<Expression>,
}

impl ResponseReference {
    #[must_use]
    pub const fn new(token: Token, file: Option<Expression>) -> Self { Self { token, file } }
}

impl AstNode for ResponseReference {
    fn start_token(&self) -> Token { self.token }

    fn end_token(&self) -> Token { self.file.as_ref().map_or(self.token, AstNode::end_token) }

    fn kind(&self) -> NodeKind { NodeKind::ResponseReference }
}

/// A single named HTTP request, delimited by the preceding `###` separator
/// and running until the next separator or end of file.
///
/// A request that failed validation may still carry partial children — a
/// `method` with no `url`, headers collected before a malformed body — so
/// that editor tooling keeps as much as was successfully parsed.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub separator_token: Token,
    pub doc_comment: Option<Comment>,
    pub vars: Vec<VarStatement>,
    pub prompts: Vec<PromptStatement>,
    pub method: Method,
    pub url: Option<Expression>,
    pub http_version: Option<HttpVersion>,
    pub headers: Vec<Header>,
    pub body: Option<Expression>,
    pub response_redirect: Option<ResponseRedirect>,
    pub response_reference: Option<ResponseReference>,
}

impl Request {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        separator_token: Token,
        doc_comment: Option<Comment>,
        vars: Vec<VarStatement>,
        prompts: Vec<PromptStatement>,
        method: Method,
        url: Option<Expression>,
        http_version: Option<HttpVersion>,
        headers: Vec<Header>,
        body: Option<Expression>,
        response_redirect: Option<ResponseRedirect>,
        response_reference: Option<ResponseReference>,
    ) -> Self {
        Self {
            separator_token,
            doc_comment,
            vars,
            prompts,
            method,
            url,
            http_version,
            headers,
            body,
            response_redirect,
            response_reference,
        }
    }
}

impl AstNode for Request {
    fn start_token(&self) -> Token { self.separator_token }

    // The trailing response-redirect and response-reference may appear in
    // either order, so the true end is whichever present field's token
    // covers the furthest byte, not simply "the last field in source order".
    fn end_token(&self) -> Token {
        let mut end = self.method.end_token();
        for candidate in [
            self.url.as_ref().map(AstNode::end_token),
            self.http_version.as_ref().map(AstNode::end_token),
            self.headers.last().map(AstNode::end_token),
            self.body.as_ref().map(AstNode::end_token),
            self.response_redirect.as_ref().map(AstNode::end_token),
            self.response_reference.as_ref().map(AstNode::end_token),
        ]
        .into_iter()
        .flatten()
        {
            if candidate.end > end.end {
                end = candidate;
            }
        }
        end
    }

    fn kind(&self) -> NodeKind { NodeKind::Request }
}

/// The statement sum type.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum Statement {
    #[serde(rename = "VarStatement")]
    Var(Box<VarStatement>),
    #[serde(rename = "PromptStatement")]
    Prompt(Box<PromptStatement>),
    Comment(Box<Comment>),
    Request(Box<Request>),
}

impl AstNode for Statement {
    fn start_token(&self) -> Token {
        match self {
            Self::Var(n) => n.start_token(),
            Self::Prompt(n) => n.start_token(),
            Self::Comment(n) => n.start_token(),
            Self::Request(n) => n.start_token(),
        }
    }

    fn end_token(&self) -> Token {
        match self {
            Self::Var(n) => n.end_token(),
            Self::Prompt(n) => n.end_token(),
            Self::Comment(n) => n.end_token(),
            Self::Request(n) => n.end_token(),
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Self::Var(n) => n.kind(),
            Self::Prompt(n) => n.kind(),
            Self::Comment(n) => n.kind(),
            Self::Request(n) => n.kind(),
        }
    }
}

/// The top-level parse result: a named source and its statements in order.
#[derive(Debug, Clone, Serialize)]
pub struct File {
    pub name: String,
    pub statements: Vec<Statement>,
    eof_token: Token,
}

impl File {
    /// `eof_token` is the sentinel used for `start`/`end` when `statements` is empty.
    #[must_use]
    pub const fn new(name: String, statements: Vec<Statement>, eof_token: Token) -> Self {
        Self { name, statements, eof_token }
    }
}

impl AstNode for File {
    fn start_token(&self) -> Token {
        self.statements.first().map_or(self.eof_token, AstNode::start_token)
    }

    fn end_token(&self) -> Token {
        self.statements.last().map_or(self.eof_token, AstNode::end_token)
    }

    fn kind(&self) -> NodeKind { NodeKind::File }
}

#[cfg(test)]
mod tests {
    use reqfile_source::TokenKind;

    use super::*;

    fn tok(kind: TokenKind, start: usize, end: usize) -> Token { Token::new(kind, start, end) }

    #[test]
    fn empty_file_falls_back_to_eof_token() {
        let eof = tok(TokenKind::Eof, 0, 0);
        let file = File::new("empty.http".to_string(), vec![], eof);
        assert_eq!(file.start_token(), eof);
        assert_eq!(file.end_token(), eof);
    }

    #[test]
    fn var_statement_without_value_ends_at_ident() {
        let at = tok(TokenKind::At, 0, 1);
        let ident = Ident::new("no-redirect".to_string(), tok(TokenKind::Ident, 1, 12));
        let stmt = VarStatement::new(at, ident.clone(), None);
        assert_eq!(stmt.start_token(), at);
        assert_eq!(stmt.end_token(), ident.token);
    }

    #[test]
    fn request_end_token_picks_furthest_trailing_field_regardless_of_order() {
        let method = Method::new(tok(TokenKind::MethodGet, 7, 10));
        let url =
            Expression::Url(Box::new(Url::new("https://x".to_string(), tok(TokenKind::Url, 11, 20))));
        // response_reference appears lexically after response_redirect here, but
        // a reader could construct the reverse; end_token must not assume order.
        let redirect =
            ResponseRedirect::new(tok(TokenKind::RightAngle, 21, 22), None);
        let reference =
            ResponseReference::new(tok(TokenKind::ResponseRef, 23, 25), None);
        let request = Request::new(
            tok(TokenKind::Separator, 0, 3),
            None,
            vec![],
            vec![],
            method,
            Some(url),
            None,
            vec![],
            None,
            Some(redirect),
            Some(reference),
        );
        assert_eq!(request.end_token().end, 25);
    }

    #[test]
    fn interpolated_expression_spans_left_to_right() {
        let left = Expression::Url(Box::new(Url::new(
            "https://example.com/".to_string(),
            tok(TokenKind::Url, 0, 20),
        )));
        let interp = Interp::new(
            tok(TokenKind::OpenInterp, 20, 22),
            Expression::Ident(Box::new(Ident::new(
                "version".to_string(),
                tok(TokenKind::Ident, 23, 30),
            ))),
            tok(TokenKind::CloseInterp, 31, 33),
        );
        let right =
            Expression::Url(Box::new(Url::new("/items".to_string(), tok(TokenKind::Url, 33, 39))));
        let expr = InterpolatedExpression::new(Some(left), interp, Some(right));
        assert_eq!(expr.start_token().start, 0);
        assert_eq!(expr.end_token().end, 39);
    }
}
