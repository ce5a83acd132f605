//! Recursive-descent parser over the scanner's token stream.
//!
//! The grammar has no backtracking: every rule is chosen by the current
//! token (or the one after it, for the `@` / `@ prompt` split), and a rule
//! that can't complete reports one [`ParseError`] and lets the caller
//! recover by resynchronising at the next `###` or end of input. This
//! mirrors how the scanner treats lexical trouble: keep going, collect
//! diagnostics, never abort the whole parse over one bad statement.

use reqfile_ast::{
    Body, BodyFile, Comment, Expression, File, Header, HttpVersion, Ident, Interp,
    InterpolatedExpression, Method, PromptStatement, Request, ResponseRedirect,
    ResponseReference, Statement, TextLiteral, Url, VarStatement,
};
use reqfile_source::{Diagnostic, Position, Token, TokenKind};

use crate::diagnostics::ParseError;
use crate::lexer::Scanner;

/// Tuning knobs for a parse run.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Stop collecting diagnostics once this many have been recorded.
    /// `None` means unbounded.
    pub max_diagnostics: Option<usize>,
}

/// A recursive-descent parser with two-token lookahead.
pub struct Parser<'src> {
    name: String,
    src: &'src [u8],
    scanner: Scanner<'src>,
    current: Token,
    next: Token,
    diagnostics: Vec<Diagnostic>,
    options: ParserOptions,
    line_starts: Vec<usize>,
}

impl<'src> Parser<'src> {
    /// Creates a parser over `src`, named `name` for diagnostics.
    #[must_use]
    pub fn new(name: impl Into<String>, src: &'src [u8]) -> Self {
        Self::with_options(name, src, ParserOptions::default())
    }

    /// Creates a parser with explicit [`ParserOptions`].
    #[must_use]
    pub fn with_options(name: impl Into<String>, src: &'src [u8], options: ParserOptions) -> Self {
        let name = name.into();
        let mut scanner = Scanner::new(name.clone(), src);
        let current = scanner.scan();
        let next = scanner.scan();
        Self {
            name,
            src,
            scanner,
            current,
            next,
            diagnostics: Vec::new(),
            options,
            line_starts: compute_line_starts(src),
        }
    }

    /// Parses the whole input into a [`File`].
    pub fn parse(&mut self) -> File {
        let mut statements = Vec::new();
        // An `Error` token means the scanner has already closed the stream
        // (every remaining `scan()` call yields `Eof`); treat it the same as
        // `Eof` here so a leftover `Error` is never re-reported as an
        // unrecognised statement on top of the diagnostic the scanner already
        // raised.
        while !matches!(self.current.kind, TokenKind::Eof | TokenKind::Error) {
            match self.parse_statement() {
                Some(statement) => statements.push(statement),
                None => self.synchronise(),
            }
        }
        if self.current.kind == TokenKind::Error {
            self.advance();
        }
        File::new(self.name.clone(), statements, self.current)
    }

    /// All diagnostics raised while scanning and parsing, position-sorted.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut all = self.scanner.diagnostics();
        all.extend(self.diagnostics.iter().cloned());
        Diagnostic::sort_all(&mut all);
        all
    }

    fn push(&mut self, diagnostic: Diagnostic) {
        if let Some(max) = self.options.max_diagnostics {
            if self.diagnostics.len() >= max {
                return;
            }
        }
        self.diagnostics.push(diagnostic);
    }

    fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.src.len());
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(insert_at) => insert_at - 1,
        };
        let column = offset - self.line_starts[line_index] + 1;
        Position::new(self.name.clone(), offset, line_index + 1, column, column)
    }

    fn here(&self) -> Position { self.position_at(self.current.start) }

    fn token_text(&self, token: Token) -> &'src str {
        std::str::from_utf8(&self.src[token.start..token.end]).unwrap_or_default()
    }

    fn advance(&mut self) -> Token {
        let previous = self.current;
        self.current = self.next;
        self.next = self.scanner.scan();
        previous
    }

    fn expect(&mut self, kinds: &[TokenKind], expected: &'static str) -> Option<Token> {
        if self.current.is(kinds) {
            return Some(self.advance());
        }
        // The scanner has already raised a diagnostic for this token; report
        // nothing further, just consume it as the failure it is.
        if self.current.kind == TokenKind::Error {
            self.advance();
            return None;
        }
        let position = self.here();
        if self.current.kind == TokenKind::Eof {
            self.push(ParseError::UnexpectedEof { expected }.at(position));
        } else {
            self.push(ParseError::UnexpectedToken { expected, found: self.current.kind }.at(position));
        }
        None
    }

    fn synchronise(&mut self) {
        while !matches!(self.current.kind, TokenKind::Separator | TokenKind::Eof) {
            self.advance();
        }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Separator => self.parse_request().map(|r| Statement::Request(Box::new(r))),
            TokenKind::Comment => Some(Statement::Comment(Box::new(self.parse_comment()))),
            TokenKind::At if self.next.kind == TokenKind::KwPrompt => {
                self.parse_prompt().map(|p| Statement::Prompt(Box::new(p)))
            }
            TokenKind::At => self.parse_var().map(|v| Statement::Var(Box::new(v))),
            found => {
                let position = self.here();
                self.push(ParseError::UnrecognisedStatement { found }.at(position));
                None
            }
        }
    }

    fn parse_comment(&mut self) -> Comment {
        let token = self.advance();
        Comment::new(token, self.token_text(token).to_string())
    }

    fn parse_var(&mut self) -> Option<VarStatement> {
        let at_token = self.expect(&[TokenKind::At], "'@'")?;
        let ident_token = self.advance();
        let ident = Ident::new(self.token_text(ident_token).to_string(), ident_token);

        let value = if self.current.kind == TokenKind::Eq {
            let eq_position = self.here();
            self.advance();
            match self.parse_expression(TokenKind::Text) {
                Some(expr) => Some(expr),
                None => {
                    self.push(ParseError::MissingVariableValue.at(eq_position));
                    None
                }
            }
        } else {
            self.parse_optional_expression(TokenKind::Text)
        };

        Some(VarStatement::new(at_token, ident, value))
    }

    fn parse_prompt(&mut self) -> Option<PromptStatement> {
        let at_token = self.expect(&[TokenKind::At], "'@'")?;
        self.expect(&[TokenKind::KwPrompt], "'prompt'")?;
        let ident_token = self.expect(&[TokenKind::Ident], "a prompt name")?;
        let ident = Ident::new(self.token_text(ident_token).to_string(), ident_token);
        let description = if self.current.kind == TokenKind::Text {
            let token = self.advance();
            Some(TextLiteral::new(self.token_text(token).to_string(), token))
        } else {
            None
        };
        Some(PromptStatement::new(at_token, ident, description))
    }

    fn parse_request(&mut self) -> Option<Request> {
        let separator_token = self.expect(&[TokenKind::Separator], "'###'")?;

        let doc_comment =
            if self.current.kind == TokenKind::Comment { Some(self.parse_comment()) } else { None };

        let mut vars = Vec::new();
        let mut prompts = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::At if self.next.kind == TokenKind::KwPrompt => match self.parse_prompt() {
                    Some(p) => prompts.push(p),
                    None => break,
                },
                TokenKind::At => match self.parse_var() {
                    Some(v) => vars.push(v),
                    None => break,
                },
                _ => break,
            }
        }

        let method_token = match self.current.kind.is_method() {
            true => self.advance(),
            false => {
                let position = self.here();
                self.push(ParseError::MissingMethod.at(position));
                return None;
            }
        };
        let method = Method::new(method_token);

        let url = match self.current.kind {
            TokenKind::Url | TokenKind::OpenInterp => self.parse_expression(TokenKind::Url),
            _ => {
                let position = self.here();
                self.push(ParseError::MissingUrl.at(position));
                None
            }
        };

        let http_version = if self.current.kind == TokenKind::HttpVersion {
            Some(HttpVersion::new(self.advance()))
        } else {
            None
        };

        let mut headers = Vec::new();
        while self.current.kind == TokenKind::Header {
            let header_token = self.advance();
            let key = self.token_text(header_token).to_string();
            if self.expect(&[TokenKind::Colon], "':'").is_none() {
                break;
            }
            let Some(value) = self.parse_expression(TokenKind::Text) else { break };
            headers.push(Header::new(header_token, key, value));
        }

        let body = match self.current.kind {
            TokenKind::LeftAngle => {
                let token = self.advance();
                let file = self.parse_optional_trailer_value();
                Some(Expression::BodyFile(Box::new(BodyFile::new(token, file))))
            }
            TokenKind::Body | TokenKind::OpenInterp => {
                self.parse_expression(TokenKind::Body)
            }
            _ => None,
        };

        let mut response_redirect = None;
        let mut response_reference = None;
        loop {
            match self.current.kind {
                TokenKind::RightAngle if response_redirect.is_none() => {
                    let token = self.advance();
                    let file = self.parse_optional_trailer_value();
                    response_redirect = Some(ResponseRedirect::new(token, file));
                }
                TokenKind::ResponseRef if response_reference.is_none() => {
                    let token = self.advance();
                    let file = self.parse_optional_trailer_value();
                    response_reference = Some(ResponseReference::new(token, file));
                }
                _ => break,
            }
        }

        Some(Request::new(
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
        ))
    }

    /// A value-bearing expression where the grammar tolerates its absence
    /// entirely (a declaration with no `=`, a trailer with no file path).
    /// `expected` is the literal token kind this grammar position's values
    /// are made of (`Url` for a URL, `Text` for a header/variable value or
    /// file path, `Body` for a body).
    fn parse_optional_expression(&mut self, expected: TokenKind) -> Option<Expression> {
        match self.current.kind {
            TokenKind::OpenInterp => self.parse_expression(expected),
            kind if kind == expected => self.parse_expression(expected),
            _ => None,
        }
    }

    fn parse_optional_trailer_value(&mut self) -> Option<Expression> {
        self.parse_optional_expression(TokenKind::Text)
    }

    /// Parses one value expression of the given kind family: a plain
    /// literal, a bare interpolation, or a literal with an interpolation
    /// spliced into its left and/or right side.
    ///
    /// The right side of a splice is accepted only when it is exactly
    /// `expected` — the kind family this call site's values are made of —
    /// never merely because some token happens to follow the closing
    /// `}}`. Without this check an interpolated header value can eagerly
    /// swallow an unrelated request body as its right side, and a URL made
    /// entirely of an interpolation can do the same to a body that follows
    /// it with no headers in between.
    fn parse_expression(&mut self, expected: TokenKind) -> Option<Expression> {
        match self.current.kind {
            TokenKind::OpenInterp => {
                let interp = self.parse_interp()?;
                let right = self.parse_splice_right(expected);
                if right.is_some() {
                    Some(Expression::InterpolatedExpression(Box::new(InterpolatedExpression::new(
                        None, interp, right,
                    ))))
                } else {
                    Some(Expression::Interp(Box::new(interp)))
                }
            }
            kind if kind == expected => {
                let left = self.parse_value_literal();
                if self.current.kind == TokenKind::OpenInterp {
                    let interp = self.parse_interp()?;
                    let right = self.parse_splice_right(expected);
                    Some(Expression::InterpolatedExpression(Box::new(InterpolatedExpression::new(
                        Some(left),
                        interp,
                        right,
                    ))))
                } else {
                    Some(left)
                }
            }
            _ => None,
        }
    }

    /// The right side of an interpolation splice: a plain literal of
    /// exactly `expected` kind, or nothing at all.
    fn parse_splice_right(&mut self, expected: TokenKind) -> Option<Expression> {
        if self.current.kind == expected { Some(self.parse_value_literal()) } else { None }
    }

    fn parse_value_literal(&mut self) -> Expression {
        let token = self.advance();
        let value = self.token_text(token).to_string();
        match token.kind {
            TokenKind::Url => Expression::Url(Box::new(Url::new(value, token))),
            TokenKind::Body => Expression::Body(Box::new(Body::new(value, token))),
            _ => Expression::TextLiteral(Box::new(TextLiteral::new(value, token))),
        }
    }

    fn parse_interp(&mut self) -> Option<Interp> {
        let open_token = self.expect(&[TokenKind::OpenInterp], "'{{'")?;
        let ident_token = self.expect(&[TokenKind::Ident], "an interpolated variable name")?;
        let ident = Ident::new(self.token_text(ident_token).to_string(), ident_token);
        let close_token = self.expect(&[TokenKind::CloseInterp], "'}}'")?;
        Some(Interp::new(open_token, Expression::Ident(Box::new(ident)), close_token))
    }
}

fn compute_line_starts(src: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, &byte) in src.iter().enumerate() {
        if byte == b'\n' {
            starts.push(i + 1);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use reqfile_source::TokenKind;

    use super::*;

    fn parse(src: &str) -> (File, Vec<Diagnostic>) {
        let mut parser = Parser::new("test.http", src.as_bytes());
        let file = parser.parse();
        let diagnostics = parser.diagnostics();
        (file, diagnostics)
    }

    #[test]
    fn bare_comment_is_a_standalone_statement() {
        let (file, diagnostics) = parse("# just a note\n");
        assert!(diagnostics.is_empty());
        assert_eq!(file.statements.len(), 1);
        assert!(matches!(file.statements[0], Statement::Comment(_)));
    }

    #[test]
    fn minimal_request_has_a_method_and_url() {
        let (file, diagnostics) = parse("### hello\nGET https://example.com\n");
        assert!(diagnostics.is_empty());
        assert_eq!(file.statements.len(), 1);
        let Statement::Request(request) = &file.statements[0] else { panic!("expected a request") };
        assert_eq!(request.doc_comment.as_ref().unwrap().text, "hello");
        assert_eq!(request.method.token.kind, TokenKind::MethodGet);
        assert!(matches!(request.url, Some(Expression::Url(_))));
    }

    #[test]
    fn request_without_doc_comment_has_none() {
        let (file, _) = parse("###\nGET https://example.com\n");
        let Statement::Request(request) = &file.statements[0] else { panic!("expected a request") };
        assert!(request.doc_comment.is_none());
    }

    #[test]
    fn top_level_var_statement_without_value() {
        let (file, diagnostics) = parse("@no-redirect\n");
        assert!(diagnostics.is_empty());
        let Statement::Var(var) = &file.statements[0] else { panic!("expected a var statement") };
        assert_eq!(var.ident.name, "no-redirect");
        assert!(var.value.is_none());
    }

    #[test]
    fn var_statement_with_interpolated_value() {
        let (file, diagnostics) = parse("@base = {{ host }}\n");
        assert!(diagnostics.is_empty());
        let Statement::Var(var) = &file.statements[0] else { panic!("expected a var statement") };
        assert!(matches!(var.value, Some(Expression::Interp(_))));
    }

    #[test]
    fn prompt_statement_with_description() {
        let (file, diagnostics) = parse("@prompt token: your API token\n");
        assert!(diagnostics.is_empty());
        let Statement::Prompt(prompt) = &file.statements[0] else { panic!("expected a prompt") };
        assert_eq!(prompt.ident.name, "token");
        assert_eq!(prompt.description.as_ref().unwrap().value, ": your API token");
    }

    #[test]
    fn interpolated_url_splits_around_the_interpolation() {
        let (file, diagnostics) = parse("### split\nGET https://{{ host }}/items\n");
        assert!(diagnostics.is_empty());
        let Statement::Request(request) = &file.statements[0] else { panic!("expected a request") };
        match request.url.as_ref().unwrap() {
            Expression::InterpolatedExpression(expr) => {
                assert!(matches!(expr.left, Some(Expression::Url(_))));
                assert!(matches!(expr.right, Some(Expression::Url(_))));
            }
            other => panic!("expected an interpolated expression, got {other:?}"),
        }
    }

    #[test]
    fn url_made_entirely_of_an_interpolation_has_no_left_or_right() {
        let (file, diagnostics) = parse("### split\nGET {{ base }}\n");
        assert!(diagnostics.is_empty());
        let Statement::Request(request) = &file.statements[0] else { panic!("expected a request") };
        assert!(matches!(request.url, Some(Expression::Interp(_))));
    }

    #[test]
    fn an_interpolated_header_value_does_not_swallow_the_body_that_follows_it() {
        let (file, diagnostics) =
            parse("### t\nPOST https://x\nAuth: Bearer {{ token }}\n\nhello body\n");
        assert!(diagnostics.is_empty());
        let Statement::Request(request) = &file.statements[0] else { panic!("expected a request") };
        assert_eq!(request.headers.len(), 1);
        match &request.headers[0].value {
            Expression::InterpolatedExpression(expr) => assert!(expr.right.is_none()),
            other => panic!("expected an interpolated expression, got {other:?}"),
        }
        assert!(matches!(request.body, Some(Expression::Body(_))));
    }

    #[test]
    fn a_url_made_entirely_of_an_interpolation_does_not_swallow_the_body_that_follows_it() {
        let (file, diagnostics) = parse("### t\nPOST {{ base }}\n\nhello\n");
        assert!(diagnostics.is_empty());
        let Statement::Request(request) = &file.statements[0] else { panic!("expected a request") };
        assert!(matches!(request.url, Some(Expression::Interp(_))));
        assert!(matches!(request.body, Some(Expression::Body(_))));
    }

    #[test]
    fn headers_and_body() {
        let (file, diagnostics) =
            parse("### with body\nPOST https://example.com\nContent-Type: text/plain\n\nhello world\n");
        assert!(diagnostics.is_empty());
        let Statement::Request(request) = &file.statements[0] else { panic!("expected a request") };
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers[0].key, "Content-Type");
        assert!(matches!(request.body, Some(Expression::Body(_))));
    }

    #[test]
    fn response_redirect_and_reference_in_either_order() {
        let (file, diagnostics) = parse("### saved\nGET https://example.com\n\n> out.json\n<> ref.json\n");
        assert!(diagnostics.is_empty());
        let Statement::Request(request) = &file.statements[0] else { panic!("expected a request") };
        assert!(request.response_redirect.is_some());
        assert!(request.response_reference.is_some());
    }

    #[test]
    fn missing_method_is_reported_and_recovered_from() {
        let (file, diagnostics) = parse("###\n\n###\nGET https://example.com\n");
        assert_eq!(file.statements.len(), 1);
        assert!(diagnostics.iter().any(|d| d.message.contains("missing its HTTP method")));
    }

    #[test]
    fn a_second_response_redirect_is_an_unrecognised_statement() {
        let (file, diagnostics) =
            parse("### ok\nGET https://example.com\n\n> out1.json\n> out2.json\n");
        assert_eq!(file.statements.len(), 1);
        assert!(diagnostics.iter().any(|d| d.message.contains("unrecognised statement")));
    }

    #[test]
    fn empty_input_has_no_statements() {
        let (file, diagnostics) = parse("");
        assert!(diagnostics.is_empty());
        assert!(file.statements.is_empty());
    }
}
