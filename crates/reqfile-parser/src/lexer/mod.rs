//! Hand-written scanner for the `.http` request description language.
//!
//! The grammar is context-sensitive — `/` means something different in a
//! comment marker, a URL, and a file path — so a single regular expression
//! can't drive tokenisation the way it can for a context-free language.
//! [`Scanner`] instead keeps an explicit [`Mode`] and steps through it one
//! token at a time, in the style of lexical scanning as state functions:
//! each `lex_*` method is a state function that either emits a token or
//! transitions to another state and asks the driving loop to try again.

pub mod rules;

use reqfile_source::{Diagnostic, Position, Token, TokenKind, keyword, method};

use crate::diagnostics::LexError;

/// Where the scanner currently is in the grammar.
///
/// Persists across [`Scanner::scan`] calls: tokenising is inherently
/// multi-call (one token out per call), so the state that would be local
/// variables in a single-shot tokeniser has to live on `self` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Top level, between statements, before any request has been opened.
    Start,
    /// Just consumed `###`; reading the optional same-line request name.
    AfterSeparator,
    /// Inside a request, reading `@`-declarations before the method line.
    RequestPrelude,
    /// Reading the identifier or keyword right after `@`.
    VarName,
    /// Just read a variable's name; looking for an optional `=` and value.
    AfterVarName,
    /// Reading a variable's value.
    VarValue,
    /// Reading the identifier right after `@prompt`.
    PromptName,
    /// Reading a prompt's optional rest-of-line description.
    PromptDescription,
    /// Reading a request's URL.
    Url,
    /// Just finished the URL; looking for an optional `HTTP/x.y` literal.
    AfterUrl,
    /// Start of a header line, or the transition into the body.
    Headers,
    /// Reading a header's value, right after its `:`.
    HeaderValue,
    /// Reading a request's body.
    Body,
    /// After the body; looking for `<`, `<>`, or `>` trailers.
    Trailer,
    /// Reading the file path after a trailer marker.
    FilePath,
    /// Between `{{` and `}}`.
    InsideInterp,
    /// Input exhausted, or a lexical error ended the scan permanently.
    Done,
}

enum Step {
    Emit(Token),
    Continue,
}

enum Decoded {
    Char(char, usize),
    Invalid(usize),
    Eof,
}

const fn utf8_len(b0: u8) -> usize {
    if b0 & 0x80 == 0 {
        1
    } else if b0 & 0xE0 == 0xC0 {
        2
    } else if b0 & 0xF0 == 0xE0 {
        3
    } else if b0 & 0xF8 == 0xF0 {
        4
    } else {
        0
    }
}

/// Tokenises a single named byte slice.
///
/// Works on bytes rather than `&str` so that invalid UTF-8 becomes a
/// reportable [`TokenKind::Error`] token instead of a panic at the API
/// boundary: input arrives from files and network bodies a host doesn't
/// control the encoding of.
#[derive(Debug)]
pub struct Scanner<'src> {
    name: String,
    src: &'src [u8],
    pos: usize,
    start: usize,
    line: usize,
    col: usize,
    mode: Mode,
    decl_return: Mode,
    after_filepath: Mode,
    pending_header: bool,
    return_stack: Vec<Mode>,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Scanner<'src> {
    /// Creates a scanner over `src`, named `name` for diagnostics.
    #[must_use]
    pub fn new(name: impl Into<String>, src: &'src [u8]) -> Self {
        Self {
            name: name.into(),
            src,
            pos: 0,
            start: 0,
            line: 1,
            col: 1,
            mode: Mode::Start,
            decl_return: Mode::Start,
            after_filepath: Mode::Trailer,
            pending_header: false,
            return_stack: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Scans and returns the next token. Calling this again after an
    /// `Eof` or `Error` token keeps returning `Eof` at end of input.
    pub fn scan(&mut self) -> Token {
        loop {
            if self.mode == Mode::Done {
                return self.eof_token();
            }
            if matches!(self.decode_at(self.pos), Decoded::Invalid(_)) {
                self.start = self.pos;
                return self.invalid_utf8_token();
            }
            self.start = self.pos;
            match self.step() {
                Step::Emit(tok) => return tok,
                Step::Continue => {}
            }
        }
    }

    /// Diagnostics collected so far, in the order they were raised.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> { self.diagnostics.clone() }

    fn step(&mut self) -> Step {
        match self.mode {
            Mode::Start | Mode::RequestPrelude => self.step_top(),
            Mode::AfterSeparator => self.lex_after_separator(),
            Mode::VarName => self.lex_var_name(),
            Mode::AfterVarName => self.lex_after_var_name(),
            Mode::VarValue => self.lex_var_value(),
            Mode::PromptName => self.lex_prompt_name(),
            Mode::PromptDescription => self.lex_prompt_description(),
            Mode::Url => self.lex_url(),
            Mode::AfterUrl => self.lex_after_url(),
            Mode::Headers => self.lex_headers(),
            Mode::HeaderValue => self.lex_header_value(),
            Mode::Body => self.lex_body(),
            Mode::Trailer => self.lex_trailer(),
            Mode::FilePath => self.lex_file_path(),
            Mode::InsideInterp => self.lex_inside_interp(),
            Mode::Done => Step::Continue,
        }
    }

    // --- byte/char primitives -------------------------------------------------

    fn decode_at(&self, pos: usize) -> Decoded {
        match self.src.get(pos) {
            None => Decoded::Eof,
            Some(&b0) => {
                let len = utf8_len(b0);
                if len == 0 || pos + len > self.src.len() {
                    return Decoded::Invalid(1);
                }
                match std::str::from_utf8(&self.src[pos..pos + len]) {
                    Ok(s) => Decoded::Char(s.chars().next().expect("non-empty utf8 slice"), len),
                    Err(_) => Decoded::Invalid(1),
                }
            }
        }
    }

    fn track(&mut self, c: char, len: usize) {
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += len;
        }
    }

    fn bump(&mut self) -> Option<char> {
        match self.decode_at(self.pos) {
            Decoded::Char(c, len) => {
                self.pos += len;
                self.track(c, len);
                Some(c)
            }
            Decoded::Invalid(_) | Decoded::Eof => None,
        }
    }

    fn looking_at(&self, s: &str) -> bool {
        self.src.get(self.pos..self.pos + s.len()).is_some_and(|b| b == s.as_bytes())
    }

    fn skip_line_space(&mut self) {
        while let Decoded::Char(c, len) = self.decode_at(self.pos) {
            if !rules::is_line_space(c) {
                break;
            }
            self.pos += len;
            self.track(c, len);
        }
    }

    fn skip_trivia(&mut self) {
        while let Decoded::Char(c, len) = self.decode_at(self.pos) {
            if !(rules::is_line_space(c) || c == '\n') {
                break;
            }
            self.pos += len;
            self.track(c, len);
        }
    }

    /// Like [`Self::skip_trivia`], but reports how many newlines it crossed —
    /// the header section ends at a blank line, not at the shape of what
    /// follows it (a body may start with plain words that look like a header
    /// name).
    fn skip_trivia_counting_newlines(&mut self) -> usize {
        let mut newlines = 0;
        while let Decoded::Char(c, len) = self.decode_at(self.pos) {
            if c == '\n' {
                newlines += 1;
            } else if !rules::is_line_space(c) {
                break;
            }
            self.pos += len;
            self.track(c, len);
        }
        newlines
    }

    fn at_newline_or_eof(&self) -> bool {
        matches!(self.decode_at(self.pos), Decoded::Eof) || self.looking_at("\n")
    }

    fn at_statement_boundary(&self) -> bool {
        matches!(self.decode_at(self.pos), Decoded::Eof)
            || self.looking_at("\n")
            || self.looking_at("@")
            || self.looking_at("#")
    }

    fn token(&self, kind: TokenKind) -> Token { Token::new(kind, self.start, self.pos) }

    fn position_here(&self) -> Position {
        Position::new(self.name.clone(), self.pos, self.line, self.col, self.col)
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let message = message.into();
        let position = self.position_here();
        log::debug!("{position}: {message}");
        self.diagnostics.push(Diagnostic::new(message, position));
    }

    fn eof_token(&self) -> Token { Token::new(TokenKind::Eof, self.src.len(), self.src.len()) }

    fn invalid_utf8_token(&mut self) -> Token {
        let bad_byte = self.src[self.pos];
        let codepoint = format!("U+{bad_byte:02X}");
        self.error_here(LexError::InvalidUtf8 { codepoint }.to_string());
        let tok = Token::new(TokenKind::Error, self.start, self.pos + 1);
        self.pos = self.src.len();
        self.mode = Mode::Done;
        tok
    }

    // --- top level / request prelude -----------------------------------------

    fn step_top(&mut self) -> Step {
        let in_request = self.mode == Mode::RequestPrelude;
        self.skip_trivia();
        self.start = self.pos;
        match self.decode_at(self.pos) {
            Decoded::Eof => {
                self.mode = Mode::Done;
                Step::Continue
            }
            Decoded::Char('#', _) => self.lex_hash(in_request),
            Decoded::Char('/', _) => self.lex_slash(in_request),
            Decoded::Char('@', _) => {
                self.bump();
                self.decl_return = if in_request { Mode::RequestPrelude } else { Mode::Start };
                self.mode = Mode::VarName;
                Step::Emit(self.token(TokenKind::At))
            }
            Decoded::Char(c, _) if in_request && rules::is_upper_alpha(c) => self.lex_method(),
            Decoded::Char(c, _) => {
                self.bump();
                self.error_here(LexError::UnexpectedCharacter { found: c }.to_string());
                self.mode = Mode::Done;
                Step::Emit(self.token(TokenKind::Error))
            }
            Decoded::Invalid(_) => unreachable!("invalid bytes are handled by the caller"),
        }
    }

    fn lex_hash(&mut self, in_request: bool) -> Step {
        if self.looking_at("###") {
            self.pos += 3;
            self.col += 3;
            self.mode = Mode::AfterSeparator;
            return Step::Emit(self.token(TokenKind::Separator));
        }
        self.bump();
        self.lex_comment_body(in_request)
    }

    fn lex_slash(&mut self, in_request: bool) -> Step {
        if self.looking_at("//") {
            self.pos += 2;
            self.col += 2;
            return self.lex_comment_body(in_request);
        }
        self.bump();
        self.error_here(LexError::UnexpectedCharacter { found: '/' }.to_string());
        self.mode = Mode::Done;
        Step::Emit(self.token(TokenKind::Error))
    }

    /// Shared by `#` and `//` comments. A comment whose content begins with
    /// `@` is a request-local variable declaration written inline in a
    /// comment, not a comment — e.g. `# @timeout = 30`.
    fn lex_comment_body(&mut self, in_request: bool) -> Step {
        self.skip_line_space();
        if self.looking_at("@") {
            self.start = self.pos;
            self.bump();
            self.decl_return = if in_request { Mode::RequestPrelude } else { Mode::Start };
            self.mode = Mode::VarName;
            return Step::Emit(self.token(TokenKind::At));
        }
        self.start = self.pos;
        while let Decoded::Char(c, len) = self.decode_at(self.pos) {
            if c == '\n' {
                break;
            }
            self.pos += len;
            self.track(c, len);
        }
        self.mode = if in_request { Mode::RequestPrelude } else { Mode::Start };
        Step::Emit(self.token(TokenKind::Comment))
    }

    fn lex_after_separator(&mut self) -> Step {
        self.skip_line_space();
        if self.at_newline_or_eof() {
            self.mode = Mode::RequestPrelude;
            return Step::Continue;
        }
        self.start = self.pos;
        while let Decoded::Char(c, len) = self.decode_at(self.pos) {
            if c == '\n' {
                break;
            }
            self.pos += len;
            self.track(c, len);
        }
        self.mode = Mode::RequestPrelude;
        Step::Emit(self.token(TokenKind::Comment))
    }

    // --- variable and prompt declarations -------------------------------------

    fn lex_var_name(&mut self) -> Step {
        self.start = self.pos;
        while let Decoded::Char(c, len) = self.decode_at(self.pos) {
            if !rules::is_ident(c) {
                break;
            }
            self.pos += len;
            self.track(c, len);
        }
        let text = std::str::from_utf8(&self.src[self.start..self.pos]).unwrap_or_default();
        let (kind, _) = keyword(text);
        self.mode = if kind == TokenKind::KwPrompt { Mode::PromptName } else { Mode::AfterVarName };
        Step::Emit(self.token(kind))
    }

    fn lex_after_var_name(&mut self) -> Step {
        self.skip_line_space();
        self.start = self.pos;
        if self.looking_at("=") {
            self.bump();
            self.mode = Mode::VarValue;
            return Step::Emit(self.token(TokenKind::Eq));
        }
        if self.at_statement_boundary() {
            self.mode = self.decl_return;
            return Step::Continue;
        }
        self.mode = Mode::VarValue;
        Step::Continue
    }

    fn lex_var_value(&mut self) -> Step {
        let decl_return = self.decl_return;
        self.skip_line_space();
        if self.looking_at("{{") {
            self.return_stack.push(Mode::VarValue);
            self.mode = Mode::InsideInterp;
            return Step::Continue;
        }
        if self.at_statement_boundary() {
            self.mode = decl_return;
            return Step::Continue;
        }
        self.lex_run(TokenKind::Text, Mode::VarValue, decl_return)
    }

    fn lex_prompt_name(&mut self) -> Step {
        self.skip_line_space();
        self.start = self.pos;
        while let Decoded::Char(c, len) = self.decode_at(self.pos) {
            if !rules::is_ident(c) {
                break;
            }
            self.pos += len;
            self.track(c, len);
        }
        self.mode = Mode::PromptDescription;
        Step::Emit(self.token(TokenKind::Ident))
    }

    fn lex_prompt_description(&mut self) -> Step {
        let decl_return = self.decl_return;
        self.skip_line_space();
        if self.at_statement_boundary() {
            self.mode = decl_return;
            return Step::Continue;
        }
        self.start = self.pos;
        while let Decoded::Char(c, len) = self.decode_at(self.pos) {
            if c == '\n' {
                break;
            }
            self.pos += len;
            self.track(c, len);
        }
        self.mode = decl_return;
        Step::Emit(self.token(TokenKind::Text))
    }

    // --- method, URL, version --------------------------------------------------

    fn lex_method(&mut self) -> Step {
        self.start = self.pos;
        while let Decoded::Char(c, len) = self.decode_at(self.pos) {
            if !rules::is_upper_alpha(c) {
                break;
            }
            self.pos += len;
            self.track(c, len);
        }
        let text = std::str::from_utf8(&self.src[self.start..self.pos]).unwrap_or_default();
        let (kind, _) = method(text);
        self.mode = Mode::Url;
        Step::Emit(self.token(kind))
    }

    fn lex_url(&mut self) -> Step {
        self.skip_line_space();
        if self.looking_at("{{") {
            self.return_stack.push(Mode::Url);
            self.mode = Mode::InsideInterp;
            return Step::Continue;
        }
        if self.at_newline_or_eof() {
            self.mode = Mode::AfterUrl;
            return Step::Continue;
        }
        self.lex_run(TokenKind::Url, Mode::Url, Mode::AfterUrl)
    }

    fn lex_after_url(&mut self) -> Step {
        self.skip_line_space();
        if self.looking_at("HTTP/") {
            self.start = self.pos;
            self.pos += 5;
            self.col += 5;
            let mut saw_digit = false;
            while let Decoded::Char(c, len) = self.decode_at(self.pos) {
                if !(rules::is_digit(c) || c == '.') {
                    break;
                }
                saw_digit |= rules::is_digit(c);
                self.pos += len;
                self.track(c, len);
            }
            if !saw_digit {
                self.error_here(LexError::MalformedHttpVersion.to_string());
                self.mode = Mode::Done;
                return Step::Emit(self.token(TokenKind::Error));
            }
            self.mode = Mode::Headers;
            return Step::Emit(self.token(TokenKind::HttpVersion));
        }
        self.mode = Mode::Headers;
        Step::Continue
    }

    // --- headers and body --------------------------------------------------

    fn lex_headers(&mut self) -> Step {
        if self.pending_header {
            self.pending_header = false;
            self.start = self.pos;
            self.bump();
            self.mode = Mode::HeaderValue;
            return Step::Emit(self.token(TokenKind::Colon));
        }
        let blank_line = self.skip_trivia_counting_newlines() >= 2;
        if self.looking_at("###") || matches!(self.decode_at(self.pos), Decoded::Eof) {
            self.mode = Mode::Start;
            return Step::Continue;
        }
        if self.looking_at("<") || self.looking_at(">") {
            self.mode = Mode::Trailer;
            return Step::Continue;
        }
        if blank_line {
            self.mode = Mode::Body;
            return Step::Continue;
        }
        let name_start = self.pos;
        self.start = self.pos;
        while let Decoded::Char(c, len) = self.decode_at(self.pos) {
            if !rules::is_ident(c) {
                break;
            }
            self.pos += len;
            self.track(c, len);
        }
        if self.pos == name_start {
            self.mode = Mode::Body;
            return Step::Continue;
        }
        if self.looking_at(":") {
            self.pending_header = true;
            return Step::Emit(self.token(TokenKind::Header));
        }
        self.error_here(LexError::MissingHeaderColon.to_string());
        self.mode = Mode::Done;
        Step::Emit(self.token(TokenKind::Error))
    }

    fn lex_header_value(&mut self) -> Step {
        self.skip_line_space();
        if self.looking_at("{{") {
            self.return_stack.push(Mode::HeaderValue);
            self.mode = Mode::InsideInterp;
            return Step::Continue;
        }
        if self.at_newline_or_eof() {
            self.mode = Mode::Headers;
            return Step::Continue;
        }
        self.lex_run(TokenKind::Text, Mode::HeaderValue, Mode::Headers)
    }

    fn at_body_end(&self) -> bool {
        if matches!(self.decode_at(self.pos), Decoded::Eof) {
            return true;
        }
        if self.looking_at("###") {
            return true;
        }
        let at_line_start = self.pos == 0 || self.src.get(self.pos - 1) == Some(&b'\n');
        if !at_line_start {
            return false;
        }
        let mut p = self.pos;
        while matches!(self.src.get(p), Some(b' ' | b'\t')) {
            p += 1;
        }
        matches!(self.src.get(p), Some(b'<' | b'>'))
    }

    fn lex_body(&mut self) -> Step {
        if self.looking_at("{{") {
            self.return_stack.push(Mode::Body);
            self.mode = Mode::InsideInterp;
            return Step::Continue;
        }
        if self.at_body_end() {
            self.mode = Mode::Trailer;
            return Step::Continue;
        }
        self.start = self.pos;
        loop {
            if self.looking_at("{{") || self.at_body_end() {
                break;
            }
            match self.decode_at(self.pos) {
                Decoded::Char(c, len) => {
                    self.pos += len;
                    self.track(c, len);
                }
                Decoded::Eof | Decoded::Invalid(_) => break,
            }
        }
        if self.pos == self.start {
            self.mode = Mode::Trailer;
            return Step::Continue;
        }
        if self.looking_at("{{") {
            self.return_stack.push(Mode::Body);
            self.mode = Mode::InsideInterp;
        } else {
            self.mode = Mode::Trailer;
        }
        Step::Emit(self.token(TokenKind::Body))
    }

    fn lex_trailer(&mut self) -> Step {
        self.skip_trivia();
        if self.looking_at("###") || matches!(self.decode_at(self.pos), Decoded::Eof) {
            self.mode = Mode::Start;
            return Step::Continue;
        }
        self.start = self.pos;
        if self.looking_at("<>") {
            self.pos += 2;
            self.col += 2;
            self.after_filepath = Mode::Trailer;
            self.mode = Mode::FilePath;
            return Step::Emit(self.token(TokenKind::ResponseRef));
        }
        if self.looking_at("<") {
            self.bump();
            self.after_filepath = Mode::Trailer;
            self.mode = Mode::FilePath;
            return Step::Emit(self.token(TokenKind::LeftAngle));
        }
        if self.looking_at(">") {
            self.bump();
            self.after_filepath = Mode::Trailer;
            self.mode = Mode::FilePath;
            return Step::Emit(self.token(TokenKind::RightAngle));
        }
        let found = self.bump().unwrap_or('\0');
        self.error_here(LexError::UnexpectedCharacter { found }.to_string());
        self.mode = Mode::Done;
        Step::Emit(self.token(TokenKind::Error))
    }

    fn lex_file_path(&mut self) -> Step {
        let after = self.after_filepath;
        self.skip_line_space();
        if self.looking_at("{{") {
            self.return_stack.push(Mode::FilePath);
            self.mode = Mode::InsideInterp;
            return Step::Continue;
        }
        if self.at_newline_or_eof() {
            self.mode = after;
            return Step::Continue;
        }
        self.lex_run(TokenKind::Text, Mode::FilePath, after)
    }

    /// Consumes a run of `kind`-class characters (plus plain line-space, so a
    /// single-line value may contain internal spaces), stopping at `{{`, a
    /// newline, or end of input. On an `{{` break, pushes `current_mode` so
    /// the run resumes where it left off once the interpolation closes.
    fn lex_run(&mut self, kind: TokenKind, current_mode: Mode, after: Mode) -> Step {
        self.start = self.pos;
        let is_member: fn(char) -> bool = if kind == TokenKind::Url { rules::is_url } else { rules::is_text };
        loop {
            if self.looking_at("{{") {
                break;
            }
            match self.decode_at(self.pos) {
                Decoded::Char(c, len) if is_member(c) || c == ' ' || c == '\t' || c == '{' => {
                    self.pos += len;
                    self.track(c, len);
                }
                _ => break,
            }
        }
        if self.pos == self.start {
            self.mode = after;
            return Step::Continue;
        }
        if self.looking_at("{{") {
            self.return_stack.push(current_mode);
            self.mode = Mode::InsideInterp;
        } else {
            self.mode = after;
        }
        Step::Emit(self.token(kind))
    }

    // --- interpolation -------------------------------------------------------

    fn lex_inside_interp(&mut self) -> Step {
        if self.looking_at("{{") {
            self.start = self.pos;
            self.pos += 2;
            self.col += 2;
            return Step::Emit(self.token(TokenKind::OpenInterp));
        }
        self.skip_line_space();
        if self.looking_at("}}") {
            self.start = self.pos;
            self.pos += 2;
            self.col += 2;
            self.mode = self.return_stack.pop().unwrap_or(Mode::Start);
            return Step::Emit(self.token(TokenKind::CloseInterp));
        }
        if self.at_newline_or_eof() {
            self.error_here(LexError::UnterminatedInterpolation.to_string());
            self.mode = Mode::Done;
            return Step::Emit(self.token(TokenKind::Error));
        }
        self.start = self.pos;
        while let Decoded::Char(c, len) = self.decode_at(self.pos) {
            if !rules::is_ident(c) {
                break;
            }
            self.pos += len;
            self.track(c, len);
        }
        if self.pos == self.start {
            self.error_here(LexError::UnterminatedInterpolation.to_string());
            self.mode = Mode::Done;
            return Step::Emit(self.token(TokenKind::Error));
        }
        Step::Emit(self.token(TokenKind::Ident))
    }
}

#[cfg(test)]
mod tests {
    use reqfile_source::TokenKind as K;

    use super::*;

    fn kinds(src: &str) -> Vec<K> {
        let mut scanner = Scanner::new("test.http", src.as_bytes());
        let mut out = Vec::new();
        loop {
            let tok = scanner.scan();
            let done = tok.kind == K::Eof || tok.kind == K::Error;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn s1_bare_comment() {
        let mut scanner = Scanner::new("test.http", b"# hello");
        let comment = scanner.scan();
        assert_eq!(comment, Token::new(K::Comment, 2, 7));
        assert_eq!(scanner.scan(), Token::new(K::Eof, 7, 7));
    }

    #[test]
    fn s2_bare_separator() {
        assert_eq!(kinds("###"), vec![K::Separator, K::Eof]);
    }

    #[test]
    fn s3_separator_with_name() {
        let mut scanner = Scanner::new("test.http", b"### My Req");
        assert_eq!(scanner.scan(), Token::new(K::Separator, 0, 3));
        assert_eq!(scanner.scan(), Token::new(K::Comment, 4, 10));
        assert_eq!(scanner.scan(), Token::new(K::Eof, 10, 10));
    }

    #[test]
    fn s4_var_statement() {
        let mut scanner = Scanner::new("test.http", b"@var = test");
        assert_eq!(scanner.scan(), Token::new(K::At, 0, 1));
        assert_eq!(scanner.scan(), Token::new(K::Ident, 1, 4));
        assert_eq!(scanner.scan(), Token::new(K::Eq, 5, 6));
        assert_eq!(scanner.scan(), Token::new(K::Text, 7, 11));
        assert_eq!(scanner.scan(), Token::new(K::Eof, 11, 11));
    }

    #[test]
    fn s5_var_statement_with_interpolation() {
        let mut scanner = Scanner::new("test.http", b"@var = {{ base }}");
        assert_eq!(scanner.scan(), Token::new(K::At, 0, 1));
        assert_eq!(scanner.scan(), Token::new(K::Ident, 1, 4));
        assert_eq!(scanner.scan(), Token::new(K::Eq, 5, 6));
        assert_eq!(scanner.scan(), Token::new(K::OpenInterp, 7, 9));
        assert_eq!(scanner.scan(), Token::new(K::Ident, 10, 14));
        assert_eq!(scanner.scan(), Token::new(K::CloseInterp, 15, 17));
        assert_eq!(scanner.scan(), Token::new(K::Eof, 17, 17));
    }

    #[test]
    fn s7_interpolated_url_splits_around_interpolation() {
        let src = "### r1\nGET https://example.com/{{ version }}/items\n";
        let mut scanner = Scanner::new("test.http", src.as_bytes());
        assert_eq!(scanner.scan().kind, K::Separator);
        assert_eq!(scanner.scan().kind, K::Comment);
        assert_eq!(scanner.scan().kind, K::MethodGet);
        let left = scanner.scan();
        assert_eq!(left.kind, K::Url);
        assert_eq!(left.text(src), "https://example.com/");
        assert_eq!(scanner.scan().kind, K::OpenInterp);
        let ident = scanner.scan();
        assert_eq!(ident.kind, K::Ident);
        assert_eq!(ident.text(src), "version");
        assert_eq!(scanner.scan().kind, K::CloseInterp);
        let right = scanner.scan();
        assert_eq!(right.kind, K::Url);
        assert_eq!(right.text(src), "/items");
    }

    #[test]
    fn s8_invalid_utf8_stops_the_scan() {
        let mut scanner = Scanner::new("test.http", b"\xff");
        let tok = scanner.scan();
        assert_eq!(tok.kind, K::Error);
        assert_eq!(scanner.scan().kind, K::Eof);
        assert!(scanner.diagnostics()[0].message.contains("invalid utf8 character"));
    }

    #[test]
    fn s9_unterminated_interpolation() {
        let mut scanner = Scanner::new("test.http", b"{{ unterminated");
        assert_eq!(scanner.scan().kind, K::OpenInterp);
        assert_eq!(scanner.scan().kind, K::Ident);
        assert_eq!(scanner.scan().kind, K::Error);
        assert!(scanner.diagnostics()[0].message.contains("unterminated interpolation"));
    }

    #[test]
    fn s10_empty_input() {
        let mut scanner = Scanner::new("test.http", b"");
        assert_eq!(scanner.scan(), Token::new(K::Eof, 0, 0));
    }

    #[test]
    fn no_redirect_flag_has_no_value() {
        let src = "### r1\nGET https://x\n@no-redirect\n";
        let mut scanner = Scanner::new("test.http", src.as_bytes());
        assert_eq!(scanner.scan().kind, K::Separator);
        assert_eq!(scanner.scan().kind, K::Comment);
        assert_eq!(scanner.scan().kind, K::MethodGet);
        assert_eq!(scanner.scan().kind, K::Url);
        assert_eq!(scanner.scan().kind, K::At);
        assert_eq!(scanner.scan().kind, K::KwNoRedirect);
        assert_eq!(scanner.scan().kind, K::Eof);
    }

    #[test]
    fn header_and_body() {
        let src = "### r1\nPOST https://x\nContent-Type: application/json\n\n{\"a\":1}\n";
        let kinds = kinds(src);
        assert_eq!(
            kinds,
            vec![
                K::Separator,
                K::Comment,
                K::MethodPost,
                K::Url,
                K::Header,
                K::Colon,
                K::Text,
                K::Body,
                K::Eof,
            ]
        );
    }

    #[test]
    fn inline_at_comment_is_a_declaration() {
        let src = "### r1\n# @timeout = 30\nGET https://x\n";
        let mut scanner = Scanner::new("test.http", src.as_bytes());
        assert_eq!(scanner.scan().kind, K::Separator);
        assert_eq!(scanner.scan().kind, K::Comment);
        assert_eq!(scanner.scan().kind, K::At);
        assert_eq!(scanner.scan().kind, K::KwTimeout);
        assert_eq!(scanner.scan().kind, K::Eq);
        assert_eq!(scanner.scan().kind, K::Text);
        assert_eq!(scanner.scan().kind, K::MethodGet);
    }

    #[test]
    fn plain_text_body_after_blank_line_is_not_mistaken_for_a_header() {
        let src = "### r1\nPOST https://x\nContent-Type: text/plain\n\nhello world\n";
        let kinds = kinds(src);
        assert_eq!(
            kinds,
            vec![
                K::Separator,
                K::Comment,
                K::MethodPost,
                K::Url,
                K::Header,
                K::Colon,
                K::Text,
                K::Body,
                K::Eof,
            ]
        );
    }

    #[test]
    fn response_redirect_and_reference() {
        let src = "### r1\nGET https://x\n\n> out.json\n\n### r2\nGET https://y\n\n<> saved\n";
        let mut scanner = Scanner::new("test.http", src.as_bytes());
        for _ in 0..4 {
            let _ = scanner.scan();
        }
        assert_eq!(scanner.scan().kind, K::RightAngle);
        assert_eq!(scanner.scan().kind, K::Text);
    }
}
