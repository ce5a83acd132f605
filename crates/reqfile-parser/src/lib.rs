//! Scanner and recursive-descent parser for the `.http` request description
//! language.
//!
//! The grammar is context-sensitive — the same bytes mean different things in
//! a URL, a header value, a body, or a variable declaration — so tokenising
//! needs a scanner whose state is a first-class value rather than a single
//! regular expression. [`lexer::Scanner`] implements that as a hand-written
//! state machine; [`parser::Parser`] consumes its token stream with
//! two-token lookahead, building a [`reqfile_ast::File`].
//!
//! ## Example
//!
//! ```rust
//! use reqfile_parser::Parser;
//!
//! let src = b"### hello\nGET https://example.com\n";
//! let mut parser = Parser::new("example.http", src);
//! let file = parser.parse();
//! assert!(parser.diagnostics().is_empty());
//! assert_eq!(file.statements.len(), 1);
//! ```

pub mod diagnostics;
pub mod lexer;
pub mod parser;

pub use diagnostics::{LexError, ParseError};
pub use lexer::Scanner;
pub use parser::{Parser, ParserOptions};
