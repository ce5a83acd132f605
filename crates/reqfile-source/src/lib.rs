//! Source position tracking, diagnostics, and token model shared by the reqfile
//! scanner, parser, and AST.
//!
//! This crate provides the foundation the rest of the workspace builds on: a
//! `Position` type identifying a point or range in a named source file, a
//! `Diagnostic` pairing a message with a position, a `SourceFile` /
//! `SourceManager` pair for turning byte offsets into positions without
//! re-scanning from the start of the file each time, and the `Token` /
//! `TokenKind` types the scanner emits and the AST stores on every node.
//!
//! Keeping this model in its own crate (rather than duplicating it in the
//! scanner, the parser, and the AST) is what lets downstream tooling treat
//! positions, diagnostics, and tokens from any layer identically.

pub mod token;
pub mod types;

pub use token::{Token, TokenKind, keyword, method};
pub use types::{Diagnostic, Position, SourceFile, SourceManager};
