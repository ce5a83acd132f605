//! Typed error kinds layered over the plain `reqfile_source::Diagnostic`
//! pair the scanner and parser both emit.
//!
//! There is no separate reporter type here: `Diagnostic` already has a
//! canonical one-line `Display`, and both [`Scanner`](crate::Scanner) and
//! [`Parser`](crate::Parser) collect their own diagnostics into a plain
//! `Vec<Diagnostic>`. This module only supplies the typed vocabulary.

mod error;

pub use error::{LexError, ParseError};
