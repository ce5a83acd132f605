//! Position and diagnostic types shared by the scanner and the parser.
//!
//! - [`Position`] identifies a point or single-line range in a named source.
//! - [`Diagnostic`] pairs a human message with a [`Position`].
//! - [`SourceFile`] / [`SourceManager`] turn byte offsets into positions in
//!   O(log n) via a precomputed table of line starts, so callers building
//!   many positions (the scanner, on every diagnostic) don't re-scan from
//!   the beginning of the file each time.

use std::cmp::Ordering;
use std::fmt;

use rustc_hash::FxHashMap;

/// A location in a named source file.
///
/// `offset` is the 0-based byte offset of the start of the location from the
/// beginning of the file. `line` is 1-based. `start_column` and `end_column`
/// are 1-based and `end_column >= start_column`; when a span covers at most
/// one byte the two MAY be equal, collapsing the position to a single point.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    /// File name, or `"stdin"` for unnamed input. Empty only for an invalid/default position.
    pub name: String,
    /// 0-based byte offset from the start of the file.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based starting column.
    pub start_column: usize,
    /// 1-based ending column, always `>= start_column`.
    pub end_column: usize,
}

impl Position {
    /// Creates a new position from its raw fields.
    #[must_use]
    pub const fn new(
        name: String,
        offset: usize,
        line: usize,
        start_column: usize,
        end_column: usize,
    ) -> Self {
        Self { name, offset, line, start_column, end_column }
    }

    /// A position pointing nowhere, used as a placeholder before real positions are known.
    #[must_use]
    pub fn invalid() -> Self { Self::new(String::new(), 0, 0, 0, 0) }

    /// A position is valid iff its name is non-empty and line/columns are all `>= 1`
    /// with `end_column >= start_column`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty()
            && self.line >= 1
            && self.start_column >= 1
            && self.end_column >= 1
            && self.end_column >= self.start_column
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return write!(
                f,
                "BadPosition: {{name: {:?}, offset: {}, line: {}, start_column: {}, end_column: {}}}",
                self.name, self.offset, self.line, self.start_column, self.end_column
            );
        }

        if self.start_column == self.end_column {
            write!(f, "{}:{}:{}", self.name, self.line, self.start_column)
        } else {
            write!(f, "{}:{}:{}-{}", self.name, self.line, self.start_column, self.end_column)
        }
    }
}

// Ordering compares (name, offset) only, per the position model: two positions
// built from the same offset in the same file describe the same place even if
// one caller collapsed start/end columns and another didn't.
impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name).then_with(|| self.offset.cmp(&other.offset))
    }
}

/// A diagnostic message anchored to a source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Human-readable description of the problem.
    pub message: String,
    /// Where in the source the problem was found.
    pub position: Position,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self { message: message.into(), position }
    }

    /// Sorts a collection of diagnostics in place by position.
    pub fn sort_all(diagnostics: &mut [Self]) { diagnostics.sort_by(|a, b| a.cmp(b)); }
}

impl PartialOrd for Diagnostic {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Diagnostic {
    fn cmp(&self, other: &Self) -> Ordering { self.position.cmp(&other.position) }
}

impl fmt::Display for Diagnostic {
    /// Canonical `position: message` form, terminated by a newline for
    /// line-oriented display (one diagnostic per line in a report).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.position, self.message)
    }
}

/// A named source file with precomputed line-start offsets.
///
/// Exists so that the scanner and parser can turn a byte offset into a
/// [`Position`] in O(log n) rather than re-walking the file from the start on
/// every diagnostic. Neither the scanner nor the parser require one to run —
/// both accept a single named byte slice directly — but a host juggling
/// several open `.http` files will usually want one per file, tied together
/// by a [`SourceManager`].
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name, used in positions and diagnostics.
    pub name: String,
    /// The full source text.
    pub content: String,
    /// Byte offsets of the start of each line; `line_starts[0]` is always `0`.
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Creates a new source file, computing its line-start table up front.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let line_starts = Self::compute_line_starts(&content);
        Self { name: name.into(), content, line_starts }
    }

    fn compute_line_starts(content: &str) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, c) in content.char_indices() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    /// Returns the (1-based line, 1-based column) for a byte offset.
    ///
    /// The offset is clamped to the length of the content so callers don't
    /// need to special-case the end-of-file sentinel offset.
    fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.content.len());
        match self.line_starts.binary_search(&offset) {
            Ok(line) => (line + 1, 1),
            Err(insertion) => {
                let line = insertion - 1;
                let col = offset - self.line_starts[line] + 1;
                (line + 1, col)
            }
        }
    }

    /// Builds a point [`Position`] for a single byte offset.
    #[must_use]
    pub fn position_at(&self, offset: usize) -> Position {
        let (line, col) = self.line_col(offset);
        Position::new(self.name.clone(), offset, line, col, col)
    }

    /// Builds a [`Position`] spanning `[start, end)`.
    ///
    /// When the span crosses a line boundary there is no single line/column
    /// range that describes it; the end column collapses to one past the
    /// start column rather than reporting a column on a different line.
    #[must_use]
    pub fn position_for_span(&self, start: usize, end: usize) -> Position {
        let (line, start_col) = self.line_col(start);
        if end <= start {
            return Position::new(self.name.clone(), start, line, start_col, start_col);
        }

        let (end_line, end_col) = self.line_col(end);
        let end_col = if end_line == line { end_col.max(start_col) } else { start_col + 1 };

        Position::new(self.name.clone(), start, line, start_col, end_col)
    }

    /// Returns the source text covered by `[start, end)`.
    #[must_use]
    pub fn text(&self, start: usize, end: usize) -> &str { &self.content[start..end] }
}

/// Keeps track of more than one open [`SourceFile`] by name.
///
/// A convenience for hosts (editors, batch tooling) juggling several `.http`
/// documents; the scanner and parser operate on one source at a time and
/// don't need this.
#[derive(Debug, Default)]
pub struct SourceManager {
    files: FxHashMap<String, SourceFile>,
}

impl SourceManager {
    /// Creates an empty manager.
    #[must_use]
    pub fn new() -> Self { Self { files: FxHashMap::default() } }

    /// Adds (or replaces) a file by name, returning the previous contents if any.
    pub fn insert(&mut self, file: SourceFile) -> Option<SourceFile> {
        self.files.insert(file.name.clone(), file)
    }

    /// Looks up a file by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SourceFile> { self.files.get(name) }
}
