//! Character classification predicates the scanner's run-lexing routines key off of.

/// `A-Z`, `a-z`.
#[must_use]
pub fn is_alpha(c: char) -> bool { c.is_ascii_alphabetic() }

/// `0-9`.
#[must_use]
pub fn is_digit(c: char) -> bool { c.is_ascii_digit() }

/// Identifier characters: alphanumeric, `_`, `-`.
#[must_use]
pub fn is_ident(c: char) -> bool { c.is_ascii_alphanumeric() || c == '_' || c == '-' }

/// `A-Z` only.
#[must_use]
pub fn is_upper_alpha(c: char) -> bool { c.is_ascii_uppercase() }

/// Any character that may appear in unescaped text content: not whitespace, not `{`.
#[must_use]
pub fn is_text(c: char) -> bool { !c.is_whitespace() && c != '{' }

const URL_PUNCTUATION: [char; 21] = [
    '$', '-', '_', '.', '+', '!', '*', '\'', '(', ')', ',', ':', '/', '?', '#', '[', ']', '@',
    '&', ';', '%',
];

/// Characters that may appear unescaped in a URL, including the `%` of a percent-escape.
#[must_use]
pub fn is_url(c: char) -> bool { c.is_ascii_alphanumeric() || URL_PUNCTUATION.contains(&c) }

/// Characters that may appear unescaped in a file path.
#[must_use]
pub fn is_file_path(c: char) -> bool { is_ident(c) || c == '.' || c == '/' || c == '\\' }

/// Space or tab — whitespace that does not end a line.
#[must_use]
pub fn is_line_space(c: char) -> bool { c == ' ' || c == '\t' }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_allows_hyphen_and_underscore() {
        assert!(is_ident('-'));
        assert!(is_ident('_'));
        assert!(is_ident('9'));
        assert!(!is_ident(' '));
    }

    #[test]
    fn url_includes_percent_and_punctuation() {
        assert!(is_url('%'));
        assert!(is_url(':'));
        assert!(is_url('/'));
        assert!(!is_url(' '));
        assert!(!is_url('{'));
    }

    #[test]
    fn text_excludes_whitespace_and_open_brace() {
        assert!(is_text('a'));
        assert!(is_text(','));
        assert!(!is_text(' '));
        assert!(!is_text('{'));
    }

    #[test]
    fn line_space_excludes_newline() {
        assert!(is_line_space(' '));
        assert!(is_line_space('\t'));
        assert!(!is_line_space('\n'));
    }
}
