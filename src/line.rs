//! Line classification and host token extraction.

use crate::FieldSeparator;

/// What a raw line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only; dropped
    Blank,
    /// Comment seen before any data line; echoed verbatim
    HeaderComment,
    /// Comment seen after the first data line; dropped
    Comment,
    /// A data line, handed to the normalizers
    Data(&'a str),
}

/// Parser state carried across one stream pass.
///
/// The only state is a one-way latch recording whether a data line has
/// been seen. Once set, comment lines are no longer echoed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserState {
    seen_data: bool,
}

impl ParserState {
    /// Create state for a fresh stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a data line has been seen yet.
    pub fn seen_data(&self) -> bool {
        self.seen_data
    }

    /// Classify one raw line, updating the latch.
    ///
    /// Order matters: blank lines are checked first, then comments, and
    /// anything else is data.
    pub fn classify<'a>(&mut self, line: &'a str) -> LineKind<'a> {
        let content = line.trim_start();

        if content.is_empty() {
            return LineKind::Blank;
        }

        if content.starts_with('#') {
            return if self.seen_data {
                LineKind::Comment
            } else {
                LineKind::HeaderComment
            };
        }

        self.seen_data = true;
        LineKind::Data(line)
    }
}

/// Extract the host token from a data line: the first column, with any
/// inline `#` comment removed and surrounding whitespace trimmed.
pub fn host_token<'a>(line: &'a str, separator: &FieldSeparator) -> &'a str {
    let field = separator.first_field(line);
    let field = match field.find('#') {
        Some(idx) => &field[..idx],
        None => field,
    };
    field.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines() {
        let mut state = ParserState::new();
        assert_eq!(state.classify(""), LineKind::Blank);
        assert_eq!(state.classify("   \t "), LineKind::Blank);
        assert!(!state.seen_data());
    }

    #[test]
    fn test_header_then_data_then_comment() {
        let mut state = ParserState::new();
        assert_eq!(state.classify("# Title: ads"), LineKind::HeaderComment);
        assert_eq!(state.classify("   # indented"), LineKind::HeaderComment);
        assert_eq!(state.classify(""), LineKind::Blank);
        assert_eq!(state.classify("# still header"), LineKind::HeaderComment);
        assert!(!state.seen_data());

        assert_eq!(state.classify("example.com"), LineKind::Data("example.com"));
        assert!(state.seen_data());

        assert_eq!(state.classify("# section two"), LineKind::Comment);
        assert_eq!(state.classify(""), LineKind::Blank);
        assert_eq!(state.classify("# trailing"), LineKind::Comment);
    }

    #[test]
    fn test_unparseable_data_still_latches() {
        let mut state = ParserState::new();
        assert_eq!(state.classify("!!!"), LineKind::Data("!!!"));
        assert_eq!(state.classify("# after"), LineKind::Comment);
    }

    #[test]
    fn test_host_token() {
        let ws = FieldSeparator::default();
        assert_eq!(host_token("example.com", &ws), "example.com");
        assert_eq!(host_token("  example.com   ", &ws), "example.com");
        assert_eq!(host_token("example.com#ads", &ws), "example.com");
        assert_eq!(host_token("1.2.3.4 # scanner", &ws), "1.2.3.4");
        assert_eq!(host_token("example.com other columns", &ws), "example.com");
    }

    #[test]
    fn test_host_token_custom_separator() {
        let comma = FieldSeparator::parse(",").unwrap();
        assert_eq!(host_token("example.com ,phishing site", &comma), "example.com");
        assert_eq!(host_token("example.com # note,x", &comma), "example.com");
        assert_eq!(host_token("bad host,x", &comma), "bad host");
    }
}
