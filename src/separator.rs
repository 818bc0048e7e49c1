//! Field separator used to split a raw line into columns.

use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// FieldSeparator splits a line into columns. Only the first column is
/// ever consulted.
///
/// # Formats
/// - `" "` or `\s+`: runs of whitespace (the default)
/// - a single character such as `,` or `\t`: that literal character
/// - anything longer: a regular expression
#[derive(Debug, Clone, Default)]
pub enum FieldSeparator {
    /// One or more whitespace characters
    #[default]
    Whitespace,
    /// A literal delimiter
    Literal(String),
    /// A regular expression delimiter
    Pattern(Regex),
}

impl FieldSeparator {
    /// Parse a separator the way awk's `-F` reads its argument.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidSeparator {
                separator: s.to_string(),
                reason: "separator is empty".to_string(),
            });
        }

        if s == " " || s == r"\s+" {
            return Ok(FieldSeparator::Whitespace);
        }

        if s.chars().count() == 1 {
            return Ok(FieldSeparator::Literal(s.to_string()));
        }

        let re = Regex::new(s).map_err(|e| Error::InvalidSeparator {
            separator: s.to_string(),
            reason: e.to_string(),
        })?;

        // A delimiter that matches nothing would split between every character
        if re.is_match("") {
            return Err(Error::InvalidSeparator {
                separator: s.to_string(),
                reason: "pattern matches the empty string".to_string(),
            });
        }

        Ok(FieldSeparator::Pattern(re))
    }

    /// Return the first column of `line`. Leading whitespace is skipped
    /// before splitting.
    pub fn first_field<'a>(&self, line: &'a str) -> &'a str {
        let line = line.trim_start();
        let first = match self {
            FieldSeparator::Whitespace => line.split(char::is_whitespace).next(),
            FieldSeparator::Literal(delim) => line.split(delim.as_str()).next(),
            FieldSeparator::Pattern(re) => re.split(line).next(),
        };
        first.unwrap_or("")
    }
}

impl fmt::Display for FieldSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldSeparator::Whitespace => write!(f, r"\s+"),
            FieldSeparator::Literal(delim) => write!(f, "{}", delim),
            FieldSeparator::Pattern(re) => write!(f, "{}", re.as_str()),
        }
    }
}

impl FromStr for FieldSeparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldSeparator::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_default() {
        let sep = FieldSeparator::default();
        assert_eq!(sep.first_field("example.com  # ads"), "example.com");
        assert_eq!(sep.first_field("\t  example.com\tfoo bar"), "example.com");
        assert_eq!(sep.first_field("example.com"), "example.com");
        assert_eq!(sep.first_field(""), "");
    }

    #[test]
    fn test_parse_kinds() {
        assert!(matches!(FieldSeparator::parse(" ").unwrap(), FieldSeparator::Whitespace));
        assert!(matches!(FieldSeparator::parse(r"\s+").unwrap(), FieldSeparator::Whitespace));
        assert!(matches!(FieldSeparator::parse(",").unwrap(), FieldSeparator::Literal(_)));
        assert!(matches!(FieldSeparator::parse("\t").unwrap(), FieldSeparator::Literal(_)));
        assert!(matches!(FieldSeparator::parse("[,;]").unwrap(), FieldSeparator::Pattern(_)));
    }

    #[test]
    fn test_literal_comma() {
        let sep = FieldSeparator::parse(",").unwrap();
        assert_eq!(sep.first_field("example.com,malware site,2024"), "example.com");
        assert_eq!(sep.first_field("  1.2.3.4 ,x"), "1.2.3.4 ");
        assert_eq!(sep.first_field(",example.com"), "");
    }

    #[test]
    fn test_single_char_is_not_regex() {
        let sep = FieldSeparator::parse("|").unwrap();
        assert_eq!(sep.first_field("a.b|c"), "a.b");
        let sep = FieldSeparator::parse(".").unwrap();
        assert_eq!(sep.first_field("abc.def"), "abc");
    }

    #[test]
    fn test_pattern() {
        let sep = FieldSeparator::parse(r"[,;]\s*").unwrap();
        assert_eq!(sep.first_field("example.org; ads"), "example.org");
    }

    #[test]
    fn test_invalid_separators() {
        assert!(matches!(
            FieldSeparator::parse(""),
            Err(Error::InvalidSeparator { .. })
        ));
        assert!(matches!(
            FieldSeparator::parse("[,"),
            Err(Error::InvalidSeparator { .. })
        ));
        assert!(matches!(
            FieldSeparator::parse(",*"),
            Err(Error::InvalidSeparator { .. })
        ));
    }
}
