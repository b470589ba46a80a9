//! Case-insensitive literal term matching.

use std::ops::Range;

use regex::{Regex, RegexBuilder};

/// A search term compiled for case-insensitive literal matching.
///
/// Regex metacharacters in the term match themselves.
#[derive(Debug, Clone)]
pub struct TermPattern {
    regex: Regex,
}

impl TermPattern {
    /// Compile a term. Returns `None` for an empty term.
    pub fn new(term: &str) -> Option<Self> {
        if term.is_empty() {
            return None;
        }
        RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
            .ok()
            .map(|regex| Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Byte range of the first match.
    pub fn find(&self, text: &str) -> Option<Range<usize>> {
        self.regex.find(text).map(|m| m.range())
    }

    /// Byte ranges of every non-overlapping match.
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        self.regex.find_iter(text).map(|m| m.range()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_literal() {
        let p = TermPattern::new("Cat").unwrap();
        assert_eq!(p.find_all("cat CAT concat"), vec![0..3, 4..7, 11..14]);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let p = TermPattern::new("a.b").unwrap();
        assert!(!p.is_match("axb"));
        assert!(p.is_match("A.B"));
        let p = TermPattern::new("(c++)").unwrap();
        assert_eq!(p.find("learn (C++) now"), Some(6..11));
    }

    #[test]
    fn test_empty_term() {
        assert!(TermPattern::new("").is_none());
    }
}
