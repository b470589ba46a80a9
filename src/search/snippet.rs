//! Context snippets around the first match.

use crate::dom::escape_html;
use crate::pattern::TermPattern;

/// How much context a snippet keeps around the first match, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnippetWindow {
    pub before: usize,
    pub after: usize,
}

/// Build an HTML snippet of `text` around the first match of `pattern`.
///
/// The window runs from `before` characters ahead of the match to
/// `term_len + after` characters past its start. Ellipses mark truncated
/// ends, every match inside the window is wrapped in `<strong>`, and all
/// other text is escaped. Returns `None` when the text does not match.
pub fn make_snippet(
    text: &str,
    pattern: &TermPattern,
    term_len: usize,
    window: SnippetWindow,
) -> Option<String> {
    let first = pattern.find(text)?;
    let match_char = text[..first.start].chars().count();
    let total_chars = text.chars().count();

    let start = match_char.saturating_sub(window.before);
    let end = total_chars.min(match_char + term_len + window.after);

    let excerpt: String = text.chars().skip(start).take(end - start).collect();
    let excerpt = excerpt.trim();

    let mut html = String::with_capacity(excerpt.len() + 32);
    if start > 0 {
        html.push_str("...");
    }
    let mut last = 0;
    for range in pattern.find_all(excerpt) {
        html.push_str(&escape_html(&excerpt[last..range.start]));
        html.push_str("<strong>");
        html.push_str(&escape_html(&excerpt[range.clone()]));
        html.push_str("</strong>");
        last = range.end;
    }
    html.push_str(&escape_html(&excerpt[last..]));
    if end < total_chars {
        html.push_str("...");
    }
    Some(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: SnippetWindow = SnippetWindow {
        before: 30,
        after: 50,
    };

    fn snippet(text: &str, term: &str) -> Option<String> {
        let pattern = TermPattern::new(term).unwrap();
        make_snippet(text, &pattern, term.chars().count(), WINDOW)
    }

    #[test]
    fn test_short_text_has_no_ellipses() {
        assert_eq!(
            snippet("A cat sat", "cat").as_deref(),
            Some("A <strong>cat</strong> sat")
        );
    }

    #[test]
    fn test_long_text_is_windowed() {
        let text = format!("{}needle{}", "x".repeat(100), "y".repeat(100));
        let s = snippet(&text, "needle").unwrap();
        let expected = format!(
            "...{}<strong>needle</strong>{}...",
            "x".repeat(30),
            "y".repeat(50)
        );
        assert_eq!(s, expected);
    }

    #[test]
    fn test_escapes_surrounding_text() {
        assert_eq!(
            snippet("<b>cats</b> & dogs", "cat").as_deref(),
            Some("&lt;b&gt;<strong>cat</strong>s&lt;/b&gt; &amp; dogs")
        );
    }

    #[test]
    fn test_window_counts_characters_not_bytes() {
        let text = format!("{}cat", "é".repeat(40));
        let s = snippet(&text, "cat").unwrap();
        assert_eq!(s, format!("...{}<strong>cat</strong>", "é".repeat(30)));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(snippet("nothing here", "cat"), None);
    }
}
