//! Compiled CSS selector lists and `querySelectorAll`-style lookups.

use selectors::context::{MatchingContext, SelectorCaches};
use selectors::parser::{ParseRelative, Selector, SelectorList};

use super::arena::{Dom, NodeId};
use super::element_ref::{ElementRef, PageSelectors};
use crate::error::{Error, Result};

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone)]
pub struct SelectorSet {
    source: String,
    selectors: Vec<Selector<PageSelectors>>,
}

impl SelectorSet {
    /// Parse a selector list such as `"#home-content h1, .preview-section p"`.
    pub fn parse(css: &str) -> Result<Self> {
        let mut input = cssparser::ParserInput::new(css);
        let mut parser = cssparser::Parser::new(&mut input);
        let list = SelectorList::parse(&PageSelectors, &mut parser, ParseRelative::No)
            .map_err(|_| Error::InvalidSelector(css.to_string()))?;
        Ok(Self {
            source: css.to_string(),
            selectors: list.slice().to_vec(),
        })
    }

    /// The selector text this set was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check whether an element matches any selector in the set.
    pub fn matches(&self, dom: &Dom, id: NodeId) -> bool {
        if !dom.is_element(id) {
            return false;
        }
        let elem = ElementRef::new(dom, id);
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            selectors::matching::MatchingMode::Normal,
            None,
            &mut caches,
            selectors::context::QuirksMode::NoQuirks,
            selectors::matching::NeedsSelectorFlags::No,
            selectors::matching::MatchingForInvalidation::No,
        );
        self.selectors.iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, &elem, &mut context)
        })
    }
}

impl Dom {
    /// Every element under `scope` matching `set`, in document order.
    ///
    /// Like `querySelectorAll`, ancestors outside `scope` still take part
    /// in matching descendant combinators.
    pub fn select_all(&self, scope: NodeId, set: &SelectorSet) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| set.matches(self, id))
            .collect()
    }

    /// First element under `scope` matching `set`.
    pub fn select_first(&self, scope: NodeId, set: &SelectorSet) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&id| set.matches(self, id))
    }

    /// Parse `css` and return every match under `scope`.
    pub fn query_all(&self, scope: NodeId, css: &str) -> Result<Vec<NodeId>> {
        Ok(self.select_all(scope, &SelectorSet::parse(css)?))
    }

    /// Parse `css` and return the first match under `scope`.
    pub fn query(&self, scope: NodeId, css: &str) -> Result<Option<NodeId>> {
        Ok(self.select_first(scope, &SelectorSet::parse(css)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn matches(html: &str, tag: &str, css: &str) -> bool {
        let dom = parse_html(html);
        let id = dom.find_by_tag(tag).unwrap();
        SelectorSet::parse(css).unwrap().matches(&dom, id)
    }

    #[test]
    fn test_tag_class_and_id_selectors() {
        let html = r#"<p id="main" class="intro highlight">Hello</p>"#;
        assert!(matches(html, "p", "p"));
        assert!(matches(html, "p", ".intro"));
        assert!(matches(html, "p", "p.highlight#main"));
        assert!(!matches(html, "p", ".missing"));
        assert!(!matches(html, "p", "div"));
    }

    #[test]
    fn test_combinators() {
        assert!(matches("<div><span><p>x</p></span></div>", "p", "div p"));
        assert!(!matches("<div><span><p>x</p></span></div>", "p", "div > p"));
        assert!(matches("<div><span><p>x</p></span></div>", "p", "span > p"));
    }

    #[test]
    fn test_negation_and_attribute_selectors() {
        assert!(!matches(r#"<p class="post-meta">x</p>"#, "p", "p:not(.post-meta)"));
        assert!(matches(r#"<p class="body">x</p>"#, "p", "p:not(.post-meta)"));
        assert!(matches(
            r#"<div id="post-3-content">x</div>"#,
            "div",
            r#"div[id^="post-"][id$="-content"]"#
        ));
    }

    #[test]
    fn test_select_all_in_document_order() {
        let dom = parse_html("<div id=a><h1>1</h1><p>2</p><section><h2>3</h2></section></div>");
        let scope = dom.get_by_id("a").unwrap();
        let found = dom.query_all(scope, "h2, h1, p").unwrap();
        let texts: Vec<_> = found.iter().map(|&n| dom.text_content(n)).collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        assert!(matches!(
            SelectorSet::parse("p:::"),
            Err(Error::InvalidSelector(_))
        ));
    }
}
