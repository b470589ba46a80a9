//! Mutable HTML document model.
//!
//! The page template is parsed once with html5ever into an arena [`Dom`].
//! CSS selectors (via the `selectors` crate) locate anchors, and the
//! serializer gives the highlighter a reversible snapshot of element content.
//!
//! # Example
//!
//! ```
//! use folio::dom::{parse_html, inner_html};
//!
//! let mut dom = parse_html("<div id='box'><p>Hello</p></div>");
//! let div = dom.get_by_id("box").unwrap();
//! dom.set_inner_html(div, "<p>Hi <b>there</b></p>");
//! assert_eq!(inner_html(&dom, div), "<p>Hi <b>there</b></p>");
//! ```

mod arena;
mod element_ref;
mod select;
mod serialize;
mod tree_sink;

pub use arena::{Attribute, Dom, Node, NodeData, NodeId};
pub use element_ref::{ElementRef, PageSelectors};
pub use select::SelectorSet;
pub use serialize::{document_html, escape_html, inner_html, outer_html};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::PageSink;

/// Parse an HTML document.
pub fn parse_html(html: &str) -> Dom {
    parse_document(PageSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
}

/// Parse HTML bytes, detecting the encoding from a `<meta charset>` hint
/// and falling back to Windows-1252 for legacy pages.
pub fn parse_html_bytes(html: &[u8]) -> Dom {
    let hint = crate::util::extract_meta_charset(html);
    let text = crate::util::decode_text(html, hint);
    parse_html(&text)
}

impl Dom {
    /// Replace an element's children with parsed markup.
    ///
    /// The fragment is parsed in a `<body>` context, so it should hold flow
    /// or phrasing content.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        let fragment = parse_html(&format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>"));
        self.clear_children(id);
        let Some(body) = fragment.find_by_tag("body") else {
            return;
        };
        for child in fragment.children(body) {
            let copy = self.import(&fragment, child);
            self.append(id, copy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_inner_html_replaces_children() {
        let mut dom = parse_html("<div id='box'><p>old</p></div>");
        let div = dom.get_by_id("box").unwrap();
        dom.set_inner_html(div, " leading <em>emphasis</em> trailing ");
        assert_eq!(inner_html(&dom, div), " leading <em>emphasis</em> trailing ");
    }

    #[test]
    fn test_inner_html_round_trip_is_stable() {
        let source = r#"<h1>Cats &amp; dogs</h1><p class="x">A <a href="/b?c=1&amp;d=2">link</a>&nbsp;here</p>"#;
        let mut dom = parse_html(&format!("<div id='box'>{source}</div>"));
        let div = dom.get_by_id("box").unwrap();
        let first = inner_html(&dom, div);
        dom.set_inner_html(div, &first);
        assert_eq!(inner_html(&dom, div), first);
        assert_eq!(first, source);
    }

    #[test]
    fn test_parse_html_bytes_windows_1252() {
        let dom = parse_html_bytes(b"<html><body><p>caf\xe9</p></body></html>");
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.text_content(p), "caf\u{e9}");
    }
}
