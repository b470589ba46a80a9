//! Reversible in-place term highlighting.
//!
//! Matches are wrapped in `<span class="search-highlight">`. Before an element
//! is touched for the first time its markup is saved, and [`Highlighter::clear`]
//! writes every saved snapshot back, so clearing restores the exact markup
//! that existed before the first highlight.

use tracing::{debug, trace};

use crate::dom::{self, Attribute, Dom, NodeId, SelectorSet};
use crate::error::Result;
use crate::pattern::TermPattern;

pub const HIGHLIGHT_CLASS: &str = "search-highlight";

/// Elements searched for matches when a whole section is highlighted.
const CANDIDATES: &str =
    "h1, h2, h3, p, .card-details h3, .card-details p, .blog-card-details h3, .blog-card-details p";

/// Text under these elements is never wrapped.
const SKIPPED_PARENTS: [&str; 4] = ["script", "style", "button", "a"];

#[derive(Debug)]
pub struct Highlighter {
    /// Original inner markup per touched element, in first-touch order.
    saved: Vec<(NodeId, String)>,
    click_away: bool,
    candidates: SelectorSet,
}

impl Highlighter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            saved: Vec::new(),
            click_away: false,
            candidates: SelectorSet::parse(CANDIDATES)?,
        })
    }

    /// Highlight `term` inside one element.
    ///
    /// An element that is already highlighted is first restored, so repeated
    /// calls never nest highlight spans. Returns whether any match was wrapped.
    pub fn apply(&mut self, dom: &mut Dom, element: NodeId, term: &str) -> bool {
        let Some(pattern) = TermPattern::new(term) else {
            return false;
        };
        if dom.text_content(element).is_empty() {
            return false;
        }

        match self.saved.iter().find(|(id, _)| *id == element) {
            Some((_, original)) => {
                let original = original.clone();
                self.forget_within(dom, element);
                dom.set_inner_html(element, &original);
            }
            None => self.saved.push((element, dom::inner_html(dom, element))),
        }

        let text_nodes: Vec<NodeId> = dom
            .descendants(element)
            .into_iter()
            .filter(|&n| dom.is_text(n) && !is_skipped(dom, element, n))
            .collect();

        let mut wrapped = false;
        for node in text_nodes {
            let Some(text) = dom.text(node).map(str::to_string) else {
                continue;
            };
            let ranges = pattern.find_all(&text);
            if ranges.is_empty() {
                continue;
            }

            let mut pieces = Vec::with_capacity(ranges.len() * 2 + 1);
            let mut last = 0;
            for range in ranges {
                if range.start > last {
                    pieces.push(dom.create_text(&text[last..range.start]));
                }
                let span = dom.create_html_element(
                    "span",
                    vec![Attribute::new("class", HIGHLIGHT_CLASS)],
                );
                dom.append_text(span, &text[range.clone()]);
                pieces.push(span);
                last = range.end;
            }
            if last < text.len() {
                pieces.push(dom.create_text(&text[last..]));
            }
            dom.replace_with(node, &pieces);
            wrapped = true;
        }
        wrapped
    }

    /// Clear existing highlights, then highlight `term` in every rendered
    /// candidate element under `root`. Arms click-away clearing when
    /// anything was highlighted. Returns the number of elements changed.
    pub fn highlight_section(&mut self, dom: &mut Dom, root: NodeId, term: &str) -> usize {
        self.clear(dom);
        let targets: Vec<NodeId> = dom
            .select_all(root, &self.candidates)
            .into_iter()
            .filter(|&n| dom.is_rendered(n))
            .collect();

        let count = targets
            .into_iter()
            .filter(|&el| self.apply(dom, el, term))
            .count();
        if count > 0 {
            self.click_away = true;
        }
        debug!(term, elements = count, "section highlighted");
        count
    }

    /// Restore every touched element and disarm click-away clearing.
    ///
    /// Elements that have since left the document are skipped.
    pub fn clear(&mut self, dom: &mut Dom) {
        if self.saved.is_empty() && !self.click_away {
            return;
        }
        trace!(elements = self.saved.len(), "clearing highlights");
        while let Some((element, original)) = self.saved.pop() {
            if dom.is_attached(element) {
                self.forget_within(dom, element);
                dom.set_inner_html(element, &original);
            }
        }
        self.click_away = false;
    }

    /// Drop the snapshots of elements strictly inside `root`.
    ///
    /// Must run before `root`'s children are replaced: their slots are
    /// recycled, and a stale snapshot would later be written into whatever
    /// node took the slot.
    pub fn forget_within(&mut self, dom: &Dom, root: NodeId) {
        self.saved
            .retain(|&(id, _)| id == root || !dom.contains(root, id));
    }

    /// Make the next click outside the search widget clear highlights.
    pub fn arm_click_away(&mut self) {
        self.click_away = true;
    }

    pub fn is_armed(&self) -> bool {
        self.click_away
    }

    pub fn is_active(&self) -> bool {
        !self.saved.is_empty()
    }

    /// Handle a document click. Returns whether highlights were cleared.
    pub fn on_document_click(&mut self, dom: &mut Dom, inside_search_widget: bool) -> bool {
        if !self.click_away || inside_search_widget {
            return false;
        }
        self.clear(dom);
        true
    }
}

fn is_skipped(dom: &Dom, element: NodeId, text_node: NodeId) -> bool {
    dom.ancestors(text_node)
        .take_while(|&a| a != element)
        .any(|a| SKIPPED_PARENTS.iter().any(|tag| dom.is_tag(a, tag)))
}
