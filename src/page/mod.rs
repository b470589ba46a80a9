//! Page template binding.
//!
//! A [`Page`] owns the parsed template and the anchors the runtime works
//! against: section roots, nav buttons, the search widget, and the post
//! content blocks. Anchors are resolved once at startup. A missing page
//! container or default section is fatal; anything else is logged and the
//! feature that needs it is disabled.

mod section;

pub use section::{DisplayMode, Section};

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::dom::{self, Dom, NodeId, SelectorSet};
use crate::error::{Error, Result};
use crate::route::PostId;

const NAV_BUTTON_SELECTOR: &str = ".filter-nav .filter-btn";
const NAV_SELECTOR: &str = ".filter-nav";
const HEADER_SELECTOR: &str = "header";
const POST_BLOCK_SELECTOR: &str = r#"div[id^="post-"][id$="-content"]"#;

static POST_BLOCK_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(post-\d+)-content$").unwrap());

/// A nav control that selects a section.
#[derive(Debug, Clone, PartialEq)]
pub struct NavButton {
    pub node: NodeId,
    pub section: Section,
    /// Canonical URL from `data-url`, if the template declares one.
    pub url: Option<String>,
}

/// Anchors of the search widget. Each is optional; search is disabled
/// when the input or results container is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchAnchors {
    pub widget: Option<NodeId>,
    pub toggle: Option<NodeId>,
    pub input: Option<NodeId>,
    pub results: Option<NodeId>,
}

impl SearchAnchors {
    pub fn is_usable(&self) -> bool {
        self.input.is_some() && self.results.is_some()
    }
}

/// The bound page template.
#[derive(Debug)]
pub struct Page {
    pub dom: Dom,
    container: NodeId,
    sections: BTreeMap<Section, NodeId>,
    nav_buttons: Vec<NavButton>,
    search: SearchAnchors,
    header: Option<NodeId>,
    nav: Option<NodeId>,
    goal_list: Option<NodeId>,
    advice_box: Option<NodeId>,
    body: Option<NodeId>,
    copyright_year: Option<NodeId>,
}

impl Page {
    /// Parse and bind a page template.
    pub fn parse(html: &str, config: &Config) -> Result<Self> {
        Self::bind(dom::parse_html(html), config)
    }

    /// Parse template bytes with charset detection, then bind.
    pub fn parse_bytes(html: &[u8], config: &Config) -> Result<Self> {
        Self::bind(dom::parse_html_bytes(html), config)
    }

    /// Resolve every anchor in an already parsed document.
    pub fn bind(dom: Dom, config: &Config) -> Result<Self> {
        let root = dom.document();
        let container = dom
            .query(root, &config.container_selector)?
            .ok_or_else(|| Error::MissingElement(config.container_selector.clone()))?;

        let mut sections = BTreeMap::new();
        for section in Section::ALL {
            match dom.query(container, section.root_selector())? {
                Some(node) => {
                    sections.insert(section, node);
                }
                None if section == config.default_section => {
                    return Err(Error::MissingElement(section.root_selector().to_string()));
                }
                None if section.is_optional() => {
                    debug!(section = %section, "post view not present, post routes disabled");
                }
                None => {
                    warn!(section = %section, selector = section.root_selector(), "section root missing");
                }
            }
        }

        let nav_buttons = bind_nav_buttons(&dom, container)?;
        let search = SearchAnchors {
            widget: dom.get_by_id("search-widget"),
            toggle: dom.get_by_id("searchToggle"),
            input: dom.get_by_id("pageSearchInput"),
            results: dom.get_by_id("searchResults"),
        };
        if !search.is_usable() {
            warn!("search input or results container missing, site search disabled");
        }

        Ok(Self {
            header: dom.query(container, HEADER_SELECTOR)?,
            nav: dom.query(container, NAV_SELECTOR)?,
            goal_list: dom.get_by_id("goal-list"),
            advice_box: dom.get_by_id("telegram-response"),
            body: dom.find_by_tag("body"),
            copyright_year: dom.query(container, "#copyright-year")?,
            dom,
            container,
            sections,
            nav_buttons,
            search,
        })
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn section_root(&self, section: Section) -> Option<NodeId> {
        self.sections.get(&section).copied()
    }

    pub fn has_section(&self, section: Section) -> bool {
        self.sections.contains_key(&section)
    }

    /// Bound section roots, in `Section` declaration order.
    pub fn sections(&self) -> impl Iterator<Item = (Section, NodeId)> + '_ {
        self.sections.iter().map(|(s, n)| (*s, *n))
    }

    pub fn nav_buttons(&self) -> &[NavButton] {
        &self.nav_buttons
    }

    /// The nav button containing `node`, if any.
    pub fn nav_button_at(&self, node: NodeId) -> Option<&NavButton> {
        self.nav_buttons
            .iter()
            .find(|b| self.dom.contains(b.node, node))
    }

    pub fn search(&self) -> &SearchAnchors {
        &self.search
    }

    pub fn header(&self) -> Option<NodeId> {
        self.header
    }

    pub fn nav(&self) -> Option<NodeId> {
        self.nav
    }

    pub fn goal_list(&self) -> Option<NodeId> {
        self.goal_list
    }

    pub fn advice_box(&self) -> Option<NodeId> {
        self.advice_box
    }

    /// Where overlays are attached.
    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn copyright_year(&self) -> Option<NodeId> {
        self.copyright_year
    }

    /// The hidden content block of a post, e.g. `#post-3-content`.
    pub fn post_block(&self, post: &PostId) -> Option<NodeId> {
        self.dom
            .get_by_id(&post.content_id())
            .filter(|&n| self.dom.contains(self.container, n))
    }

    /// Every hidden post content block under the container, in document order.
    pub fn post_blocks(&self) -> Vec<(PostId, NodeId)> {
        let Ok(set) = SelectorSet::parse(POST_BLOCK_SELECTOR) else {
            return Vec::new();
        };
        self.dom
            .select_all(self.container, &set)
            .into_iter()
            .filter_map(|node| {
                let id = self.dom.element_id(node)?;
                let caps = POST_BLOCK_ID.captures(id)?;
                Some((PostId::parse(&caps[1])?, node))
            })
            .collect()
    }

    /// Serialize the current document.
    pub fn html(&self) -> String {
        dom::document_html(&self.dom)
    }
}

fn bind_nav_buttons(dom: &Dom, container: NodeId) -> Result<Vec<NavButton>> {
    let mut buttons = Vec::new();
    for node in dom.query_all(container, NAV_BUTTON_SELECTOR)? {
        let Some(key) = dom.get_attr(node, "data-filter") else {
            warn!("nav button without data-filter ignored");
            continue;
        };
        let Some(section) = Section::from_key(key).filter(|s| s.is_navigable()) else {
            warn!(filter = key, "nav button names an unknown section");
            continue;
        };
        buttons.push(NavButton {
            node,
            section,
            url: dom.get_attr(node, "data-url").map(str::to_string),
        });
    }
    Ok(buttons)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        <div class="gallery-page-container">
          <header>Title</header>
          <nav class="filter-nav">
            <button class="filter-btn" data-filter="home" data-url="/">Home</button>
            <button class="filter-btn" data-filter="blog" data-url="/blog">Blog</button>
            <button class="filter-btn" data-filter="shop">Shop</button>
          </nav>
          <div id="home-content"><h1>Welcome</h1></div>
          <div id="blog-content"></div>
          <div id="full-blog-post-view"></div>
          <div id="post-1-content" style="display:none"><h1>One</h1></div>
          <div id="post-two-content" style="display:none"></div>
        </div>"#;

    #[test]
    fn test_bind_minimal_page() {
        let page = Page::parse(MINIMAL, &Config::default()).unwrap();
        assert!(page.has_section(Section::Home));
        assert!(page.has_section(Section::Post));
        assert!(!page.has_section(Section::Wall));
        assert_eq!(page.nav_buttons().len(), 2);
        assert_eq!(page.nav_buttons()[1].section, Section::Blog);
        assert_eq!(page.nav_buttons()[1].url.as_deref(), Some("/blog"));
        assert!(page.header().is_some());
        assert!(!page.search().is_usable());
        assert!(page.body().is_some());
        assert!(page.copyright_year().is_none());
        assert!(format!("{page:?}").starts_with("Page {"));
    }

    #[test]
    fn test_sections_follow_declaration_order() {
        let page = Page::parse(MINIMAL, &Config::default()).unwrap();
        let order: Vec<Section> = page.sections().map(|(s, _)| s).collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);
        assert_eq!(order.first(), Some(&Section::Home));
    }

    #[test]
    fn test_post_blocks_require_numeric_ids() {
        let page = Page::parse(MINIMAL, &Config::default()).unwrap();
        let blocks = page.post_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].0.as_str(), "post-1");
        let post = PostId::parse("post-1").unwrap();
        assert_eq!(page.post_block(&post), Some(blocks[0].1));
        assert!(page.post_block(&PostId::parse("post-9").unwrap()).is_none());
    }

    #[test]
    fn test_missing_container_is_fatal() {
        let err = Page::parse("<div id='home-content'></div>", &Config::default()).unwrap_err();
        assert!(matches!(err, Error::MissingElement(_)));
    }

    #[test]
    fn test_missing_default_section_is_fatal() {
        let html = r#"<div class="gallery-page-container"><div id="blog-content"></div></div>"#;
        let err = Page::parse(html, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::MissingElement(s) if s == "#home-content"));
    }

    #[test]
    fn test_nav_button_at_resolves_nested_targets() {
        let html = r#"<div class="gallery-page-container">
            <nav class="filter-nav"><button class="filter-btn" data-filter="home"><span id="icon">*</span></button></nav>
            <div id="home-content"></div></div>"#;
        let page = Page::parse(html, &Config::default()).unwrap();
        let icon = page.dom.get_by_id("icon").unwrap();
        assert_eq!(page.nav_button_at(icon).map(|b| b.section), Some(Section::Home));
    }
}
