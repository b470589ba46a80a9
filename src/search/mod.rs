//! In-page site search.
//!
//! Searching is a scan, not an index: every query walks the scan targets'
//! selectors over the live page, so results always reflect what the page
//! currently holds. Hits become HTML snippets grouped by section label.
//!
//! ```
//! use folio::{Config, Page, SearchEngine, SearchOutcome};
//!
//! let html = r#"<div class="gallery-page-container">
//!   <div id="home-content"><p>Cats are great.</p></div>
//! </div>"#;
//! let config = Config::default();
//! let page = Page::parse(html, &config).unwrap();
//! let engine = SearchEngine::new(&config.search).unwrap();
//!
//! match engine.query(&page, "cat") {
//!     SearchOutcome::Results { groups } => {
//!         assert_eq!(groups[0].label, "Home");
//!         assert_eq!(groups[0].results[0].snippet_html, "<strong>Cat</strong>s are great.");
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

mod keywords;
mod scan;
mod snippet;

pub use keywords::{Advice, AdviceTable, KeywordTable};
pub use scan::{ScanKind, ScanTarget, default_targets};
pub use snippet::{SnippetWindow, make_snippet};

use serde::Serialize;
use tracing::debug;

use crate::config::SearchConfig;
use crate::dom::{Attribute, Dom, NodeId, SelectorSet, escape_html};
use crate::error::Result;
use crate::page::{Page, Section};
use crate::pattern::TermPattern;
use crate::route::{PostId, Route};

pub const RESULT_ITEM_CLASS: &str = "search-result-item";
pub const RESULT_SECTION_CLASS: &str = "search-result-section";
pub const NO_RESULTS_CLASS: &str = "no-results";
pub const VISIBLE_CLASS: &str = "visible";
pub const RESULT_INDEX_ATTR: &str = "data-result-index";

const POST_TEXT_SELECTOR: &str = "h1, h2, p";
const BLOG_CARD_CLASS: &str = "blog-post-card";
const BLOG_LINK_SELECTOR: &str = ".blog-card-link-wrapper";

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Label of the group this hit is listed under.
    pub section_label: String,
    pub section: Section,
    /// Escaped snippet with `<strong>` around matches.
    pub snippet_html: String,
    pub post_id: Option<PostId>,
    /// Where selecting the hit navigates to.
    pub route: Route,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultGroup {
    pub label: String,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Query below the minimum length; the dropdown is cleared.
    TooShort,
    /// The query named a distraction keyword.
    Redirect { keyword: String, route: Route },
    Results { groups: Vec<ResultGroup> },
    NoResults { term: String },
}

impl SearchOutcome {
    /// Every hit in display order.
    pub fn results(&self) -> impl Iterator<Item = &SearchResult> {
        let groups: &[ResultGroup] = match self {
            SearchOutcome::Results { groups } => groups,
            _ => &[],
        };
        groups.iter().flat_map(|g| g.results.iter())
    }
}

#[derive(Debug)]
struct CompiledTarget {
    target: ScanTarget,
    selectors: Vec<SelectorSet>,
}

/// Query engine over a bound page.
#[derive(Debug)]
pub struct SearchEngine {
    targets: Vec<CompiledTarget>,
    keywords: KeywordTable,
    config: SearchConfig,
    post_text: SelectorSet,
    blog_link: SelectorSet,
}

impl SearchEngine {
    /// Engine with the default scan targets and keyword table.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Self::with_targets(config, default_targets(), KeywordTable::default())
    }

    pub fn with_targets(
        config: &SearchConfig,
        targets: Vec<ScanTarget>,
        keywords: KeywordTable,
    ) -> Result<Self> {
        let targets = targets
            .into_iter()
            .map(|target| {
                let selectors = target
                    .selectors
                    .iter()
                    .map(|s| SelectorSet::parse(s))
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledTarget { target, selectors })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            targets,
            keywords,
            config: config.clone(),
            post_text: SelectorSet::parse(POST_TEXT_SELECTOR)?,
            blog_link: SelectorSet::parse(BLOG_LINK_SELECTOR)?,
        })
    }

    pub fn set_keywords(&mut self, keywords: KeywordTable) {
        self.keywords = keywords;
    }

    /// Run a query against the page.
    pub fn query(&self, page: &Page, raw: &str) -> SearchOutcome {
        let term = raw.trim();
        if term.chars().count() < self.config.min_query_len {
            return SearchOutcome::TooShort;
        }

        if let Some(keyword) = self.keywords.match_query(term)
            && page.has_section(Section::Goals)
        {
            debug!(keyword, "distraction keyword, redirecting to goals");
            return SearchOutcome::Redirect {
                keyword: keyword.to_string(),
                route: Route::section(Section::Goals).with_trigger(keyword),
            };
        }

        let Some(pattern) = TermPattern::new(term) else {
            return SearchOutcome::TooShort;
        };
        let mut hits = Hits::new(term, &pattern, &self.config);
        let dom = &page.dom;

        for compiled in &self.targets {
            let target = &compiled.target;
            if !page.has_section(target.section) {
                continue;
            }
            for set in &compiled.selectors {
                for el in dom.select_all(page.container(), set) {
                    match target.kind {
                        ScanKind::Text => {
                            let primary = is_heading(dom, el)
                                .then(|| dom.text_content(el).trim().to_string());
                            hits.add(
                                &target.label,
                                target.section,
                                None,
                                &dom.text_content(el),
                                primary.as_deref(),
                            );
                        }
                        ScanKind::BlogList => self.scan_blog_entry(dom, el, target, &mut hits),
                        ScanKind::WallCard => {
                            let title = first_tag_text(dom, el, "h3");
                            let desc = first_tag_text(dom, el, "p");
                            let tags = dom.get_attr(el, "data-tags").unwrap_or_default();
                            let primary = if title.is_empty() { "Wallpaper" } else { title.as_str() };
                            hits.add(
                                &target.label,
                                target.section,
                                None,
                                &format!("{title} {desc} {tags}"),
                                Some(primary),
                            );
                        }
                    }
                }
            }
        }

        if page.has_section(Section::Post) {
            for (post, block) in page.post_blocks() {
                let title = match first_tag_text(dom, block, "h1") {
                    t if t.is_empty() => format!("Post {}", post.number()),
                    t => t,
                };
                let label = format!("Blog: {title}");
                for el in dom.select_all(block, &self.post_text) {
                    hits.add(&label, Section::Blog, Some(&post), &dom.text_content(el), None);
                }
            }
        }

        let groups = hits.into_groups(self.config.max_results_per_group);
        debug!(term, groups = groups.len(), "search finished");
        if groups.is_empty() {
            SearchOutcome::NoResults {
                term: term.to_string(),
            }
        } else {
            SearchOutcome::Results { groups }
        }
    }

    fn scan_blog_entry(&self, dom: &Dom, el: NodeId, target: &ScanTarget, hits: &mut Hits<'_>) {
        let Some(card) = dom.closest(el, |d, n| d.has_class(n, BLOG_CARD_CLASS)) else {
            return;
        };
        let Some(post) = dom
            .select_first(card, &self.blog_link)
            .and_then(|link| dom.get_attr(link, "data-post-id"))
            .and_then(PostId::parse)
        else {
            return;
        };
        let primary = if dom.is_tag(el, "h3") {
            dom.text_content(el)
        } else {
            match first_tag_text(dom, card, "h3") {
                t if t.is_empty() => "Blog Item".to_string(),
                t => t,
            }
        };
        hits.add(
            &target.label,
            target.section,
            Some(&post),
            &dom.text_content(el),
            Some(primary.trim()),
        );
    }
}

/// Write an outcome into the results container. Returns the hits in the
/// order their `data-result-index` refers to.
pub fn render_outcome(page: &mut Page, outcome: &SearchOutcome) -> Vec<SearchResult> {
    let Some(container) = page.search().results else {
        return Vec::new();
    };
    let dom = &mut page.dom;
    dom.clear_children(container);

    match outcome {
        SearchOutcome::TooShort | SearchOutcome::Redirect { .. } => {
            dom.remove_class(container, VISIBLE_CLASS);
            Vec::new()
        }
        SearchOutcome::NoResults { term } => {
            let item = dom.create_html_element(
                "div",
                vec![Attribute::new("class", format!("{RESULT_ITEM_CLASS} {NO_RESULTS_CLASS}"))],
            );
            dom.append_text(item, &format!("No results found for \"{term}\""));
            dom.append(container, item);
            dom.add_class(container, VISIBLE_CLASS);
            Vec::new()
        }
        SearchOutcome::Results { groups } => {
            let mut flat = Vec::new();
            for group in groups {
                let header = dom.create_html_element(
                    "div",
                    vec![Attribute::new("class", RESULT_SECTION_CLASS)],
                );
                dom.append_text(header, &group.label);
                dom.append(container, header);

                for result in &group.results {
                    let item = dom.create_html_element(
                        "div",
                        vec![
                            Attribute::new("class", RESULT_ITEM_CLASS),
                            Attribute::new(RESULT_INDEX_ATTR, flat.len().to_string()),
                        ],
                    );
                    dom.append(container, item);
                    dom.set_inner_html(item, &result.snippet_html);
                    flat.push(result.clone());
                }
            }
            dom.add_class(container, VISIBLE_CLASS);
            flat
        }
    }
}

/// Empty and hide the results container.
pub fn hide_results(page: &mut Page) {
    if let Some(container) = page.search().results {
        page.dom.clear_children(container);
        page.dom.remove_class(container, VISIBLE_CLASS);
    }
}

/// Accumulates de-duplicated hits in scan order.
struct Hits<'a> {
    term: &'a str,
    pattern: &'a TermPattern,
    window: SnippetWindow,
    dedup_prefix: usize,
    results: Vec<SearchResult>,
}

impl<'a> Hits<'a> {
    fn new(term: &'a str, pattern: &'a TermPattern, config: &SearchConfig) -> Self {
        Self {
            term,
            pattern,
            window: SnippetWindow {
                before: config.snippet_before,
                after: config.snippet_after,
            },
            dedup_prefix: config.dedup_prefix,
            results: Vec::new(),
        }
    }

    fn add(
        &mut self,
        label: &str,
        section: Section,
        post: Option<&PostId>,
        text: &str,
        primary: Option<&str>,
    ) {
        let Some(snippet) =
            make_snippet(text, self.pattern, self.term.chars().count(), self.window)
        else {
            return;
        };
        let display = match primary.filter(|p| !p.is_empty()) {
            Some(primary) => format!("<em>{}:</em> {snippet}", escape_html(primary)),
            None => snippet,
        };

        let prefix = |s: &str| s.chars().take(self.dedup_prefix).collect::<String>();
        let key = prefix(&display);
        let duplicate = self.results.iter().any(|r| {
            r.section == section && r.post_id.as_ref() == post && prefix(&r.snippet_html) == key
        });
        if duplicate {
            return;
        }

        let route = match post {
            Some(post) => Route::post(post.clone()),
            None => Route::section(section),
        }
        .with_trigger(self.term);
        self.results.push(SearchResult {
            section_label: label.to_string(),
            section,
            snippet_html: display,
            post_id: post.cloned(),
            route,
        });
    }

    fn into_groups(self, cap: usize) -> Vec<ResultGroup> {
        let mut groups: Vec<ResultGroup> = Vec::new();
        for result in self.results {
            match groups.iter_mut().find(|g| g.label == result.section_label) {
                Some(group) if group.results.len() < cap => group.results.push(result),
                Some(_) => {}
                None => groups.push(ResultGroup {
                    label: result.section_label.clone(),
                    results: vec![result],
                }),
            }
        }
        groups
    }
}

fn is_heading(dom: &Dom, el: NodeId) -> bool {
    ["h1", "h2", "h3"].iter().any(|t| dom.is_tag(el, t))
}

fn first_tag_text(dom: &Dom, scope: NodeId, tag: &str) -> String {
    dom.descendants(scope)
        .into_iter()
        .find(|&n| dom.is_tag(n, tag))
        .map(|n| dom.text_content(n).trim().to_string())
        .unwrap_or_default()
}
