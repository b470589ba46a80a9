//! Mapping between URL paths and routes.

use std::collections::{BTreeMap, HashMap};

use percent_encoding::percent_decode_str;
use tracing::{debug, warn};

use super::{PostId, Route};
use crate::config::Config;
use crate::page::{Page, Section};

/// Bidirectional path table built once from the page's nav buttons.
///
/// Each navigable section gets one canonical path (from `data-url`, else
/// `/<key>`, with `/` for the default section). Lookup additionally accepts
/// `/<key>`, configured aliases, and `/` for the default section. Post routes
/// live under the blog path: `/blog/post-3`.
#[derive(Debug, Clone)]
pub struct PathTable {
    canonical: BTreeMap<Section, String>,
    lookup: HashMap<String, Section>,
    default: Section,
}

impl PathTable {
    pub fn from_page(page: &Page, config: &Config) -> Self {
        let default = config.default_section;
        let mut canonical = BTreeMap::new();

        for button in page.nav_buttons() {
            if let Some(url) = &button.url {
                canonical
                    .entry(button.section)
                    .or_insert_with(|| normalize_path(url));
            }
        }
        for section in Section::ALL.into_iter().filter(|s| s.is_navigable()) {
            canonical.entry(section).or_insert_with(|| {
                if section == default {
                    "/".to_string()
                } else {
                    format!("/{}", section.key())
                }
            });
        }

        let mut lookup = HashMap::new();
        for (alias, section) in &config.path_aliases {
            lookup.insert(normalize_path(alias), *section);
        }
        for section in Section::ALL.into_iter().filter(|s| s.is_navigable()) {
            lookup.insert(format!("/{}", section.key()), section);
        }
        for (section, path) in &canonical {
            lookup.insert(path.clone(), *section);
        }
        lookup.insert("/".to_string(), default);

        debug!(paths = canonical.len(), aliases = lookup.len(), "path table built");
        Self {
            canonical,
            lookup,
            default,
        }
    }

    /// Canonical path of a section.
    pub fn path_of(&self, section: Section) -> &str {
        self.canonical
            .get(&section)
            .or_else(|| self.canonical.get(&self.default))
            .map_or("/", String::as_str)
    }

    /// Canonical URL of a route. Post routes ignore the filter.
    pub fn url_for(&self, route: &Route) -> String {
        match &route.post_id {
            Some(post) => format!("{}/{}", self.post_prefix(), post),
            None => self.path_of(route.filter).to_string(),
        }
    }

    /// Section registered for an exact (normalized) path.
    pub fn section_for(&self, path: &str) -> Option<Section> {
        self.lookup.get(&normalize_path(path)).copied()
    }

    /// Turn a location path into a route the page can show.
    ///
    /// A post path whose content block is missing lands on the blog list.
    /// Unknown paths, and paths for sections the page lacks, land on the
    /// default section.
    pub fn parse(&self, path: &str, page: &Page) -> Route {
        let path = normalize_path(path);

        let post_prefix = format!("{}/", self.post_prefix());
        if let Some(rest) = path.strip_prefix(&post_prefix)
            && let Some(post) = PostId::parse(rest)
        {
            if page.has_section(Section::Post) && page.post_block(&post).is_some() {
                return Route::post(post);
            }
            warn!(post = %post, "post content not found, showing blog list");
            if page.has_section(Section::Blog) {
                return Route::section(Section::Blog);
            }
        }

        match self.lookup.get(&path) {
            Some(&section) if page.has_section(section) => Route::section(section),
            Some(&section) => {
                warn!(path = %path, section = %section, "section not in page, using default");
                Route::section(self.default)
            }
            None => {
                debug!(path = %path, "unknown path, using default section");
                Route::section(self.default)
            }
        }
    }

    fn post_prefix(&self) -> &str {
        self.path_of(Section::Blog).trim_end_matches('/')
    }
}

/// Percent-decode a path and strip the query, fragment and trailing slash.
pub(crate) fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    let trimmed = decoded.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div class="gallery-page-container">
          <nav class="filter-nav">
            <button class="filter-btn" data-filter="home" data-url="/">Home</button>
            <button class="filter-btn" data-filter="wall" data-url="/wallpapers">Wall</button>
            <button class="filter-btn" data-filter="blog" data-url="/blog/">Blog</button>
          </nav>
          <div id="home-content"></div>
          <div id="gallery-grid"></div>
          <div id="distracted-content"></div>
          <div id="blog-content"></div>
          <div id="full-blog-post-view"></div>
          <div id="post-3-content"><h1>Three</h1></div>
        </div>"#;

    fn table() -> (PathTable, Page) {
        let config = Config::default();
        let page = Page::parse(PAGE, &config).unwrap();
        (PathTable::from_page(&page, &config), page)
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/blog/"), "/blog");
        assert_eq!(normalize_path("/blog?x=1#top"), "/blog");
        assert_eq!(normalize_path("/blog/post%2D3"), "/blog/post-3");
        assert_eq!(normalize_path("wall"), "/wall");
    }

    #[test]
    fn test_canonical_urls_follow_nav_buttons() {
        let (paths, _) = table();
        assert_eq!(paths.path_of(Section::Home), "/");
        assert_eq!(paths.path_of(Section::Wall), "/wallpapers");
        assert_eq!(paths.path_of(Section::Distracted), "/distracted");
        let post = Route::post(PostId::parse("post-3").unwrap());
        assert_eq!(paths.url_for(&post), "/blog/post-3");
    }

    #[test]
    fn test_lookup_accepts_keys_and_aliases() {
        let (paths, _) = table();
        assert_eq!(paths.section_for("/wallpapers"), Some(Section::Wall));
        assert_eq!(paths.section_for("/wall"), Some(Section::Wall));
        assert_eq!(paths.section_for("/dw"), Some(Section::Distracted));
        assert_eq!(paths.section_for("/ow/"), Some(Section::Organized));
        assert_eq!(paths.section_for("/nope"), None);
    }

    #[test]
    fn test_parse_post_paths() {
        let (paths, page) = table();
        let route = paths.parse("/blog/post-3", &page);
        assert_eq!(route.post_id.as_ref().map(PostId::as_str), Some("post-3"));

        let missing = paths.parse("/blog/post-99", &page);
        assert_eq!(missing, Route::section(Section::Blog));

        let garbage = paths.parse("/blog/post-x", &page);
        assert_eq!(garbage, Route::section(Section::Home));
    }

    #[test]
    fn test_parse_falls_back_to_default() {
        let (paths, page) = table();
        assert_eq!(paths.parse("/unknown", &page), Route::section(Section::Home));
        // Organized has a path but no root in this page.
        assert_eq!(paths.parse("/ow", &page), Route::section(Section::Home));
        assert_eq!(paths.parse("/dw", &page), Route::section(Section::Distracted));
    }
}
