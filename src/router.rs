//! View routing and the display controller.
//!
//! [`Router::navigate`] is the only place that changes which section is
//! visible. It resolves a [`Route`] against the page, projects the result
//! onto the DOM, and keeps the host's history in step with it.

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::dom::{Attribute, NodeId, SelectorSet};
use crate::error::Result;
use crate::host::{Host, History, LayoutAnchor, ScrollBehavior, SessionStore};
use crate::page::{DisplayMode, Page, Section};
use crate::route::{HistoryState, PathTable, Route, normalize_path};
use crate::schedule::Task;
use crate::search;
use crate::state::AppState;

const ACTIVE_CLASS: &str = "active";
const HIDDEN_CLASS: &str = "hidden";
pub(crate) const BACK_BUTTON_CLASS: &str = "back-to-blog-btn";
const BLOG_GRID_SELECTOR: &str = ".blog-grid";

/// What asked for a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOrigin {
    Startup,
    /// Nav buttons, read-more links and other page controls.
    User,
    /// Browser back/forward.
    History,
    /// A search result or keyword redirect.
    Search,
}

/// A route after resolution against the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub route: Route,
    /// Section whose root gets shown. `Post` for post routes.
    pub section: Section,
}

/// Outcome of a navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub route: Route,
    pub section: Section,
    /// Canonical URL of the shown route.
    pub url: String,
    /// Whether a history entry was pushed.
    pub pushed: bool,
}

#[derive(Debug)]
pub struct Router {
    paths: PathTable,
    initial: Route,
    default: Section,
    settle_ms: u64,
    scroll_overlap: f64,
    back_button: SelectorSet,
    blog_grid: SelectorSet,
}

impl Router {
    /// Build the path table and resolve the initial route for `initial_path`.
    pub fn new(page: &Page, config: &Config, initial_path: &str) -> Result<Self> {
        let paths = PathTable::from_page(page, config);
        let initial = paths.parse(initial_path, page);
        info!(path = initial_path, route = ?initial, "initial route");
        Ok(Self {
            paths,
            initial,
            default: config.default_section,
            settle_ms: config.highlight_settle_ms,
            scroll_overlap: config.post_scroll_overlap,
            back_button: SelectorSet::parse(&format!(".{BACK_BUTTON_CLASS}"))?,
            blog_grid: SelectorSet::parse(BLOG_GRID_SELECTOR)?,
        })
    }

    /// Recover the path a static-host 404 page stashed before redirecting
    /// to the site root.
    ///
    /// The stored value is always consumed. When it differs from the current
    /// location, the current history entry is rewritten to it (no new entry)
    /// and it becomes the effective initial path.
    pub fn recover_initial_path<H: History + SessionStore>(host: &mut H, key: &str) -> String {
        let current = host.current_path();
        match host.take(key) {
            Some(stored) if !stored.is_empty() && normalize_path(&stored) != normalize_path(&current) => {
                info!(from = %current, to = %stored, "restoring redirected path");
                host.replace_state(None, &stored);
                stored
            }
            _ => current,
        }
    }

    pub fn initial_route(&self) -> &Route {
        &self.initial
    }

    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    /// Resolve a route against the page.
    ///
    /// A post route whose content is missing falls back to the blog list.
    /// Any other unusable route falls back to the initial route, then to
    /// the default section. The trigger term is carried through.
    pub fn resolve(&self, page: &Page, route: &Route) -> Resolved {
        if let Some(post) = &route.post_id {
            if page.has_section(Section::Post) && page.post_block(post).is_some() {
                return Resolved {
                    route: Route {
                        filter: Section::Blog,
                        post_id: Some(post.clone()),
                        trigger: route.trigger.clone(),
                    },
                    section: Section::Post,
                };
            }
            warn!(post = %post, "post content not found, showing blog list");
            if page.has_section(Section::Blog) {
                return Resolved {
                    route: Route {
                        filter: Section::Blog,
                        post_id: None,
                        trigger: route.trigger.clone(),
                    },
                    section: Section::Blog,
                };
            }
        } else if route.filter.is_navigable() && page.has_section(route.filter) {
            return Resolved {
                route: Route {
                    filter: route.filter,
                    post_id: None,
                    trigger: route.trigger.clone(),
                },
                section: route.filter,
            };
        } else {
            warn!(filter = %route.filter, "section unavailable, falling back");
        }
        self.fallback(page, route.trigger.clone())
    }

    fn fallback(&self, page: &Page, trigger: Option<String>) -> Resolved {
        let initial = &self.initial;
        let section = match &initial.post_id {
            Some(post) if page.has_section(Section::Post) && page.post_block(post).is_some() => {
                Some(Section::Post)
            }
            Some(_) => None,
            None if initial.filter.is_navigable() && page.has_section(initial.filter) => {
                Some(initial.filter)
            }
            None => None,
        };
        match section {
            Some(section) => Resolved {
                route: Route {
                    trigger,
                    ..initial.clone()
                },
                section,
            },
            None => Resolved {
                route: Route {
                    filter: self.default,
                    post_id: None,
                    trigger,
                },
                section: self.default,
            },
        }
    }

    /// The route a history traversal should show.
    ///
    /// A stored state is used as-is and goes through normal resolution; an
    /// unreadable one falls back to the initial route. Without a state the
    /// path is parsed.
    pub fn route_for_pop(&self, page: &Page, path: &str, state: Option<&HistoryState>) -> Route {
        match state {
            Some(state) => Route::from_state(state).unwrap_or_else(|| {
                warn!(filter = %state.filter, "unusable history state, using initial route");
                self.initial.clone()
            }),
            None => self.paths.parse(path, page),
        }
    }

    /// Show `route`.
    ///
    /// Runs, in order: nav button state, hide every section, rebuild the post
    /// view, show the target, history push, highlight scheduling, results
    /// reset, scroll.
    pub fn navigate<H: Host>(
        &self,
        page: &mut Page,
        state: &mut AppState,
        host: &mut H,
        route: Route,
        origin: NavOrigin,
        record_history: bool,
    ) -> Navigation {
        let Resolved { route, section } = self.resolve(page, &route);
        // `resolve` only yields bound sections, and binding fails without
        // the default section.
        let Some(root) = page.section_root(section) else {
            error!(%section, "resolved section has no root");
            return Navigation {
                url: self.paths.url_for(&route),
                route,
                section,
                pushed: false,
            };
        };
        debug!(?route, %section, ?origin, "navigating");

        let buttons: Vec<(NodeId, bool)> = page
            .nav_buttons()
            .iter()
            .map(|b| (b.node, b.section == route.filter))
            .collect();
        for (node, active) in buttons {
            page.dom.toggle_class(node, ACTIVE_CLASS, active);
        }

        let roots: Vec<NodeId> = page.sections().map(|(_, n)| n).collect();
        for node in roots {
            page.dom.add_class(node, HIDDEN_CLASS);
            page.dom.set_display(node, Some("none"));
        }

        if let Some(post_view) = page.section_root(Section::Post) {
            state.highlighter.forget_within(&page.dom, post_view);
            page.dom.clear_children(post_view);
            if let Some(block) = route.post_id.as_ref().and_then(|p| page.post_block(p))
                && section == Section::Post
            {
                self.fill_post_view(page, post_view, block);
            }
        }

        page.dom.remove_class(root, HIDDEN_CLASS);
        page.dom.set_display(root, Some(section.display_mode().css()));
        if section == Section::Blog
            && let Some(grid) = page.dom.select_first(root, &self.blog_grid)
        {
            page.dom.set_display(grid, Some(DisplayMode::Grid.css()));
        }

        let url = self.paths.url_for(&route);
        let pushed = record_history && normalize_path(&host.current_path()) != url;
        if pushed {
            host.push_state(&route.to_state(), &url);
        }

        if let Some(token) = state.pending_highlight.take() {
            state.scheduler.cancel(token);
        }
        match route.highlight_term() {
            Some(term) => {
                let token = state
                    .scheduler
                    .schedule(self.settle_ms, Task::Highlight(term.to_string()));
                state.pending_highlight = Some(token);
            }
            None => state.highlighter.clear(&mut page.dom),
        }

        if origin != NavOrigin::Search {
            search::hide_results(page);
            state.search.results.clear();
        }

        let top = if section == Section::Post {
            let header = page
                .header()
                .map_or(0.0, |_| host.offset_height(LayoutAnchor::Header));
            let nav = page
                .nav()
                .map_or(0.0, |_| host.offset_height(LayoutAnchor::Nav));
            (header + nav - self.scroll_overlap).max(0.0)
        } else {
            0.0
        };
        host.scroll_to(top, ScrollBehavior::Smooth);

        state.route = Some(route.clone());
        state.section = Some(section);
        Navigation {
            route,
            section,
            url,
            pushed,
        }
    }

    fn fill_post_view(&self, page: &mut Page, post_view: NodeId, block: NodeId) {
        let dom = &mut page.dom;
        let children: Vec<NodeId> = dom.children(block).collect();
        for child in children {
            let copy = dom.deep_clone(child);
            dom.append(post_view, copy);
        }

        let back = match dom.select_first(post_view, &self.back_button) {
            Some(back) => back,
            None => {
                let back = dom.create_html_element(
                    "button",
                    vec![Attribute::new("class", BACK_BUTTON_CLASS)],
                );
                dom.append_text(back, "Back to Blog");
                dom.prepend(post_view, back);
                back
            }
        };
        dom.set_attr(back, "data-target-filter", Section::Blog.key());
        dom.set_display(back, Some("inline-block"));
    }
}
