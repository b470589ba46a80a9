//! The application loop.
//!
//! [`App`] owns the page, the runtime state and the host, and turns host
//! events into router, search and highlight calls. Events are queued and
//! handled one at a time; a handler that triggers a navigation enqueues it
//! rather than running it in the middle of its own work.

use std::collections::VecDeque;

use chrono::Datelike;
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::dom::NodeId;
use crate::error::Result;
use crate::filter::CardFilter;
use crate::goals::GoalList;
use crate::host::Host;
use crate::overlay::ImageOverlay;
use crate::page::{Page, Section};
use crate::route::{HistoryState, PostId, Route};
use crate::router::{BACK_BUTTON_CLASS, NavOrigin, Navigation, Router};
use crate::schedule::Task;
use crate::search::{
    self, AdviceTable, KeywordTable, NO_RESULTS_CLASS, RESULT_INDEX_ATTR, RESULT_ITEM_CLASS,
    SearchEngine, SearchOutcome,
};
use crate::state::AppState;

const EXPANDED_CLASS: &str = "expanded";
const READ_MORE_CLASS: &str = "read-more-btn";
const BLOG_LINK_CLASS: &str = "blog-card-link-wrapper";
const WALL_PLACEHOLDER: &str = "Search Wallpapers...";
const SITE_PLACEHOLDER: &str = "Search Site...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
}

/// Something that happened in the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A click on (or inside) the given node.
    Click(NodeId),
    /// The search input now holds this value.
    Input(String),
    /// A key pressed in the search input.
    Key(Key),
    /// Browser back/forward landed on `path`, with the entry's stored state.
    PopState {
        path: String,
        state: Option<HistoryState>,
    },
    /// Virtual time passed.
    Advance(u64),
    /// Show a route.
    Navigate {
        route: Route,
        origin: NavOrigin,
        record_history: bool,
    },
}

pub struct App<H: Host> {
    page: Page,
    state: AppState,
    router: Router,
    search: SearchEngine,
    cards: CardFilter,
    overlay: ImageOverlay,
    advice: AdviceTable,
    config: Config,
    host: H,
    queue: VecDeque<Event>,
}

impl<H: Host> App<H> {
    /// Start with the default keyword and advice tables.
    pub fn start(page: Page, config: Config, host: H) -> Result<Self> {
        Self::start_with(
            page,
            config,
            host,
            KeywordTable::default(),
            AdviceTable::default(),
        )
    }

    /// Recover a redirected path, resolve the initial route and show it
    /// without adding a history entry.
    pub fn start_with(
        page: Page,
        config: Config,
        mut host: H,
        keywords: KeywordTable,
        advice: AdviceTable,
    ) -> Result<Self> {
        config.validate()?;
        let path = Router::recover_initial_path(&mut host, &config.redirect_session_key);
        let router = Router::new(&page, &config, &path)?;
        let search = SearchEngine::with_targets(&config.search, search::default_targets(), keywords)?;

        let mut app = Self {
            page,
            state: AppState::new()?,
            router,
            search,
            cards: CardFilter::new()?,
            overlay: ImageOverlay::new()?,
            advice,
            config,
            host,
            queue: VecDeque::new(),
        };
        app.fill_copyright_year();
        let initial = app.router.initial_route().clone();
        app.navigate(initial, NavOrigin::Startup, false);
        Ok(app)
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn overlay(&self) -> &ImageOverlay {
        &self.overlay
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Route currently shown.
    pub fn current_route(&self) -> Option<&Route> {
        self.state.route.as_ref()
    }

    /// Section whose root is visible.
    pub fn current_section(&self) -> Option<Section> {
        self.state.section
    }

    /// Queue an event and run the queue until it is empty.
    pub fn dispatch(&mut self, event: Event) {
        self.queue.push_back(event);
        while let Some(event) = self.queue.pop_front() {
            trace!(?event, "dispatch");
            self.handle(event);
        }
    }

    /// Show a route now, then run the section's setup.
    pub fn navigate(&mut self, route: Route, origin: NavOrigin, record_history: bool) -> Navigation {
        let nav = self.router.navigate(
            &mut self.page,
            &mut self.state,
            &mut self.host,
            route,
            origin,
            record_history,
        );
        self.setup_section(&nav);
        nav
    }

    /// Add a goal, persist and re-render the list.
    pub fn add_goal(&mut self, text: &str) -> bool {
        let added = self.state.goals.add(text);
        if added {
            self.goals_changed();
        }
        added
    }

    pub fn toggle_goal(&mut self, index: usize) -> Option<bool> {
        let completed = self.state.goals.toggle(index)?;
        self.goals_changed();
        Some(completed)
    }

    pub fn remove_goal(&mut self, index: usize) -> bool {
        let removed = self.state.goals.remove(index).is_some();
        if removed {
            self.goals_changed();
        }
        removed
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Click(target) => self.on_click(target),
            Event::Input(value) => self.on_input(value),
            Event::Key(Key::Enter) => self.on_enter(),
            Event::Key(Key::Escape) => {
                if self.state.search.expanded {
                    self.toggle_search();
                }
            }
            Event::PopState { path, state } => {
                let route = self.router.route_for_pop(&self.page, &path, state.as_ref());
                self.navigate(route, NavOrigin::History, false);
            }
            Event::Advance(ms) => {
                for task in self.state.scheduler.advance(ms) {
                    self.run_task(task);
                }
            }
            Event::Navigate {
                route,
                origin,
                record_history,
            } => {
                self.navigate(route, origin, record_history);
            }
        }
    }

    fn on_click(&mut self, target: NodeId) {
        if self.overlay.contains(&self.page.dom, target) {
            self.overlay.close(&mut self.page.dom);
            self.document_click(false);
            return;
        }
        // Zooming an image consumes the click.
        if let Some(body) = self.page.body()
            && self.overlay.is_zoomable(&self.page.dom, self.page.container(), target)
        {
            self.overlay.open(&mut self.page.dom, body, target);
            return;
        }

        let anchors = *self.page.search();
        let dom = &self.page.dom;
        // Taken before any handler can detach the target.
        let inside_widget = anchors.widget.is_some_and(|w| dom.contains(w, target));

        if anchors.toggle.is_some_and(|t| dom.contains(t, target)) {
            self.toggle_search();
            return;
        }

        let in_results = anchors.results.is_some_and(|r| dom.contains(r, target));
        let item = dom.closest(target, |d, n| d.has_class(n, RESULT_ITEM_CLASS));
        let with_class = |class: &str| dom.closest(target, |d, n| d.has_class(n, class));

        if let Some(item) = item.filter(|_| in_results) {
            if !dom.has_class(item, NO_RESULTS_CLASS)
                && let Some(index) = dom
                    .get_attr(item, RESULT_INDEX_ATTR)
                    .and_then(|i| i.parse::<usize>().ok())
            {
                self.select_result(index);
            }
        } else if with_class(BACK_BUTTON_CLASS).is_some() {
            self.enqueue_navigation(Route::section(Section::Blog), NavOrigin::User);
        } else if let Some(button) = with_class(READ_MORE_CLASS) {
            match read_more_route(&self.page, button) {
                Some(route) => self.enqueue_navigation(route, NavOrigin::User),
                None => warn!("read-more control has no usable target"),
            }
        } else if let Some(link) = with_class(BLOG_LINK_CLASS) {
            match dom.get_attr(link, "data-post-id").and_then(PostId::parse) {
                Some(post) => self.enqueue_navigation(Route::post(post), NavOrigin::User),
                None => warn!("blog card link without a valid post id"),
            }
        } else if let Some(button) = self.page.nav_button_at(target) {
            let route = Route::section(button.section);
            self.enqueue_navigation(route, NavOrigin::User);
        }

        self.document_click(inside_widget);
    }

    /// Handling for every click that bubbles up to the document.
    fn document_click(&mut self, inside_widget: bool) {
        if !inside_widget && self.state.search.expanded {
            self.set_expanded(false);
            search::hide_results(&mut self.page);
        }
        self.state
            .highlighter
            .on_document_click(&mut self.page.dom, inside_widget);
    }

    fn fill_copyright_year(&mut self) {
        if let Some(node) = self.page.copyright_year() {
            let year = self.host.now().year().to_string();
            self.page.dom.set_text_content(node, &year);
        }
    }

    fn on_input(&mut self, value: String) {
        self.state.search.input = value.clone();
        let anchors = *self.page.search();
        if let Some(input) = anchors.input {
            self.page.dom.set_attr(input, "value", &value);
        }
        if let Some(token) = self.state.search.pending.take() {
            self.state.scheduler.cancel(token);
        }
        if !anchors.is_usable() {
            return;
        }

        if self.state.search.expanded {
            let token = self
                .state
                .scheduler
                .schedule(self.config.search.debounce_ms, Task::Search(value));
            self.state.search.pending = Some(token);
        } else if self.state.section == Some(Section::Wall) {
            self.cards
                .apply(&mut self.page, &mut self.state.highlighter, &value);
            search::hide_results(&mut self.page);
        } else {
            search::hide_results(&mut self.page);
        }
    }

    fn on_enter(&mut self) {
        if !self.state.search.expanded {
            return;
        }
        if self.state.search.results.is_empty() {
            search::hide_results(&mut self.page);
        } else {
            self.select_result(0);
        }
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::Search(term) => {
                self.state.search.pending = None;
                self.run_search(&term);
            }
            Task::Highlight(term) => {
                self.state.pending_highlight = None;
                let root = self.state.section.and_then(|s| self.page.section_root(s));
                if let Some(root) = root {
                    self.state
                        .highlighter
                        .highlight_section(&mut self.page.dom, root, &term);
                }
            }
        }
    }

    fn run_search(&mut self, term: &str) {
        let outcome = self.search.query(&self.page, term);
        match outcome {
            SearchOutcome::Redirect { route, keyword } => {
                debug!(keyword = %keyword, "search redirected");
                self.close_search_after_selection();
                self.enqueue_navigation(route, NavOrigin::Search);
            }
            outcome => {
                self.state.search.results = search::render_outcome(&mut self.page, &outcome);
            }
        }
    }

    fn select_result(&mut self, index: usize) {
        let Some(result) = self.state.search.results.get(index).cloned() else {
            return;
        };
        self.enqueue_navigation(result.route, NavOrigin::Search);
        self.close_search_after_selection();
    }

    /// Collapse the widget, empty the input and hide the dropdown, leaving
    /// highlights alone.
    fn close_search_after_selection(&mut self) {
        self.set_expanded(false);
        self.set_input("");
        if let Some(token) = self.state.search.pending.take() {
            self.state.scheduler.cancel(token);
        }
        search::hide_results(&mut self.page);
        self.state.search.results.clear();
    }

    fn toggle_search(&mut self) {
        if self.page.search().widget.is_none() {
            return;
        }
        let expanded = !self.state.search.expanded;
        self.set_expanded(expanded);
        if expanded {
            self.update_placeholder();
            return;
        }

        self.set_input("");
        if let Some(token) = self.state.search.pending.take() {
            self.state.scheduler.cancel(token);
        }
        search::hide_results(&mut self.page);
        self.state.search.results.clear();
        self.state.highlighter.clear(&mut self.page.dom);
        if self.state.section == Some(Section::Wall) {
            self.cards.apply(&mut self.page, &mut self.state.highlighter, "");
        }
    }

    fn set_expanded(&mut self, expanded: bool) {
        self.state.search.expanded = expanded;
        if let Some(widget) = self.page.search().widget {
            self.page.dom.toggle_class(widget, EXPANDED_CLASS, expanded);
        }
    }

    fn set_input(&mut self, value: &str) {
        self.state.search.input = value.to_string();
        if let Some(input) = self.page.search().input {
            self.page.dom.set_attr(input, "value", value);
        }
    }

    fn update_placeholder(&mut self) {
        let Some(input) = self.page.search().input else {
            return;
        };
        let placeholder = match self.state.route.as_ref().map(|r| r.filter) {
            Some(Section::Wall) => WALL_PLACEHOLDER,
            _ => SITE_PLACEHOLDER,
        };
        self.page.dom.set_attr(input, "placeholder", placeholder);
    }

    fn enqueue_navigation(&mut self, route: Route, origin: NavOrigin) {
        self.queue.push_back(Event::Navigate {
            route,
            origin,
            record_history: true,
        });
    }

    /// Per-section work after the section is shown.
    fn setup_section(&mut self, nav: &Navigation) {
        self.update_placeholder();
        match nav.section {
            Section::Wall => {
                let term = self.state.search.input.clone();
                self.cards
                    .apply(&mut self.page, &mut self.state.highlighter, &term);
            }
            Section::Goals => {
                self.state.goals = GoalList::load(&self.host, &self.config.goals_storage_key);
                if let Some(list) = self.page.goal_list() {
                    self.state.goals.render(&mut self.page.dom, list);
                }
                if let (Some(term), Some(advice_box)) =
                    (nav.route.highlight_term(), self.page.advice_box())
                {
                    let reply = self.advice.lookup(term).to_string();
                    self.page.dom.set_text_content(advice_box, &reply);
                }
            }
            _ => {}
        }
    }

    fn goals_changed(&mut self) {
        self.state
            .goals
            .save(&mut self.host, &self.config.goals_storage_key);
        if let Some(list) = self.page.goal_list() {
            self.state.goals.render(&mut self.page.dom, list);
        }
    }
}

/// Target of a read-more control: a section key or a post id.
fn read_more_route(page: &Page, button: NodeId) -> Option<Route> {
    let dom = &page.dom;
    if let Some(section) = dom
        .get_attr(button, "data-target-filter")
        .and_then(Section::from_key)
    {
        return Some(Route::section(section));
    }
    dom.get_attr(button, "data-post-id")
        .and_then(PostId::parse)
        .map(Route::post)
}
