//! Mutable runtime state, owned by [`App`](crate::App).

use crate::error::Result;
use crate::goals::GoalList;
use crate::highlight::Highlighter;
use crate::page::Section;
use crate::route::Route;
use crate::schedule::{Scheduler, TaskToken};
use crate::search::SearchResult;

/// Search widget state.
#[derive(Debug, Default)]
pub struct SearchState {
    pub expanded: bool,
    pub input: String,
    /// Rendered hits, indexed by `data-result-index`.
    pub results: Vec<SearchResult>,
    /// Debounced search waiting to run.
    pub pending: Option<TaskToken>,
}

#[derive(Debug)]
pub struct AppState {
    /// Route currently shown, after resolution.
    pub route: Option<Route>,
    /// Section whose root is currently visible.
    pub section: Option<Section>,
    pub highlighter: Highlighter,
    pub scheduler: Scheduler,
    pub search: SearchState,
    /// Highlight waiting for the shown section to settle.
    pub pending_highlight: Option<TaskToken>,
    pub goals: GoalList,
}

impl AppState {
    pub fn new() -> Result<Self> {
        Ok(Self {
            route: None,
            section: None,
            highlighter: Highlighter::new()?,
            scheduler: Scheduler::new(),
            search: SearchState::default(),
            pending_highlight: None,
            goals: GoalList::default(),
        })
    }
}
