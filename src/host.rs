//! Environment capabilities the runtime needs from its host.
//!
//! In a browser these map onto `history`, `sessionStorage`, `localStorage`
//! and the window's scroll/layout APIs. [`MemoryHost`] provides an
//! in-process implementation for tests and the CLI.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::route::HistoryState;

/// Session history.
pub trait History {
    /// Path of the current location, e.g. `/blog/post-3`.
    fn current_path(&self) -> String;
    /// Add a new entry and make it current.
    fn push_state(&mut self, state: &HistoryState, url: &str);
    /// Rewrite the current entry without adding one.
    fn replace_state(&mut self, state: Option<&HistoryState>, url: &str);
}

/// Tab-scoped storage that the static host's 404 page writes into.
pub trait SessionStore {
    /// Read and remove a value.
    fn take(&mut self, key: &str) -> Option<String>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage quota exceeded")]
    QuotaExceeded,
}

/// Persistent key/value storage.
pub trait LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Page regions whose rendered height affects scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutAnchor {
    Header,
    Nav,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Layout queries and scrolling.
pub trait Viewport {
    fn offset_height(&self, anchor: LayoutAnchor) -> f64;
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
}

/// Wall-clock time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Everything the runtime needs, in one bound.
pub trait Host: History + SessionStore + LocalStore + Viewport + Clock {}

impl<T: History + SessionStore + LocalStore + Viewport + Clock> Host for T {}

/// One entry of [`MemoryHost`]'s history stack.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub path: String,
    pub state: Option<HistoryState>,
}

/// A scroll request recorded by [`MemoryHost`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRecord {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// In-memory host with a browser-like history stack.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    entries: Vec<HistoryEntry>,
    index: usize,
    session: HashMap<String, String>,
    local: HashMap<String, String>,
    local_error: Option<StorageError>,
    heights: HashMap<LayoutAnchor, f64>,
    scrolls: Vec<ScrollRecord>,
    /// Frozen time; `None` reads the system clock.
    now: Option<DateTime<Utc>>,
}

impl MemoryHost {
    /// A host whose location starts at `path`.
    pub fn at(path: &str) -> Self {
        Self {
            entries: vec![HistoryEntry {
                path: path.to_string(),
                state: None,
            }],
            index: 0,
            session: HashMap::new(),
            local: HashMap::new(),
            local_error: None,
            heights: HashMap::new(),
            scrolls: Vec::new(),
            now: None,
        }
    }

    pub fn with_session(mut self, key: &str, value: &str) -> Self {
        self.session.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_local(mut self, key: &str, value: &str) -> Self {
        self.local.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_height(mut self, anchor: LayoutAnchor, height: f64) -> Self {
        self.heights.insert(anchor, height);
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Make every local storage access fail with `error`.
    pub fn with_local_error(mut self, error: StorageError) -> Self {
        self.local_error = Some(error);
        self
    }

    /// Step back one entry, like the browser back button.
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        self.index = self.index.checked_sub(1)?;
        self.entries.get(self.index)
    }

    /// Step forward one entry.
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.index)
    }

    pub fn scrolls(&self) -> &[ScrollRecord] {
        &self.scrolls
    }

    pub fn session_value(&self, key: &str) -> Option<&str> {
        self.session.get(key).map(String::as_str)
    }

    pub fn local_value(&self, key: &str) -> Option<&str> {
        self.local.get(key).map(String::as_str)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::at("/")
    }
}

impl History for MemoryHost {
    fn current_path(&self) -> String {
        self.current().map(|e| e.path.clone()).unwrap_or_default()
    }

    fn push_state(&mut self, state: &HistoryState, url: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            path: url.to_string(),
            state: Some(state.clone()),
        });
        self.index = self.entries.len() - 1;
    }

    fn replace_state(&mut self, state: Option<&HistoryState>, url: &str) {
        let entry = HistoryEntry {
            path: url.to_string(),
            state: state.cloned(),
        };
        match self.entries.get_mut(self.index) {
            Some(current) => *current = entry,
            None => self.entries.push(entry),
        }
    }
}

impl SessionStore for MemoryHost {
    fn take(&mut self, key: &str) -> Option<String> {
        self.session.remove(key)
    }
}

impl LocalStore for MemoryHost {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if let Some(err) = &self.local_error {
            return Err(err.clone());
        }
        Ok(self.local.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(err) = &self.local_error {
            return Err(err.clone());
        }
        self.local.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl Viewport for MemoryHost {
    fn offset_height(&self, anchor: LayoutAnchor) -> f64 {
        self.heights.get(&anchor).copied().unwrap_or(0.0)
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scrolls.push(ScrollRecord { top, behavior });
    }
}

impl Clock for MemoryHost {
    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn state(filter: &str) -> HistoryState {
        HistoryState {
            filter: filter.to_string(),
            post_id: None,
            trigger: None,
        }
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let mut host = MemoryHost::at("/");
        host.push_state(&state("wall"), "/wall");
        host.push_state(&state("blog"), "/blog");
        assert_eq!(host.back().map(|e| e.path.as_str()), Some("/wall"));
        host.push_state(&state("goals"), "/goals");
        assert_eq!(host.entries().len(), 3);
        assert!(host.forward().is_none());
        assert_eq!(host.current_path(), "/goals");
    }

    #[test]
    fn test_back_stops_at_first_entry() {
        let mut host = MemoryHost::at("/start");
        assert!(host.back().is_none());
        assert_eq!(host.current_path(), "/start");
    }

    #[test]
    fn test_replace_state_keeps_length() {
        let mut host = MemoryHost::at("/404");
        host.replace_state(None, "/blog/post-3");
        assert_eq!(host.entries().len(), 1);
        assert_eq!(host.current_path(), "/blog/post-3");
    }

    #[test]
    fn test_session_take_consumes() {
        let mut host = MemoryHost::at("/").with_session("k", "v");
        assert_eq!(host.take("k").as_deref(), Some("v"));
        assert_eq!(host.take("k"), None);
    }

    #[test]
    fn test_frozen_clock() {
        let at = Utc.with_ymd_and_hms(2031, 5, 4, 12, 0, 0).unwrap();
        assert_eq!(MemoryHost::at("/").with_now(at).now(), at);
    }

    #[test]
    fn test_local_error_injection() {
        let mut host = MemoryHost::at("/").with_local_error(StorageError::QuotaExceeded);
        assert_eq!(host.set_item("a", "b"), Err(StorageError::QuotaExceeded));
        assert_eq!(host.get_item("a"), Err(StorageError::QuotaExceeded));
    }
}
