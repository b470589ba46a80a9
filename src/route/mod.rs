//! Routes, post identifiers, and the history-entry wire format.

mod paths;

pub use paths::PathTable;
pub(crate) use paths::normalize_path;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::page::Section;

static POST_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^post-\d+$").unwrap());

/// Identifier of a blog post, always of the form `post-<digits>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    /// Validate a post identifier.
    pub fn parse(s: &str) -> Option<PostId> {
        POST_ID.is_match(s).then(|| PostId(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric suffix, e.g. `3` for `post-3`.
    pub fn number(&self) -> &str {
        self.0.trim_start_matches("post-")
    }

    /// Id of the hidden element holding this post's content.
    pub fn content_id(&self) -> String {
        format!("{}-content", self.0)
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PostId::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid post id '{s}'")))
    }
}

/// The logical location within the page.
///
/// A route with a post id always shows that post; `filter` is then the
/// section the post belongs to (the blog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub filter: Section,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
    /// Search term to highlight once the section is shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
}

impl Route {
    pub fn section(filter: Section) -> Self {
        Self {
            filter,
            post_id: None,
            trigger: None,
        }
    }

    pub fn post(post_id: PostId) -> Self {
        Self {
            filter: Section::Blog,
            post_id: Some(post_id),
            trigger: None,
        }
    }

    pub fn with_trigger(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.trigger = (!term.trim().is_empty()).then_some(term);
        self
    }

    /// The trigger term, if it holds anything besides whitespace.
    pub fn highlight_term(&self) -> Option<&str> {
        self.trigger.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Serialize into a history entry.
    pub fn to_state(&self) -> HistoryState {
        HistoryState {
            filter: self.filter.key().to_string(),
            post_id: self.post_id.as_ref().map(|p| p.as_str().to_string()),
            trigger: self.trigger.clone(),
        }
    }

    /// Rebuild a route from a history entry.
    ///
    /// Returns `None` when neither the filter nor the post id is usable.
    /// A valid post id with an unknown filter still yields a post route.
    pub fn from_state(state: &HistoryState) -> Option<Route> {
        let post_id = state.post_id.as_deref().and_then(PostId::parse);
        let filter = Section::from_key(&state.filter);
        let filter = match (filter, &post_id) {
            (Some(f), _) => f,
            (None, Some(_)) => Section::Blog,
            (None, None) => return None,
        };
        Some(Route {
            filter,
            post_id,
            trigger: state.trigger.clone(),
        })
    }
}

/// The state object stored with each browser history entry.
///
/// Kept stringly typed: entries survive reloads and may have been written
/// by an older page with different section keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub filter: String,
    #[serde(rename = "postId", default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub trigger: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_id_validation() {
        assert!(PostId::parse("post-3").is_some());
        assert!(PostId::parse("post-042").is_some());
        assert!(PostId::parse("post-").is_none());
        assert!(PostId::parse("post-3a").is_none());
        assert!(PostId::parse("Post-3").is_none());
        assert!(PostId::parse("post-3/extra").is_none());
        assert_eq!(PostId::parse("post-12").unwrap().number(), "12");
        assert_eq!(PostId::parse("post-12").unwrap().content_id(), "post-12-content");
    }

    #[test]
    fn test_state_wire_format() {
        let route = Route::post(PostId::parse("post-3").unwrap()).with_trigger("cat");
        let json = serde_json::to_string(&route.to_state()).unwrap();
        assert_eq!(json, r#"{"filter":"blog","postId":"post-3","trigger":"cat"}"#);

        let state: HistoryState =
            serde_json::from_str(r#"{"filter":"wall","postId":null,"trigger":null}"#).unwrap();
        assert_eq!(Route::from_state(&state), Some(Route::section(Section::Wall)));
    }

    #[test]
    fn test_from_state_unknown_filter() {
        let state = HistoryState {
            filter: "shop".into(),
            post_id: None,
            trigger: None,
        };
        assert_eq!(Route::from_state(&state), None);

        let state = HistoryState {
            filter: "shop".into(),
            post_id: Some("post-2".into()),
            trigger: None,
        };
        let route = Route::from_state(&state).unwrap();
        assert_eq!(route.filter, Section::Blog);
        assert_eq!(route.post_id.unwrap().as_str(), "post-2");
    }

    #[test]
    fn test_blank_trigger_is_dropped() {
        let route = Route::section(Section::Home).with_trigger("   ");
        assert_eq!(route.trigger, None);
        assert_eq!(route.highlight_term(), None);
    }

    #[test]
    fn test_post_id_deserialize_rejects_garbage() {
        assert!(serde_json::from_str::<PostId>(r#""post-7""#).is_ok());
        assert!(serde_json::from_str::<PostId>(r#""../etc""#).is_err());
    }
}
