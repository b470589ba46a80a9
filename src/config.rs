//! Runtime configuration.
//!
//! Every tunable constant of the page runtime lives here so a deployment can
//! override it from a JSON file without touching code. Missing keys take the
//! defaults below.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::page::Section;

/// Page runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Selector of the element wrapping the whole gallery page.
    pub container_selector: String,
    /// Section shown for `/`, unknown paths, and unrecoverable routes.
    pub default_section: Section,
    pub search: SearchConfig,
    /// Delay between showing a section and walking its text for highlights.
    pub highlight_settle_ms: u64,
    /// Session-storage key written by the static host's 404 page.
    pub redirect_session_key: String,
    /// Local-storage key of the persisted goal list.
    pub goals_storage_key: String,
    /// Extra single-segment paths accepted for a section, e.g. `/dw`.
    pub path_aliases: BTreeMap<String, Section>,
    /// Pixels subtracted from header + nav height when scrolling to a post.
    pub post_scroll_overlap: f64,
}

/// Site search tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub min_query_len: usize,
    pub max_results_per_group: usize,
    /// Characters of context kept before the first match.
    pub snippet_before: usize,
    /// Characters kept after the match start, in addition to the query length.
    pub snippet_after: usize,
    /// Leading snippet characters compared when de-duplicating results.
    pub dedup_prefix: usize,
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let mut path_aliases = BTreeMap::new();
        path_aliases.insert("/dw".to_string(), Section::Distracted);
        path_aliases.insert("/ow".to_string(), Section::Organized);

        Self {
            container_selector: ".gallery-page-container".to_string(),
            default_section: Section::Home,
            search: SearchConfig::default(),
            highlight_settle_ms: 100,
            redirect_session_key: "ghPagesPath".to_string(),
            goals_storage_key: "goals".to_string(),
            path_aliases,
            post_scroll_overlap: 20.0,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            max_results_per_group: 5,
            snippet_before: 30,
            snippet_after: 50,
            dedup_prefix: 40,
            debounce_ms: 300,
        }
    }
}

impl Config {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Reject values the runtime cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.default_section.is_navigable() {
            return Err(Error::InvalidConfig(format!(
                "default_section '{}' cannot be shown without a post",
                self.default_section.key()
            )));
        }
        if self.search.min_query_len == 0 {
            return Err(Error::InvalidConfig(
                "search.min_query_len must be at least 1".to_string(),
            ));
        }
        if self.search.max_results_per_group == 0 {
            return Err(Error::InvalidConfig(
                "search.max_results_per_group must be at least 1".to_string(),
            ));
        }
        if let Some((alias, _)) = self
            .path_aliases
            .iter()
            .find(|(alias, _)| !alias.starts_with('/') || alias.len() < 2)
        {
            return Err(Error::InvalidConfig(format!(
                "path alias '{alias}' must be an absolute, non-root path"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.search.max_results_per_group, 5);
        assert_eq!(config.highlight_settle_ms, 100);
        assert_eq!(config.path_aliases.get("/dw"), Some(&Section::Distracted));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            Config::from_json(r#"{ "default_section": "blog", "search": { "debounce_ms": 50 } }"#)
                .unwrap();
        assert_eq!(config.default_section, Section::Blog);
        assert_eq!(config.search.debounce_ms, 50);
        assert_eq!(config.search.snippet_before, 30);
        assert_eq!(config.redirect_session_key, "ghPagesPath");
    }

    #[test]
    fn test_rejects_post_as_default() {
        let err = Config::from_json(r#"{ "default_section": "post" }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_bad_alias() {
        let err = Config::from_json(r#"{ "path_aliases": { "dw": "distracted" } }"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "highlight_settle_ms": 250 }}"#).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.highlight_settle_ms, 250);
    }

    #[test]
    fn test_unknown_section_is_json_error() {
        let err = Config::from_json(r#"{ "default_section": "shop" }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
