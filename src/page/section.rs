//! The closed set of top-level views.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the mutually exclusive top-level views of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Home,
    Wall,
    Distracted,
    Organized,
    Blog,
    /// Single post view. Only reachable through a post route.
    Post,
    Goals,
}

/// How a section root is laid out when shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Block,
    Grid,
}

impl DisplayMode {
    pub fn css(self) -> &'static str {
        match self {
            DisplayMode::Block => "block",
            DisplayMode::Grid => "grid",
        }
    }
}

impl Section {
    /// All sections in template order.
    pub const ALL: [Section; 7] = [
        Section::Home,
        Section::Wall,
        Section::Distracted,
        Section::Organized,
        Section::Blog,
        Section::Post,
        Section::Goals,
    ];

    /// Key used in `data-filter` attributes, history state and URLs.
    pub fn key(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Wall => "wall",
            Section::Distracted => "distracted",
            Section::Organized => "organized",
            Section::Blog => "blog",
            Section::Post => "post",
            Section::Goals => "goals",
        }
    }

    pub fn from_key(key: &str) -> Option<Section> {
        Section::ALL.into_iter().find(|s| s.key() == key)
    }

    /// Selector of the section's root element in the page template.
    pub fn root_selector(self) -> &'static str {
        match self {
            Section::Home => "#home-content",
            Section::Wall => "#gallery-grid",
            Section::Distracted => "#distracted-content",
            Section::Organized => "#organized-content",
            Section::Blog => "#blog-content",
            Section::Post => "#full-blog-post-view",
            Section::Goals => "#goals-content",
        }
    }

    /// Human-readable label used for search result groups.
    pub fn label(self) -> &'static str {
        match self {
            Section::Home => "Home",
            Section::Wall => "Wallpapers",
            Section::Distracted => "Distracted World",
            Section::Organized => "Organized World",
            Section::Blog => "Blog List",
            Section::Post => "Blog Post",
            Section::Goals => "Goals",
        }
    }

    pub fn display_mode(self) -> DisplayMode {
        match self {
            Section::Wall => DisplayMode::Grid,
            _ => DisplayMode::Block,
        }
    }

    /// Whether a bare filter (no post id) can show this section.
    pub fn is_navigable(self) -> bool {
        self != Section::Post
    }

    /// Whether losing this section's root still leaves a usable page.
    pub fn is_optional(self) -> bool {
        self == Section::Post
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_key(section.key()), Some(section));
        }
        assert_eq!(Section::from_key("shop"), None);
        assert_eq!(Section::from_key("Home"), None);
    }

    #[test]
    fn test_display_modes() {
        assert_eq!(Section::Wall.display_mode(), DisplayMode::Grid);
        assert_eq!(Section::Blog.display_mode(), DisplayMode::Block);
        assert_eq!(DisplayMode::Grid.css(), "grid");
    }

    #[test]
    fn test_serde_uses_keys() {
        assert_eq!(serde_json::to_string(&Section::Distracted).unwrap(), "\"distracted\"");
        let parsed: Section = serde_json::from_str("\"goals\"").unwrap();
        assert_eq!(parsed, Section::Goals);
    }
}
