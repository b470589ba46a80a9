//! Which parts of the page site search reads.

use serde::{Deserialize, Serialize};

use crate::page::Section;

/// How matched elements of a scan target become results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    /// Plain text elements; headings supply their own text as the primary label.
    Text,
    /// Blog list entries; results open the post named by the card's link.
    BlogList,
    /// Wallpaper cards; matched on title, description and tags together.
    WallCard,
}

/// One section's contribution to the search index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTarget {
    pub section: Section,
    /// Group heading shown in the results dropdown.
    pub label: String,
    /// Selectors queried in order, each over the whole page container.
    pub selectors: Vec<String>,
    pub kind: ScanKind,
}

impl ScanTarget {
    pub fn new(section: Section, kind: ScanKind, selectors: &[&str]) -> Self {
        Self {
            section,
            label: section.label().to_string(),
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            kind,
        }
    }
}

/// Scan targets for the standard page layout, in result order.
pub fn default_targets() -> Vec<ScanTarget> {
    vec![
        ScanTarget::new(
            Section::Home,
            ScanKind::Text,
            &[
                "#home-content h1",
                "#home-content h2",
                "#home-content h3",
                "#home-content p:not(.post-meta)",
                ".preview-section h3",
                ".preview-section p",
            ],
        ),
        ScanTarget::new(
            Section::Distracted,
            ScanKind::Text,
            &[
                "#distracted-content h1",
                "#distracted-content h2",
                "#distracted-content p:not(.post-meta)",
            ],
        ),
        ScanTarget::new(
            Section::Organized,
            ScanKind::Text,
            &[
                "#organized-content h1",
                "#organized-content h2",
                "#organized-content p:not(.post-meta)",
            ],
        ),
        ScanTarget::new(
            Section::Goals,
            ScanKind::Text,
            &[
                "#goals-content h1",
                "#goals-content h2",
                "#goals-content p:not(.post-meta)",
            ],
        ),
        ScanTarget::new(
            Section::Blog,
            ScanKind::BlogList,
            &[
                "#blog-content h1",
                "#blog-content .blog-post-card h3",
                "#blog-content .blog-post-card p",
            ],
        ),
        ScanTarget::new(
            Section::Wall,
            ScanKind::WallCard,
            &[".gallery-grid .cartoon-card"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::SelectorSet;

    #[test]
    fn test_default_selectors_parse() {
        for target in default_targets() {
            for selector in &target.selectors {
                assert!(SelectorSet::parse(selector).is_ok(), "{selector}");
            }
        }
    }

    #[test]
    fn test_labels_come_from_sections() {
        let targets = default_targets();
        assert_eq!(targets[1].label, "Distracted World");
        assert_eq!(targets.last().unwrap().kind, ScanKind::WallCard);
    }
}
