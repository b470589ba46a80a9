//! Live filtering of the wallpaper wall.

use tracing::trace;

use crate::dom::{NodeId, SelectorSet};
use crate::error::Result;
use crate::highlight::Highlighter;
use crate::page::{Page, Section};

const CARD_SELECTOR: &str = ".cartoon-card";
const TITLE_SELECTOR: &str = ".card-details h3";
const DESC_SELECTOR: &str = ".card-details p";

/// How many cards a filter pass left visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterOutcome {
    pub shown: usize,
    pub hidden: usize,
}

#[derive(Debug)]
pub struct CardFilter {
    card: SelectorSet,
    title: SelectorSet,
    desc: SelectorSet,
}

impl CardFilter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            card: SelectorSet::parse(CARD_SELECTOR)?,
            title: SelectorSet::parse(TITLE_SELECTOR)?,
            desc: SelectorSet::parse(DESC_SELECTOR)?,
        })
    }

    /// Show the cards whose tags, title or description contain `term` and
    /// highlight the match in each shown card. An empty term shows all cards.
    pub fn apply(&self, page: &mut Page, highlighter: &mut Highlighter, term: &str) -> FilterOutcome {
        let Some(wall) = page.section_root(Section::Wall) else {
            return FilterOutcome::default();
        };
        let term = term.trim().to_lowercase();
        let dom = &mut page.dom;
        highlighter.clear(dom);

        let mut outcome = FilterOutcome::default();
        let mut highlighted = false;
        for card in dom.select_all(wall, &self.card) {
            let title = dom.select_first(card, &self.title);
            let desc = dom.select_first(card, &self.desc);
            let text = |n: Option<NodeId>| n.map(|n| dom.text_content(n)).unwrap_or_default();
            let haystack = format!(
                "{} {} {}",
                dom.get_attr(card, "data-tags").unwrap_or_default(),
                text(title),
                text(desc)
            )
            .to_lowercase();

            let show = term.is_empty() || haystack.contains(&term);
            dom.set_display(card, Some(if show { "flex" } else { "none" }));
            if !show {
                outcome.hidden += 1;
                continue;
            }
            outcome.shown += 1;
            if !term.is_empty() {
                for el in [title, desc].into_iter().flatten() {
                    highlighted |= highlighter.apply(dom, el, &term);
                }
            }
        }

        if highlighted {
            highlighter.arm_click_away();
        }
        trace!(term = %term, shown = outcome.shown, hidden = outcome.hidden, "cards filtered");
        outcome
    }
}
