//! Keyword redirects and canned advice.
//!
//! Queries naming a distraction (a social network, a streaming site) skip
//! the normal results and open the goals section instead. The goals section
//! answers messages with a canned line chosen by keyword.

use serde::{Deserialize, Serialize};

/// Queries that redirect to the goals section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordTable {
    keywords: Vec<String>,
}

impl KeywordTable {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// The first keyword the query equals or contains, ignoring case and
    /// surrounding whitespace.
    pub fn match_query(&self, query: &str) -> Option<&str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.keywords
            .iter()
            .find(|k| query == **k || query.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new([
            "instagram",
            "facebook",
            "tiktok",
            "twitter",
            "snapchat",
            "youtube",
            "reddit",
            "netflix",
            "pinterest",
            "twitch",
            "linkedin",
            "whatsapp",
        ])
    }
}

/// A keyword and the reply it triggers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub keyword: String,
    pub reply: String,
}

/// Canned replies keyed by keyword, with a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceTable {
    entries: Vec<Advice>,
    fallback: String,
}

impl AdviceTable {
    pub fn new(entries: Vec<Advice>, fallback: impl Into<String>) -> Self {
        Self {
            entries,
            fallback: fallback.into(),
        }
    }

    /// Reply for a message: the first entry whose keyword the message
    /// contains (case-insensitively), else the fallback.
    pub fn lookup(&self, message: &str) -> &str {
        let message = message.to_lowercase();
        self.entries
            .iter()
            .find(|a| message.contains(&a.keyword.to_lowercase()))
            .map_or(self.fallback.as_str(), |a| a.reply.as_str())
    }
}

impl Default for AdviceTable {
    fn default() -> Self {
        let entries = [
            ("focus", "Close every tab you don't need. Then close one more."),
            ("tired", "Rest is part of the work. Take ten minutes away from the screen."),
            ("procrastinat", "Pick the smallest next step and do only that."),
            ("goal", "Write it down, make it specific, and check it off when it's done."),
            ("phone", "Put the phone in another room for the next hour."),
        ]
        .into_iter()
        .map(|(keyword, reply)| Advice {
            keyword: keyword.to_string(),
            reply: reply.to_string(),
        })
        .collect();
        Self::new(entries, "Stay organized. One thing at a time.")
    }
}
