//! The persisted goal list shown in the goals section.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dom::{Attribute, Dom, NodeId};
use crate::host::LocalStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Ordered goals, stored as a JSON array under one local-storage key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalList {
    goals: Vec<Goal>,
}

impl GoalList {
    /// Load the list. Missing, malformed or unreadable storage yields an
    /// empty list.
    pub fn load(store: &impl LocalStore, key: &str) -> Self {
        let raw = match store.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::default(),
            Err(err) => {
                warn!(key, error = %err, "could not read goals, starting empty");
                return Self::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(goals) => Self { goals },
            Err(err) => {
                warn!(key, error = %err, "stored goals are malformed, starting empty");
                Self::default()
            }
        }
    }

    /// Persist the list. Failures are logged and otherwise ignored.
    pub fn save(&self, store: &mut impl LocalStore, key: &str) {
        let json = match serde_json::to_string(&self.goals) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "could not serialize goals");
                return;
            }
        };
        if let Err(err) = store.set_item(key, &json) {
            warn!(key, error = %err, "could not save goals");
        }
    }

    /// Append a goal. Blank text is ignored.
    pub fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.goals.push(Goal {
            text: text.to_string(),
            completed: false,
        });
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Goal> {
        (index < self.goals.len()).then(|| self.goals.remove(index))
    }

    /// Flip a goal's completion. Returns the new state.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let goal = self.goals.get_mut(index)?;
        goal.completed = !goal.completed;
        Some(goal.completed)
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Replace the children of `list` with one `li.goal-item` per goal.
    pub fn render(&self, dom: &mut Dom, list: NodeId) {
        dom.clear_children(list);
        for (i, goal) in self.goals.iter().enumerate() {
            let class = if goal.completed {
                "goal-item completed"
            } else {
                "goal-item"
            };
            let li = dom.create_html_element(
                "li",
                vec![
                    Attribute::new("class", class),
                    Attribute::new("data-index", i.to_string()),
                ],
            );
            dom.append_text(li, &goal.text);
            dom.append(list, li);
        }
    }
}
