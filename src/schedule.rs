//! Deferred work on a virtual clock.
//!
//! Debounced searches and settle-delayed highlights are queued here with a
//! due time. The host advances the clock; due tasks come back in due order
//! and are run on the same single-threaded loop as every other event.

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskToken(u64);

/// Work that runs after a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Run a site search for the given query.
    Search(String),
    /// Highlight the given term in the active section.
    Highlight(String),
}

#[derive(Debug)]
struct Pending {
    due: u64,
    token: TaskToken,
    task: Task,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: u64,
    next_token: u64,
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn schedule(&mut self, delay_ms: u64, task: Task) -> TaskToken {
        let token = TaskToken(self.next_token);
        self.next_token += 1;
        self.pending.push(Pending {
            due: self.now.saturating_add(delay_ms),
            token,
            task,
        });
        token
    }

    /// Cancel a task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, token: TaskToken) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.token != token);
        self.pending.len() != before
    }

    pub fn is_pending(&self, token: TaskToken) -> bool {
        self.pending.iter().any(|p| p.token == token)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock forward and return every task now due.
    ///
    /// Tasks are ordered by due time, then by scheduling order.
    pub fn advance(&mut self, ms: u64) -> Vec<Task> {
        self.now = self.now.saturating_add(ms);
        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.due, p.token.0));
        due.into_iter().map(|p| p.task).collect()
    }
}
