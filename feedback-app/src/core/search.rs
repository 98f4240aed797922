//! Client-side search over a loaded collection
//!
//! The full collection stays in backend order; the visible view is a
//! case-insensitive substring filter over a fixed field set. A typed query is
//! applied only once the debounce window has passed without another keystroke.

use std::time::Duration;

use shared::models::{Employee, Feedback};
use shared::util::contains_ci;
use tokio::time::Instant;

/// Field set used to match one item against a lowercase query
pub type Matcher<T> = fn(&T, &str) -> bool;

/// name, email, role, employee_id
pub fn employee_matches(employee: &Employee, query: &str) -> bool {
    contains_ci(&employee.name, query)
        || contains_ci(&employee.email, query)
        || contains_ci(employee.role.as_str(), query)
        || contains_ci(&employee.employee_id, query)
}

/// Employee's own feedback list: manager_name, strengths, improvement, tags
pub fn feedback_matches(feedback: &Feedback, query: &str) -> bool {
    feedback
        .manager_name
        .as_deref()
        .is_some_and(|m| contains_ci(m, query))
        || contains_ci(&feedback.strengths, query)
        || contains_ci(&feedback.improvement, query)
        || feedback.tags.iter().any(|t| contains_ci(t, query))
}

/// Manager history: the employee list fields plus employee_id and sentiment
pub fn history_matches(feedback: &Feedback, query: &str) -> bool {
    feedback_matches(feedback, query)
        || contains_ci(&feedback.employee_id, query)
        || contains_ci(feedback.sentiment.as_str(), query)
}

#[derive(Debug, Clone)]
pub struct FilteredList<T> {
    items: Vec<T>,
    query: String,
    applied: String,
    matcher: Matcher<T>,
    debounce: Duration,
    deadline: Option<Instant>,
}

impl<T> FilteredList<T> {
    pub fn new(matcher: Matcher<T>, debounce: Duration) -> Self {
        Self {
            items: Vec::new(),
            query: String::new(),
            applied: String::new(),
            matcher,
            debounce,
            deadline: None,
        }
    }

    /// Replace the collection (after a fetch). The applied query is kept.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Full collection in backend order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Record a keystroke; restarts the debounce window
    pub fn type_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.deadline = Some(Instant::now() + self.debounce);
    }

    /// Query as typed
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Query currently filtering the view (lowercased)
    pub fn applied_query(&self) -> &str {
        &self.applied
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Apply the typed query if its debounce window has elapsed
    pub fn apply_due(&mut self) -> bool {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                self.flush();
                true
            }
            _ => false,
        }
    }

    /// Apply the typed query immediately
    pub fn flush(&mut self) {
        self.applied = self.query.trim().to_lowercase();
        self.deadline = None;
    }

    /// Wait out the debounce window, then apply
    pub async fn settle(&mut self) {
        if let Some(deadline) = self.deadline {
            tokio::time::sleep_until(deadline).await;
            self.flush();
        }
    }

    /// Items matching the applied query, in backend order
    pub fn visible(&self) -> Vec<&T> {
        if self.applied.is_empty() {
            return self.items.iter().collect();
        }
        self.items
            .iter()
            .filter(|item| (self.matcher)(item, &self.applied))
            .collect()
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<&T> {
        self.items.iter().find(|item| pred(item))
    }

    /// Apply `update` to every matching item. Returns how many changed.
    pub fn update_where(&mut self, pred: impl Fn(&T) -> bool, mut update: impl FnMut(&mut T)) -> usize {
        let mut count = 0;
        for item in self.items.iter_mut().filter(|item| pred(item)) {
            update(item);
            count += 1;
        }
        count
    }

    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !pred(item));
        before - self.items.len()
    }
}

impl<T: Clone> FilteredList<T> {
    pub fn snapshot(&self) -> Vec<T> {
        self.items.clone()
    }
}
