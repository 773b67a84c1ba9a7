//! Deduplicated recipient collection for a compose session.
//!
//! Insertion order is kept for display; membership is an exact,
//! case-sensitive string match. Every mutation publishes
//! [`Event::RecipientsChanged`] so a renderer can redraw the count and the
//! chip list.

use std::collections::HashSet;

use tokio::sync::broadcast;
use tracing::debug;

use crate::types::Event;

/// Ordered set of recipient addresses
#[derive(Debug)]
pub struct RecipientSet {
    /// Recipients in insertion order
    entries: Vec<String>,
    /// Membership index over `entries`
    index: HashSet<String>,
    /// Where change notifications go (None = silent, e.g. in unit tests)
    event_tx: Option<broadcast::Sender<Event>>,
}

impl RecipientSet {
    /// Create an empty set that publishes changes on `event_tx`
    pub fn new(event_tx: broadcast::Sender<Event>) -> Self {
        Self {
            entries: Vec::new(),
            index: HashSet::new(),
            event_tx: Some(event_tx),
        }
    }

    /// Create an empty set without a renderer attached
    pub fn detached() -> Self {
        Self {
            entries: Vec::new(),
            index: HashSet::new(),
            event_tx: None,
        }
    }

    /// Append every candidate not already present, in input order
    ///
    /// Duplicates are checked against the whole collection and against
    /// earlier candidates of the same batch. Returns the net-new count.
    pub fn add<I, S>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut added = 0;
        for candidate in candidates {
            let candidate = candidate.into();
            if self.index.insert(candidate.clone()) {
                self.entries.push(candidate);
                added += 1;
            }
        }
        debug!(added, total = self.entries.len(), "recipients added");
        self.notify();
        added
    }

    /// Remove one recipient; returns whether it was present
    pub fn remove(&mut self, email: &str) -> bool {
        let removed = self.index.remove(email);
        if removed {
            self.entries.retain(|e| e != email);
        }
        self.notify();
        removed
    }

    /// Remove every recipient
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.notify();
    }

    /// Recipients in insertion order
    pub fn all(&self) -> &[String] {
        &self.entries
    }

    /// Number of recipients
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `email` is in the set
    pub fn contains(&self, email: &str) -> bool {
        self.index.contains(email)
    }

    fn notify(&self) {
        if let Some(tx) = &self.event_tx {
            // No subscribers is fine
            tx.send(Event::RecipientsChanged {
                count: self.entries.len(),
                recipients: self.entries.clone(),
            })
            .ok();
        }
    }
}

impl Default for RecipientSet {
    fn default() -> Self {
        Self::detached()
    }
}
