//! Carried-forward context between sequential chunk requests.
//!
//! Summarizing a document chunk by chunk loses continuity: the model cannot
//! see that a topic it opens in chunk three already exists in chunk one. The
//! tracker closes that gap by accumulating every topic label seen so far and
//! rendering them into a hint that is prepended to the next request, steering
//! the model toward reusing existing labels instead of inventing near
//! duplicates.

use crate::summary::DocumentSummary;

/// Fixed lead-in for the continuation hint. Topic labels follow, joined by
/// single spaces.
pub const HINT_TEMPLATE: &str = "I have already summarized the following topics. \
If you find content that logically belongs to one of these topics, \
summarize it under the same topic label:";

/// Accumulates topic labels across the chunks of one document.
#[derive(Debug, Default)]
pub struct ContextTracker {
    topics: Vec<String>,
}

impl ContextTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every topic label from `summary` that has not been seen yet.
    ///
    /// Labels are compared by exact string equality and kept in first
    /// appearance order.
    pub fn record(&mut self, summary: &DocumentSummary) {
        for label in summary.topic_labels() {
            if !self.topics.iter().any(|known| known == label) {
                self.topics.push(label.to_string());
            }
        }
    }

    /// Render the continuation hint, or `None` when no topic has been
    /// recorded yet.
    pub fn hint(&self) -> Option<String> {
        if self.topics.is_empty() {
            return None;
        }
        Some(format!("{HINT_TEMPLATE} {}", self.topics.join(" ")))
    }

    /// Topic labels recorded so far, in first-appearance order.
    pub fn topics(&self) -> &[String] {
        &self.topics
    }
}
