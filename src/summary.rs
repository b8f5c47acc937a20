//! Canonical summary data model shared by every provider.
//!
//! Both providers are instructed to answer with the same JSON object,
//! `{"summary": [{"topic": ..., "points": [...]}]}`, and the pipeline merges
//! those per-chunk objects into a single document-level summary. The types
//! here are that wire shape, derived directly with serde.

use serde::{Deserialize, Serialize};

/// A single topic with its bullet points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSummary {
    /// Topic label chosen by the model. Labels are compared by exact string
    /// equality when merging and when building continuation hints.
    pub topic: String,
    /// Bullet points collected under the topic, in the order they were
    /// produced. Duplicates are removed during merging, never here.
    pub points: Vec<String>,
}

/// A complete summary of one document (or one chunk of it).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Topics in first-appearance order.
    pub summary: Vec<TopicSummary>,
}

impl DocumentSummary {
    /// Whether the summary carries no topics at all.
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }

    /// Iterate over the topic labels in order.
    pub fn topic_labels(&self) -> impl Iterator<Item = &str> {
        self.summary.iter().map(|topic| topic.topic.as_str())
    }
}
