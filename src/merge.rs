//! Merging per-chunk summaries into one document summary.
//!
//! Each chunk request yields its own `DocumentSummary`; the pipeline folds
//! them into a single result. Topics are unified by exact label match, topic
//! order follows first appearance across the whole sequence, and points under
//! a topic are deduplicated while keeping the order in which they first
//! showed up. The merge is pure and deterministic for a given input order.

use std::collections::{HashMap, HashSet};

use crate::summary::{DocumentSummary, TopicSummary};

/// Fold an ordered sequence of summaries into one.
///
/// Merging a single summary returns an equivalent summary with duplicate
/// points removed; merging the result again changes nothing.
pub fn merge_summaries<I>(summaries: I) -> DocumentSummary
where
    I: IntoIterator<Item = DocumentSummary>,
{
    let mut topics: Vec<TopicSummary> = Vec::new();
    let mut slot_by_label: HashMap<String, usize> = HashMap::new();
    let mut seen_points: Vec<HashSet<String>> = Vec::new();

    for summary in summaries {
        for topic in summary.summary {
            let slot = match slot_by_label.get(&topic.topic) {
                Some(&slot) => slot,
                None => {
                    let slot = topics.len();
                    slot_by_label.insert(topic.topic.clone(), slot);
                    topics.push(TopicSummary {
                        topic: topic.topic,
                        points: Vec::new(),
                    });
                    seen_points.push(HashSet::new());
                    slot
                }
            };
            for point in topic.points {
                if seen_points[slot].insert(point.clone()) {
                    topics[slot].points.push(point);
                }
            }
        }
    }

    tracing::debug!(topics = topics.len(), "Merged chunk summaries");
    DocumentSummary { summary: topics }
}
