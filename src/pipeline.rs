//! Document and batch summarization orchestration.
//!
//! `DocumentSummarizer` walks one document chunk by chunk, strictly in order,
//! feeding the topics seen so far back into each request as a continuation
//! hint. `BatchOrchestrator` fans whole documents out onto concurrent tasks
//! while keeping results aligned with input order. Both are all-or-nothing;
//! a failed chunk fails its document and a failed document fails the batch.

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::chunking::chunk_words;
use crate::context::ContextTracker;
use crate::merge::merge_summaries;
use crate::provider::{ProviderError, SummaryClient};
use crate::summary::DocumentSummary;

/// Summarizes a single document through sequential chunk requests.
pub struct DocumentSummarizer {
    client: Arc<dyn SummaryClient>,
    max_chunk_tokens: usize,
}

impl DocumentSummarizer {
    /// Build a summarizer around a provider client and a chunk token budget.
    pub fn new(client: Arc<dyn SummaryClient>, max_chunk_tokens: usize) -> Self {
        Self {
            client,
            max_chunk_tokens,
        }
    }

    /// Summarize `text`, merging the per-chunk summaries into one.
    ///
    /// Chunks are processed strictly in document order so each request can
    /// carry the topics discovered by its predecessors. Empty or whitespace
    /// input is rejected before any chunking happens.
    pub async fn summarize(&self, text: &str) -> Result<DocumentSummary, ProviderError> {
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyInput);
        }

        tracing::info!(
            bytes = text.len(),
            max_chunk_tokens = self.max_chunk_tokens,
            "Summarizing document"
        );

        let mut tracker = ContextTracker::new();
        let mut chunk_summaries = Vec::new();

        for chunk in chunk_words(text, self.max_chunk_tokens) {
            let hint = tracker.hint();
            tracing::debug!(
                chunk = chunk.index,
                chunk_bytes = chunk.text.len(),
                known_topics = tracker.topics().len(),
                "Summarizing chunk"
            );
            let summary = self
                .client
                .summarize_chunk(&chunk.text, hint.as_deref())
                .await?;
            tracker.record(&summary);
            chunk_summaries.push(summary);
        }

        let merged = merge_summaries(chunk_summaries);
        tracing::info!(topics = merged.summary.len(), "Document summarized");
        Ok(merged)
    }
}

/// Summarizes several documents concurrently.
pub struct BatchOrchestrator {
    summarizer: Arc<DocumentSummarizer>,
}

impl BatchOrchestrator {
    /// Build an orchestrator around a shared document summarizer.
    pub fn new(summarizer: Arc<DocumentSummarizer>) -> Self {
        Self { summarizer }
    }

    /// Summarize every document, returning results in input order.
    ///
    /// Documents run concurrently; within each document the chunk loop stays
    /// sequential. The first failure observed fails the whole batch and the
    /// remaining document tasks are dropped.
    pub async fn summarize_all(
        &self,
        documents: Vec<String>,
    ) -> Result<Vec<DocumentSummary>, ProviderError> {
        tracing::info!(documents = documents.len(), "Summarizing batch");

        let mut tasks = JoinSet::new();
        for (index, document) in documents.into_iter().enumerate() {
            let summarizer = Arc::clone(&self.summarizer);
            tasks.spawn(async move {
                let summary = summarizer.summarize(&document).await;
                (index, summary)
            });
        }

        let mut indexed = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(summary))) => indexed.push((index, summary)),
                Ok((index, Err(error))) => {
                    tracing::error!(document = index, error = %error, "Batch document failed");
                    return Err(error);
                }
                Err(join_error) if join_error.is_panic() => {
                    std::panic::resume_unwind(join_error.into_panic());
                }
                Err(join_error) => {
                    unreachable!("batch task cancelled unexpectedly: {join_error}");
                }
            }
        }

        indexed.sort_by_key(|(index, _)| *index);
        Ok(indexed.into_iter().map(|(_, summary)| summary).collect())
    }
}
