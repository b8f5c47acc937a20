#![deny(missing_docs)]

//! Chunked incremental summarization of long documents.
//!
//! Long texts are split into word chunks under a token budget, each chunk is
//! summarized by a hosted LLM provider with the topics seen so far carried
//! forward as a hint, and the per-chunk summaries are merged into one
//! topical document summary. Batches of documents run concurrently while
//! each document's chunks stay strictly sequential.

/// Word-budget chunking of source documents.
pub mod chunking;
/// Environment-driven configuration management.
pub mod config;
/// Carried-forward topic context between chunk requests.
pub mod context;
/// Structured logging and tracing setup.
pub mod logging;
/// Merging per-chunk summaries into a document summary.
pub mod merge;
/// Document and batch summarization orchestration.
pub mod pipeline;
/// Provider clients, transport, and retry handling.
pub mod provider;
/// Canonical summary data model.
pub mod summary;
