//! Provider clients that turn a text chunk into a topical summary.
//!
//! Both hosted backends receive the same system instruction and are required
//! to answer with the canonical `{"summary": [...]}` object, so the rest of
//! the pipeline never learns which provider produced a summary. Each client
//! validates its input before touching the network, builds an immutable
//! request value per call, and sends exactly one logical request through the
//! retrying transport.

pub mod gemini;
pub mod openai;
pub mod transport;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, Provider};
use crate::summary::DocumentSummary;
use self::transport::TransportError;

/// System instruction shared by every provider.
///
/// The instruction pins the output contract: exhaustive topical coverage,
/// concrete examples preserved, and strictly the canonical JSON shape with
/// no surrounding prose.
pub const INSTRUCTION: &str = "You are an expert academic summarizer. \
Summarize the provided text exhaustively by topic. Never abbreviate or skip \
content; keep every concrete example, definition, and figure that appears in \
the text. Group related statements under a concise topic label and express \
them as complete, self-contained bullet points. Respond with nothing but a \
JSON object of the exact shape \
{\"summary\": [{\"topic\": \"<label>\", \"points\": [\"<point>\", ...]}]}.";

/// Errors surfaced while producing a chunk summary.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The chunk text was empty or all whitespace.
    #[error("Cannot summarize empty input")]
    EmptyInput,
    /// The transport gave up or hit a terminal HTTP error.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The provider's reply envelope could not be decoded.
    #[error("Malformed provider reply: {0}")]
    MalformedReply(#[source] serde_json::Error),
    /// The reply envelope decoded but carried no answer.
    #[error("Provider reply carried no candidates")]
    NoCandidates,
    /// The answer text was not a valid summary object.
    #[error("Provider answer is not a valid summary: {0}")]
    InvalidSummary(#[source] serde_json::Error),
}

/// One immutable summarization request.
///
/// A fresh value is built for every call; nothing about a request is shared
/// or mutated between chunks.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    chunk: String,
    hint: Option<String>,
}

impl SummaryRequest {
    /// Build a request, rejecting empty or all-whitespace chunk text.
    pub fn new(chunk: &str, hint: Option<&str>) -> Result<Self, ProviderError> {
        if chunk.trim().is_empty() {
            return Err(ProviderError::EmptyInput);
        }
        Ok(Self {
            chunk: chunk.to_string(),
            hint: hint.map(str::to_string),
        })
    }

    /// Render the user-message content: the hint, when present, followed by
    /// the chunk text.
    pub fn user_content(&self) -> String {
        match &self.hint {
            Some(hint) => format!("{hint} {}", self.chunk),
            None => self.chunk.clone(),
        }
    }
}

/// Capability implemented by every summarization backend.
#[async_trait]
pub trait SummaryClient: Send + Sync {
    /// Summarize one chunk, optionally steered by a continuation hint.
    async fn summarize_chunk(
        &self,
        chunk: &str,
        hint: Option<&str>,
    ) -> Result<DocumentSummary, ProviderError>;
}

/// Build the summarization client selected by configuration.
pub fn summary_client(config: &Config) -> Box<dyn SummaryClient> {
    match config.provider {
        Provider::OpenAi => Box::new(openai::OpenAiSummaryClient::new(config)),
        Provider::Gemini => Box::new(gemini::GeminiSummaryClient::new(config)),
    }
}

/// Decode the double-encoded summary payload a provider hands back as the
/// answer text.
pub(crate) fn decode_summary_payload(content: &str) -> Result<DocumentSummary, ProviderError> {
    serde_json::from_str(content).map_err(ProviderError::InvalidSummary)
}
