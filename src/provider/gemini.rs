//! Gemini generateContent summarization client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use super::transport::RetryingTransport;
use super::{INSTRUCTION, ProviderError, SummaryClient, SummaryRequest, decode_summary_payload};
use crate::config::Config;
use crate::summary::DocumentSummary;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Summarization client backed by the Gemini generateContent endpoint.
pub struct GeminiSummaryClient {
    http: Client,
    transport: RetryingTransport,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiSummaryClient {
    /// Build a client from configuration, capturing the API key once.
    pub fn new(config: &Config) -> Self {
        let http = Client::builder()
            .user_agent("summarist/gemini")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to construct reqwest::Client for Gemini");
        Self {
            http,
            transport: RetryingTransport::new(config.retry_policy()),
            base_url: config
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: config.api_key.clone(),
            model: config
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// JSON schema declared up front so the model is constrained to the summary
/// shape instead of merely asked for it.
fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "topic": { "type": "STRING" },
                        "points": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" }
                        }
                    },
                    "required": ["topic", "points"]
                }
            }
        },
        "required": ["summary"]
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentReply {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: String,
}

#[async_trait]
impl SummaryClient for GeminiSummaryClient {
    async fn summarize_chunk(
        &self,
        chunk: &str,
        hint: Option<&str>,
    ) -> Result<DocumentSummary, ProviderError> {
        let request = SummaryRequest::new(chunk, hint)?;
        let payload = json!({
            "contents": [
                { "parts": [{ "text": request.user_content() }] }
            ],
            "system_instruction": {
                "parts": [{ "text": INSTRUCTION }]
            },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            },
        });

        tracing::debug!(
            model = %self.model,
            chunk_bytes = chunk.len(),
            hinted = hint.is_some(),
            "Requesting Gemini chunk summary"
        );

        let body = self
            .transport
            .send(
                self.http
                    .post(self.endpoint())
                    .header("x-goog-api-key", &self.api_key)
                    .json(&payload),
            )
            .await?;

        let reply: GenerateContentReply =
            serde_json::from_str(&body).map_err(ProviderError::MalformedReply)?;
        let part = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .ok_or(ProviderError::NoCandidates)?;
        decode_summary_payload(&part.text)
    }
}
