//! OpenAI chat-completions summarization client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::transport::RetryingTransport;
use super::{INSTRUCTION, ProviderError, SummaryClient, SummaryRequest, decode_summary_payload};
use crate::config::Config;
use crate::summary::DocumentSummary;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
// Large prompts can take a while to complete; allow for that.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Summarization client backed by the OpenAI chat-completions endpoint.
pub struct OpenAiSummaryClient {
    http: Client,
    transport: RetryingTransport,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiSummaryClient {
    /// Build a client from configuration, capturing the API key once.
    pub fn new(config: &Config) -> Self {
        let http = Client::builder()
            .user_agent("summarist/openai")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to construct reqwest::Client for OpenAI");
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
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionReply {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl SummaryClient for OpenAiSummaryClient {
    async fn summarize_chunk(
        &self,
        chunk: &str,
        hint: Option<&str>,
    ) -> Result<DocumentSummary, ProviderError> {
        let request = SummaryRequest::new(chunk, hint)?;
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": INSTRUCTION },
                { "role": "user", "content": request.user_content() },
            ],
            "response_format": { "type": "json_object" },
        });

        tracing::debug!(
            model = %self.model,
            chunk_bytes = chunk.len(),
            hinted = hint.is_some(),
            "Requesting OpenAI chunk summary"
        );

        let body = self
            .transport
            .send(self.http.post(self.endpoint()).bearer_auth(&self.api_key).json(&payload))
            .await?;

        let reply: ChatCompletionReply =
            serde_json::from_str(&body).map_err(ProviderError::MalformedReply)?;
        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::NoCandidates)?;
        decode_summary_payload(&choice.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method::POST, MockServer};

    fn test_client(base_url: String) -> OpenAiSummaryClient {
        OpenAiSummaryClient {
            http: Client::builder()
                .user_agent("summarist-test")
                .build()
                .expect("client"),
            transport: RetryingTransport::default(),
            base_url,
            api_key: "test-key".to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    #[tokio::test]
    async fn parses_double_encoded_summary() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        let inner = serde_json::to_string(&json!({
            "summary": [{ "topic": "Glycolysis", "points": ["Ten enzymatic steps"] }]
        }))
        .expect("inner payload");

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer test-key")
                    .body_contains("json_object");
                then.status(200).json_body(json!({
                    "choices": [{ "message": { "role": "assistant", "content": inner } }]
                }));
            })
            .await;

        let summary = client
            .summarize_chunk("some chunk text", None)
            .await
            .expect("summary");

        mock.assert_async().await;
        assert_eq!(summary.summary[0].topic, "Glycolysis");
    }

    #[tokio::test]
    async fn hint_is_prepended_to_user_message() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        let inner = serde_json::to_string(&json!({ "summary": [] })).expect("inner payload");
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .body_contains("already summarized chunk text");
                then.status(200).json_body(json!({
                    "choices": [{ "message": { "role": "assistant", "content": inner } }]
                }));
            })
            .await;

        client
            .summarize_chunk("chunk text", Some("already summarized"))
            .await
            .expect("summary");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_choices_is_no_candidates() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let error = client
            .summarize_chunk("chunk", None)
            .await
            .expect_err("no candidates");
        assert!(matches!(error, ProviderError::NoCandidates));
    }

    #[tokio::test]
    async fn empty_chunk_never_reaches_the_network() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let error = client
            .summarize_chunk("   ", None)
            .await
            .expect_err("empty input");
        assert!(matches!(error, ProviderError::EmptyInput));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn server_error_surfaces_body() {
        let server = MockServer::start_async().await;
        let client = test_client(server.base_url());

        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(500).body("upstream exploded");
            })
            .await;

        let error = client
            .summarize_chunk("chunk", None)
            .await
            .expect_err("terminal error");
        match error {
            ProviderError::Transport(transport_error) => {
                assert!(transport_error.to_string().contains("upstream exploded"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
