//! HTTP transport with fixed-delay retry on rate limiting.
//!
//! Hosted LLM endpoints answer 429 when a quota window is exhausted; those
//! replies are worth waiting out. Every other non-success status is treated
//! as terminal and surfaced with the response body so callers can see what
//! the provider complained about. The retry loop itself is written against a
//! closure-producing attempt so its timing behavior can be exercised without
//! a network in sight.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the response body could not be read.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The provider answered with a non-retryable error status.
    #[error("Provider returned {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code of the reply.
        status: StatusCode,
        /// Response body, empty if it could not be read.
        body: String,
    },
    /// Every attempt was answered with 429.
    #[error("Rate limited on all {attempts} attempts")]
    RetriesExhausted {
        /// Number of attempts made before giving up.
        attempts: u32,
    },
    /// The request body cannot be replayed, so retrying is impossible.
    #[error("Request cannot be cloned for retry")]
    NotRetryable,
}

/// Attempt count and inter-attempt delay for the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts before giving up, including the first.
    pub max_attempts: u32,
    /// Wait between a 429 reply and the next attempt.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_millis(60_000),
        }
    }
}

/// Status and body of one completed HTTP exchange.
#[derive(Debug)]
pub(crate) struct RawReply {
    pub(crate) status: StatusCode,
    pub(crate) body: String,
}

/// Sends requests and retries rate-limited ones on a fixed schedule.
#[derive(Debug, Default, Clone)]
pub struct RetryingTransport {
    policy: RetryPolicy,
}

impl RetryingTransport {
    /// Build a transport with the given retry policy.
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Send `request`, retrying on 429 per the policy, and return the
    /// successful response body.
    pub async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, TransportError> {
        self.run(|| {
            let attempt = request.try_clone().ok_or(TransportError::NotRetryable);
            async move {
                let response = attempt?.send().await?;
                let status = response.status();
                let body = if status.is_success() {
                    response.text().await?
                } else {
                    response.text().await.unwrap_or_default()
                };
                Ok(RawReply { status, body })
            }
        })
        .await
    }

    /// Drive the retry loop over an arbitrary attempt closure.
    pub(crate) async fn run<F, Fut>(&self, mut attempt: F) -> Result<String, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RawReply, TransportError>>,
    {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let reply = attempt().await?;
            if reply.status.is_success() {
                return Ok(reply.body);
            }
            if reply.status != StatusCode::TOO_MANY_REQUESTS {
                return Err(TransportError::UnexpectedStatus {
                    status: reply.status,
                    body: reply.body,
                });
            }
            if attempts >= self.policy.max_attempts {
                tracing::warn!(attempts, "Rate limit retries exhausted");
                return Err(TransportError::RetriesExhausted { attempts });
            }
            tracing::debug!(
                attempt = attempts,
                delay_ms = self.policy.delay.as_millis() as u64,
                "Rate limited; waiting before retry"
            );
            tokio::time::sleep(self.policy.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn reply(status: u16, body: &str) -> RawReply {
        RawReply {
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn retries_twice_then_succeeds_after_two_full_delays() {
        let transport = RetryingTransport::default();
        let calls = Cell::new(0u32);
        let started = tokio::time::Instant::now();

        let body = transport
            .run(|| {
                let call = calls.get() + 1;
                calls.set(call);
                async move {
                    if call <= 2 {
                        Ok(reply(429, "slow down"))
                    } else {
                        Ok(reply(200, "summary body"))
                    }
                }
            })
            .await
            .expect("success on third attempt");

        assert_eq!(body, "summary body");
        assert_eq!(calls.get(), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(120_000));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_five_rate_limited_attempts() {
        let transport = RetryingTransport::default();
        let calls = Cell::new(0u32);

        let error = transport
            .run(|| {
                calls.set(calls.get() + 1);
                async { Ok(reply(429, "still limited")) }
            })
            .await
            .expect_err("exhaustion");

        assert_eq!(calls.get(), 5);
        assert!(matches!(
            error,
            TransportError::RetriesExhausted { attempts: 5 }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn no_delay_after_final_failed_attempt() {
        let transport = RetryingTransport::new(RetryPolicy {
            max_attempts: 2,
            delay: Duration::from_millis(60_000),
        });
        let started = tokio::time::Instant::now();

        let error = transport
            .run(|| async { Ok(reply(429, "")) })
            .await
            .expect_err("exhaustion");

        assert!(matches!(error, TransportError::RetriesExhausted { .. }));
        // One wait between the two attempts, none after the last.
        assert_eq!(started.elapsed(), Duration::from_millis(60_000));
    }

    #[tokio::test]
    async fn server_error_is_terminal_with_body() {
        let transport = RetryingTransport::default();
        let calls = Cell::new(0u32);

        let error = transport
            .run(|| {
                calls.set(calls.get() + 1);
                async { Ok(reply(500, "boom")) }
            })
            .await
            .expect_err("terminal error");

        assert_eq!(calls.get(), 1);
        match error {
            TransportError::UnexpectedStatus { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_on_first_attempt_returns_immediately() {
        let transport = RetryingTransport::default();
        let body = transport
            .run(|| async { Ok(reply(200, "first try")) })
            .await
            .expect("immediate success");
        assert_eq!(body, "first try");
    }

    #[tokio::test]
    async fn custom_policy_controls_attempt_count() {
        let transport = RetryingTransport::new(RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(1),
        });
        let calls = Cell::new(0u32);

        let error = transport
            .run(|| {
                calls.set(calls.get() + 1);
                async { Ok(reply(429, "")) }
            })
            .await
            .expect_err("exhaustion");

        assert_eq!(calls.get(), 3);
        assert!(matches!(
            error,
            TransportError::RetriesExhausted { attempts: 3 }
        ));
    }
}
