//! Provider adapters and the retrying client.
//!
//! `Provider` is the seam that makes generative-AI backends swappable: one
//! implementation per wire protocol, each responsible for a single attempt
//! and for classifying its failures. `ProviderClient` wraps any provider
//! with the bounded-retry policy, per-attempt timeout, and shared metrics
//! counters.

pub mod http;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{error, instrument, warn};

use crate::config::RetryPolicy;
use crate::core::error::ProviderError;
use crate::core::prompt::Prompt;

// Re-export the HTTP provider
pub use http::HttpProvider;

/// Raw provider output plus provider-reported metadata.
///
/// Transient: held only until parsing and accounting are done.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// The completion text returned by the provider
    pub content: String,

    /// Model that served the request
    pub model: String,

    /// Provider-reported finish reason (if any)
    pub finish_reason: Option<String>,

    /// Exact token count, when the provider reports one
    pub reported_tokens: Option<u64>,
}

impl ProviderResponse {
    /// Create a response with just content and model
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            finish_reason: None,
            reported_tokens: None,
        }
    }

    /// Attach an exact provider-reported token count
    pub fn with_reported_tokens(mut self, tokens: u64) -> Self {
        self.reported_tokens = Some(tokens);
        self
    }
}

/// A single attempt against a generative-AI provider.
///
/// Implementations perform one call and classify its failure; retry and
/// timeout policy live in `ProviderClient`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Execute one completion attempt for the prompt
    async fn complete(&self, prompt: &Prompt) -> Result<ProviderResponse, ProviderError>;
}

/// Call counters shared across concurrent runs.
///
/// The only mutable state the client owns; everything else is read-mostly
/// configuration.
#[derive(Debug, Default)]
pub struct ClientCounters {
    /// Attempts started (including retries)
    pub attempts: AtomicU64,

    /// Retries performed after a transient failure
    pub retries: AtomicU64,

    /// Invocations that failed permanently
    pub failures: AtomicU64,
}

/// Retrying wrapper around a `Provider`.
///
/// Applies the bounded-retry policy to transient failures (timeout, rate
/// limit, unavailability) with exponential backoff and jitter, honoring a
/// provider-supplied wait hint when one exists. Permanent failures return
/// immediately. Dropping the returned future aborts the in-flight attempt
/// and skips remaining retries.
pub struct ProviderClient {
    provider: Arc<dyn Provider>,
    retry: RetryPolicy,
    attempt_timeout: std::time::Duration,
    counters: ClientCounters,
}

impl ProviderClient {
    pub fn new(
        provider: Arc<dyn Provider>,
        retry: RetryPolicy,
        attempt_timeout: std::time::Duration,
    ) -> Self {
        Self {
            provider,
            retry,
            attempt_timeout,
            counters: ClientCounters::default(),
        }
    }

    /// Shared call counters
    pub fn counters(&self) -> &ClientCounters {
        &self.counters
    }

    /// Upper bound on one invocation: attempts x (timeout + max backoff)
    pub fn run_deadline(&self) -> std::time::Duration {
        self.retry.run_deadline(self.attempt_timeout)
    }

    /// Invoke the provider with retries.
    ///
    /// Returns the first successful response, or the last error once the
    /// attempt budget is exhausted or a permanent failure occurs.
    #[instrument(skip(self, prompt), fields(provider = self.provider.name()))]
    pub async fn invoke(&self, prompt: &Prompt) -> Result<ProviderResponse, ProviderError> {
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            self.counters.attempts.fetch_add(1, Ordering::Relaxed);

            let result = match timeout(self.attempt_timeout, self.provider.complete(prompt)).await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout),
            };

            match result {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && self.retry.should_retry(attempt) => {
                    let delay = e
                        .retry_hint()
                        .unwrap_or_else(|| self.retry.delay_for_attempt(attempt));

                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Provider attempt failed, retrying"
                    );

                    self.counters.retries.fetch_add(1, Ordering::Relaxed);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    self.counters.failures.fetch_add(1, Ordering::Relaxed);

                    error!(attempt, error = %e, "Provider call failed permanently");
                    return Err(e);
                }
            }
        }
    }
}
