//! HTTP provider adapter.
//!
//! The only module that knows a concrete wire schema: a JSON POST carrying
//! `{model, prompt, temperature}` against a completion endpoint with bearer
//! auth. Swapping providers means swapping this file, not the pipeline.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ProviderSettings;
use crate::core::error::ProviderError;
use crate::core::prompt::Prompt;

use super::{Provider, ProviderResponse};

/// Generative-AI provider reached over HTTP.
pub struct HttpProvider {
    settings: ProviderSettings,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionUsage {
    total_tokens: u64,
}

impl HttpProvider {
    /// Create a provider from settings. The per-attempt timeout is enforced
    /// by `ProviderClient`, not here.
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Provider for HttpProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn complete(&self, prompt: &Prompt) -> Result<ProviderResponse, ProviderError> {
        let body = CompletionRequest {
            model: &self.settings.model,
            prompt: prompt.text(),
            temperature: self.settings.temperature,
        };

        let mut request = self.client.post(&self.settings.endpoint).json(&body);
        if let Some(ref key) = self.settings.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(&response);
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, retry_after, text.trim()));
        }

        let completion: CompletionResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::Unavailable {
                    message: format!("invalid completion body: {}", e),
                })?;

        Ok(ProviderResponse {
            content: completion.content,
            model: completion
                .model
                .unwrap_or_else(|| self.settings.model.clone()),
            finish_reason: completion.finish_reason,
            reported_tokens: completion.usage.map(|u| u.total_tokens),
        })
    }
}

fn classify_transport(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Unavailable {
            message: err.to_string(),
        }
    }
}

fn classify_status(status: StatusCode, retry_after: Option<Duration>, body: &str) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited { retry_after },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized {
            message: format!("{}: {}", status, body),
        },
        s if s.is_client_error() => ProviderError::Rejected {
            message: format!("{}: {}", s, body),
        },
        s => ProviderError::Unavailable {
            message: format!("{}: {}", s, body),
        },
    }
}

/// Parse an integer-seconds Retry-After header, the form providers use for
/// rate limits.
fn parse_retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_classification_keeps_hint() {
        let hint = Some(Duration::from_secs(12));
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, hint, "slow down");

        assert_eq!(err, ProviderError::RateLimited { retry_after: hint });
        assert!(err.is_transient());
    }

    #[test]
    fn test_auth_failures_are_permanent() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = classify_status(status, None, "bad key");
            assert!(matches!(err, ProviderError::Unauthorized { .. }));
            assert!(!err.is_transient());
        }
    }

    #[test]
    fn test_other_client_errors_are_rejected() {
        let err = classify_status(StatusCode::BAD_REQUEST, None, "malformed request");
        assert!(matches!(err, ProviderError::Rejected { .. }));
        assert!(!err.is_transient());

        let err = classify_status(StatusCode::PAYMENT_REQUIRED, None, "quota exhausted");
        assert!(matches!(err, ProviderError::Rejected { .. }));
    }

    #[test]
    fn test_server_errors_are_transient() {
        for status in [
            StatusCode::INTERNAL_SERVER_ERROR,
            StatusCode::BAD_GATEWAY,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            let err = classify_status(status, None, "upstream down");
            assert!(matches!(err, ProviderError::Unavailable { .. }));
            assert!(err.is_transient());
        }
    }
}
