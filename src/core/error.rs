//! Typed errors for the generation pipeline.
//!
//! Every failure is a value: the orchestrator returns a `PipelineError`
//! tagged with the stage it occurred in, and nothing is thrown past its
//! boundary. Provider errors carry their own transient/permanent
//! classification, which drives the client's retry decisions.

use std::time::Duration;

use thiserror::Error;

/// Caller input was malformed. Never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unknown difficulty '{value}' (expected easy, medium, or hard)")]
    UnknownDifficulty { value: String },

    #[error("field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    #[error("field '{field}' is {len} characters, maximum is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// The provider call failed.
///
/// `Timeout`, `RateLimited`, and `Unavailable` are transient and retried
/// within the client's bounded policy; `Unauthorized` and `Rejected` fail
/// the run immediately.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider call timed out")]
    Timeout,

    #[error("provider rate limited the request")]
    RateLimited { retry_after: Option<Duration> },

    #[error("provider rejected credentials: {message}")]
    Unauthorized { message: String },

    #[error("provider rejected the request: {message}")]
    Rejected { message: String },

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },
}

impl ProviderError {
    /// Whether a retry is expected to help
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::RateLimited { .. } | Self::Unavailable { .. }
        )
    }

    /// Provider-supplied wait hint, honored over the computed backoff
    pub fn retry_hint(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// The provider's payload could not be turned into a challenge.
///
/// Never retried: a parse failure signals a provider contract change and
/// must be surfaced, not papered over.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("provider payload is not well-formed JSON: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },

    #[error("provider payload violates the challenge schema: field '{field}' {reason}")]
    SchemaViolation { field: String, reason: &'static str },
}

impl ParseError {
    /// The offending wire-format field, when identifiable
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SchemaViolation { field, .. } => Some(field.as_str()),
            Self::Malformed { .. } => None,
        }
    }
}

/// A classified pipeline failure, tagged by the stage it occurred in.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("response parsing failed: {0}")]
    Parse(#[from] ParseError),
}

impl PipelineError {
    /// Name of the pipeline stage the run failed in
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validate",
            Self::Provider(_) => "invoke_provider",
            Self::Parse(_) => "parse_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_transience() {
        assert!(ProviderError::Timeout.is_transient());
        assert!(ProviderError::RateLimited { retry_after: None }.is_transient());
        assert!(ProviderError::Unavailable {
            message: "502".to_string()
        }
        .is_transient());

        assert!(!ProviderError::Unauthorized {
            message: "bad key".to_string()
        }
        .is_transient());
        assert!(!ProviderError::Rejected {
            message: "quota exhausted".to_string()
        }
        .is_transient());
    }

    #[test]
    fn test_retry_hint_only_on_rate_limit() {
        let hint = Duration::from_secs(7);
        let err = ProviderError::RateLimited {
            retry_after: Some(hint),
        };
        assert_eq!(err.retry_hint(), Some(hint));
        assert_eq!(ProviderError::Timeout.retry_hint(), None);
    }

    #[test]
    fn test_pipeline_error_stage_mapping() {
        let validation: PipelineError = ValidationError::EmptyField { field: "topic" }.into();
        assert_eq!(validation.stage(), "validate");

        let provider: PipelineError = ProviderError::Timeout.into();
        assert_eq!(provider.stage(), "invoke_provider");

        let parse: PipelineError = ParseError::SchemaViolation {
            field: "testCases".to_string(),
            reason: "is missing",
        }
        .into();
        assert_eq!(parse.stage(), "parse_response");
    }

    #[test]
    fn test_schema_violation_names_field() {
        let err = ParseError::SchemaViolation {
            field: "hints".to_string(),
            reason: "is empty",
        };
        assert_eq!(err.field(), Some("hints"));
        assert!(err.to_string().contains("'hints'"));
    }
}
