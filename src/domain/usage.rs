//! Usage and cost metrics derived from a provider exchange.

use serde::{Deserialize, Serialize};

/// Token usage, tagged by provenance.
///
/// Provider-reported counts are `Exact`; when the provider reports nothing,
/// the accountant falls back to a size-based `Estimated` count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "source", content = "count")]
pub enum TokenCount {
    Exact(u64),
    Estimated(u64),
}

impl TokenCount {
    /// The token count regardless of provenance
    pub fn get(&self) -> u64 {
        match self {
            Self::Exact(count) | Self::Estimated(count) => *count,
        }
    }

    /// Whether the count came straight from the provider
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Exact(_))
    }
}

/// Metrics for one provider exchange, attached to the final result.
///
/// Derived and immutable; exists for billing and observability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageMetrics {
    /// Tokens consumed by the exchange
    pub tokens_used: TokenCount,

    /// `tokens_used x price per token` for the model, from the price table
    pub estimated_cost_usd: f64,

    /// Wall-clock latency of the provider call
    pub latency_ms: u64,

    /// Model that served the request
    pub model: String,
}
