//! Usage accounting for provider exchanges.

use std::time::Instant;

use crate::adapters::ProviderResponse;
use crate::config::PriceTable;
use crate::domain::{TokenCount, UsageMetrics};

/// Fallback size-to-token ratio: one token per four bytes of payload text.
const BYTES_PER_TOKEN: u64 = 4;

/// Derives usage metrics from a raw provider exchange.
///
/// The price table is injected configuration; nothing here reads ambient
/// state. Always succeeds given valid timestamps.
#[derive(Debug, Clone)]
pub struct UsageAccountant {
    pricing: PriceTable,
}

impl UsageAccountant {
    pub fn new(pricing: PriceTable) -> Self {
        Self { pricing }
    }

    /// Compute metrics for one exchange.
    ///
    /// Provider-reported token counts take precedence; otherwise tokens are
    /// estimated from payload size at `BYTES_PER_TOKEN`, rounded up. The
    /// caller supplies a monotonic `Instant` pair bracketing the call.
    pub fn measure(
        &self,
        raw: &ProviderResponse,
        started_at: Instant,
        ended_at: Instant,
    ) -> UsageMetrics {
        let tokens_used = match raw.reported_tokens {
            Some(count) => TokenCount::Exact(count),
            None => TokenCount::Estimated(estimate_tokens(&raw.content)),
        };

        let estimated_cost_usd = tokens_used.get() as f64 * self.pricing.price_for(&raw.model);

        let latency_ms = ended_at
            .saturating_duration_since(started_at)
            .as_millis() as u64;

        UsageMetrics {
            tokens_used,
            estimated_cost_usd,
            latency_ms,
            model: raw.model.clone(),
        }
    }
}

fn estimate_tokens(content: &str) -> u64 {
    let bytes = content.len() as u64;
    (bytes + BYTES_PER_TOKEN - 1) / BYTES_PER_TOKEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn accountant() -> UsageAccountant {
        UsageAccountant::new(PriceTable::default())
    }

    fn response(content: &str) -> ProviderResponse {
        ProviderResponse::new(content, "test-model")
    }

    #[test]
    fn test_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_reported_tokens_take_precedence() {
        let now = Instant::now();
        let raw = response("some payload text").with_reported_tokens(1234);

        let metrics = accountant().measure(&raw, now, now);
        assert_eq!(metrics.tokens_used, TokenCount::Exact(1234));
    }

    #[test]
    fn test_estimated_when_unreported() {
        let now = Instant::now();
        let raw = response("12345678");

        let metrics = accountant().measure(&raw, now, now);
        assert_eq!(metrics.tokens_used, TokenCount::Estimated(2));
    }

    #[test]
    fn test_cost_monotonic_in_tokens() {
        let now = Instant::now();
        let acct = accountant();

        let mut last_cost = -1.0;
        for tokens in [0u64, 1, 10, 1000, 100_000] {
            let raw = response("x").with_reported_tokens(tokens);
            let metrics = acct.measure(&raw, now, now);
            assert!(metrics.estimated_cost_usd >= last_cost);
            last_cost = metrics.estimated_cost_usd;
        }
    }

    #[test]
    fn test_latency_from_instant_pair() {
        let started = Instant::now();
        let ended = started + Duration::from_millis(250);

        let metrics = accountant().measure(&response("x"), started, ended);
        assert_eq!(metrics.latency_ms, 250);
    }

    #[test]
    fn test_latency_never_negative() {
        let started = Instant::now();
        let ended = started - Duration::from_millis(5);

        let metrics = accountant().measure(&response("x"), started, ended);
        assert_eq!(metrics.latency_ms, 0);
    }

    #[test]
    fn test_model_carried_through() {
        let now = Instant::now();
        let metrics = accountant().measure(&response("x"), now, now);
        assert_eq!(metrics.model, "test-model");
    }
}
