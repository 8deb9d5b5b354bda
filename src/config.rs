//! Pipeline configuration.
//!
//! Every tunable — provider settings, retry policy, price table — is
//! explicit data passed into constructors, never read ambiently from inside
//! business logic. Loading is layered: YAML file first, then an explicit
//! env override for the API key so credentials stay out of config files.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the generation pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Provider endpoint, model, and timeout settings
    #[serde(default)]
    pub provider: ProviderSettings,

    /// Bounded-retry policy for transient provider failures
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Per-model token pricing
    #[serde(default)]
    pub pricing: PriceTable,
}

impl GenerationConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse config YAML")
    }

    /// Fill the API key from an environment variable when the file left it
    /// unset. The env var wins over the file, matching the usual layering.
    pub fn with_api_key_from_env(mut self, var: &str) -> Self {
        if let Ok(key) = std::env::var(var) {
            if !key.is_empty() {
                self.provider.api_key = Some(key);
            }
        }
        self
    }
}

/// Settings for the external generative-AI provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Completion endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Bearer token for the provider (usually injected via env)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_endpoint() -> String {
    "http://localhost:8080/v1/completions".to_string()
}
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_timeout_ms() -> u64 {
    30_000
} // 30s per attempt

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ProviderSettings {
    /// Per-attempt timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Retry policy for transient provider failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including first try)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay between retries in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Backoff multiplier (delay *= multiplier after each retry)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Fraction of random spread added on top of each delay (0 disables)
    #[serde(default = "default_jitter")]
    pub jitter: f64,
}

fn default_max_attempts() -> u32 {
    3
}
fn default_initial_delay() -> u64 {
    500
}
fn default_max_delay() -> u64 {
    10_000
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_jitter() -> f64 {
    0.2
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: default_jitter(),
        }
    }
}

impl RetryPolicy {
    /// Check if another attempt is allowed after `attempt` attempts
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Exponential delay for a specific attempt (1-indexed), capped, without
    /// jitter
    pub fn base_delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::from_millis(self.initial_delay_ms);
        }

        let delay =
            self.initial_delay_ms as f64 * self.backoff_multiplier.powi((attempt - 1) as i32);

        let capped = delay.min(self.max_delay_ms as f64) as u64;
        Duration::from_millis(capped)
    }

    /// Base delay plus up to `jitter` fraction of random spread
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.base_delay_for_attempt(attempt);
        if self.jitter <= 0.0 {
            return base;
        }

        let spread_ms = base.as_millis() as f64 * self.jitter * rand::random::<f64>();
        base + Duration::from_millis(spread_ms as u64)
    }

    /// Upper bound on a whole run: attempts x (timeout + max backoff)
    pub fn run_deadline(&self, attempt_timeout: Duration) -> Duration {
        let max_backoff =
            Duration::from_millis((self.max_delay_ms as f64 * (1.0 + self.jitter)) as u64);
        (attempt_timeout + max_backoff) * self.max_attempts
    }
}

/// Per-model token pricing, in USD per token.
///
/// Configuration, not logic: models without an entry fall back to
/// `default_per_token` so cost is always computable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    /// Rate used when the model has no entry
    #[serde(default = "default_price_per_token")]
    pub default_per_token: f64,

    /// Model name to USD-per-token overrides
    #[serde(default)]
    pub models: HashMap<String, f64>,
}

fn default_price_per_token() -> f64 {
    0.000002
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            default_per_token: default_price_per_token(),
            models: HashMap::new(),
        }
    }
}

impl PriceTable {
    /// USD per token for a model
    pub fn price_for(&self, model: &str) -> f64 {
        self.models
            .get(model)
            .copied()
            .unwrap_or(self.default_per_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::default();

        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.provider.timeout(), Duration::from_millis(30_000));
        assert!(config.provider.api_key.is_none());
        assert!(config.pricing.default_per_token > 0.0);
    }

    #[test]
    fn test_from_yaml_with_partial_sections() {
        let yaml = r#"
provider:
  endpoint: https://api.example.com/v1/complete
  model: challenge-gen-1
retry:
  max_attempts: 5
  jitter: 0.0
pricing:
  default_per_token: 0.000001
  models:
    challenge-gen-1: 0.000003
"#;

        let config = GenerationConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.provider.endpoint, "https://api.example.com/v1/complete");
        assert_eq!(config.provider.model, "challenge-gen-1");
        // Unspecified fields keep their defaults
        assert_eq!(config.provider.temperature, 0.7);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_delay_ms, 500);
        assert_eq!(config.pricing.price_for("challenge-gen-1"), 0.000003);
        assert_eq!(config.pricing.price_for("unknown-model"), 0.000001);
    }

    #[test]
    fn test_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "retry:\n  max_attempts: 7").unwrap();

        let config = GenerationConfig::from_file(&path).unwrap();
        assert_eq!(config.retry.max_attempts, 7);
    }

    #[test]
    fn test_api_key_env_override() {
        std::env::set_var("CHALLENGE_FORGE_TEST_KEY", "sk-test");

        let config = GenerationConfig::default().with_api_key_from_env("CHALLENGE_FORGE_TEST_KEY");
        assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));

        let config = GenerationConfig::default().with_api_key_from_env("CHALLENGE_FORGE_UNSET");
        assert!(config.provider.api_key.is_none());

        std::env::remove_var("CHALLENGE_FORGE_TEST_KEY");
    }

    #[test]
    fn test_retry_delay_progression() {
        let policy = RetryPolicy {
            initial_delay_ms: 1000,
            backoff_multiplier: 2.0,
            max_delay_ms: 10000,
            jitter: 0.0,
            ..Default::default()
        };

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(4000));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(8000));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(10000)); // Capped
    }

    #[test]
    fn test_jitter_envelope() {
        let policy = RetryPolicy {
            initial_delay_ms: 1000,
            jitter: 0.5,
            ..Default::default()
        };

        for _ in 0..50 {
            let delay = policy.delay_for_attempt(1);
            assert!(delay >= Duration::from_millis(1000));
            assert!(delay <= Duration::from_millis(1500));
        }
    }

    #[test]
    fn test_should_retry_bound() {
        let policy = RetryPolicy {
            max_attempts: 3,
            ..Default::default()
        };

        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
        assert!(!policy.should_retry(4));
    }

    #[test]
    fn test_run_deadline() {
        let policy = RetryPolicy {
            max_attempts: 3,
            max_delay_ms: 1000,
            jitter: 0.0,
            ..Default::default()
        };

        let deadline = policy.run_deadline(Duration::from_secs(2));
        assert_eq!(deadline, Duration::from_secs(9)); // 3 x (2s + 1s)
    }
}
