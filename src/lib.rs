//! challenge-forge - AI-assisted challenge generation pipeline
//!
//! Orchestrates the flow from learner preferences to a structured coding
//! challenge: validate -> build prompt -> call the provider -> parse ->
//! account for usage, with one telemetry event per stage transition.
//!
//! # Architecture
//!
//! - Errors are values: the orchestrator returns
//!   `Result<GenerationResult, PipelineError>` and nothing crosses its
//!   boundary as a panic
//! - The provider is a trait seam; retry, backoff, and per-attempt timeouts
//!   live in `ProviderClient`, so backends are swappable
//! - Telemetry is attached to state-machine transitions, and a sink failure
//!   never fails a run
//!
//! # Modules
//!
//! - `adapters`: Provider integrations (HTTP) and the retrying client
//! - `core`: Pipeline logic (Orchestrator, PromptBuilder, ResponseParser,
//!   UsageAccountant, errors)
//! - `domain`: Data structures (requests, challenges, metrics, events)
//! - `config`: Explicit configuration (provider, retry, pricing)
//! - `telemetry`: Event emission and sinks

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod telemetry;

// Re-export main types at crate root for convenience
pub use adapters::{HttpProvider, Provider, ProviderClient, ProviderResponse};
pub use config::{GenerationConfig, PriceTable, ProviderSettings, RetryPolicy};
pub use core::{
    GenerationOrchestrator, GenerationResult, ParseError, PipelineError, Prompt, PromptBuilder,
    ProviderError, ResponseParser, UsageAccountant, ValidationError,
};
pub use domain::{
    Difficulty, GeneratedChallenge, GenerationPreferences, GenerationRequest, PipelineStage,
    TelemetryEvent, TestCase, TokenCount, UsageMetrics,
};
pub use telemetry::{TelemetryEmitter, TelemetrySink, TracingSink};
