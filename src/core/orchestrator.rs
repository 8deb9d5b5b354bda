//! Generation pipeline orchestrator.
//!
//! Owns the fixed state machine
//! `RECEIVED -> VALIDATED -> PROMPT_READY -> PROVIDER_CALLED -> PARSED ->
//! COMPLETED`, with `FAILED` reachable from any non-terminal state.
//! Telemetry is a side effect of transitions rather than inline calls: the
//! staged body returns a `Result`, and the single terminal event is emitted
//! at one join point, so exactly one of `Succeeded`/`Failed` goes out per
//! run no matter where a failure occurs.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::adapters::{HttpProvider, ProviderClient};
use crate::config::GenerationConfig;
use crate::domain::{
    GeneratedChallenge, GenerationPreferences, PipelineStage, TelemetryEvent, UsageMetrics,
};
use crate::telemetry::{TelemetryEmitter, TelemetrySink};

use super::error::PipelineError;
use super::parser::ResponseParser;
use super::prompt::PromptBuilder;
use super::usage::UsageAccountant;

/// The completed output of a pipeline run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Identifier assigned to this run at entry
    pub request_id: Uuid,

    /// The generated challenge, owned by the caller from here on
    pub challenge: GeneratedChallenge,

    /// Usage and cost metrics for the run
    pub usage: UsageMetrics,
}

/// Sequences the pipeline stages for one generation request.
///
/// Stateless across runs: every run is independent, and the only shared
/// collaborators are the telemetry sink and the client's atomic counters.
pub struct GenerationOrchestrator {
    client: ProviderClient,
    accountant: UsageAccountant,
    emitter: TelemetryEmitter,
}

impl GenerationOrchestrator {
    pub fn new(
        client: ProviderClient,
        accountant: UsageAccountant,
        emitter: TelemetryEmitter,
    ) -> Self {
        Self {
            client,
            accountant,
            emitter,
        }
    }

    /// Wire up the orchestrator from configuration with the HTTP provider.
    pub fn from_config(config: &GenerationConfig, sink: Arc<dyn TelemetrySink>) -> Self {
        let provider = Arc::new(HttpProvider::new(config.provider.clone()));
        let client = ProviderClient::new(
            provider,
            config.retry.clone(),
            config.provider.timeout(),
        );

        Self::new(
            client,
            UsageAccountant::new(config.pricing.clone()),
            TelemetryEmitter::new(sink),
        )
    }

    /// Run one generation pipeline.
    ///
    /// Returns the challenge with its usage metrics, or a classified
    /// `PipelineError`; nothing is thrown past this boundary. Dropping the
    /// future cancels the in-flight provider call and remaining retries.
    #[instrument(skip(self, preferences), fields(topic = %preferences.topic))]
    pub async fn generate_challenge(
        &self,
        preferences: GenerationPreferences,
    ) -> Result<GenerationResult, PipelineError> {
        let request_id = Uuid::new_v4();
        info!(%request_id, "Starting generation run");

        self.emitter
            .emit(
                TelemetryEvent::new(request_id, PipelineStage::RequestReceived)
                    .with_field("difficulty", preferences.difficulty.clone())
                    .with_field("topic", preferences.topic.clone()),
            )
            .await;

        let outcome = self.run_stages(request_id, &preferences).await;

        // The single terminal transition
        match &outcome {
            Ok(result) => {
                info!(
                    %request_id,
                    tokens = result.usage.tokens_used.get(),
                    latency_ms = result.usage.latency_ms,
                    "Generation run completed"
                );

                self.emitter
                    .emit(
                        TelemetryEvent::new(request_id, PipelineStage::Succeeded)
                            .with_field("title", result.challenge.title.clone())
                            .with_field("tokens_used", result.usage.tokens_used.get())
                            .with_field("latency_ms", result.usage.latency_ms),
                    )
                    .await;
            }
            Err(e) => {
                error!(%request_id, stage = e.stage(), error = %e, "Generation run failed");

                self.emitter
                    .emit(
                        TelemetryEvent::new(request_id, PipelineStage::Failed)
                            .with_field("stage", e.stage())
                            .with_field("error", e.to_string()),
                    )
                    .await;
            }
        }

        outcome
    }

    /// The non-terminal transitions. Any `Err` short-circuits straight to
    /// the terminal join point in `generate_challenge`.
    async fn run_stages(
        &self,
        request_id: Uuid,
        preferences: &GenerationPreferences,
    ) -> Result<GenerationResult, PipelineError> {
        // RECEIVED -> VALIDATED
        let request = preferences.validate()?;

        // VALIDATED -> PROMPT_READY (no failure path)
        let prompt = PromptBuilder::build(&request);
        self.emitter
            .emit(
                TelemetryEvent::new(request_id, PipelineStage::PromptSent)
                    .with_field("fingerprint", prompt.fingerprint().to_string())
                    .with_field("prompt_bytes", prompt.len() as u64),
            )
            .await;

        // PROMPT_READY -> PROVIDER_CALLED
        let started_at = Instant::now();
        let raw = self.client.invoke(&prompt).await?;
        let ended_at = Instant::now();

        // PROVIDER_CALLED -> PARSED
        let challenge = ResponseParser::parse(&raw)?;
        self.emitter
            .emit(
                TelemetryEvent::new(request_id, PipelineStage::ResponseReceived)
                    .with_field("model", raw.model.clone())
                    .with_field("payload_bytes", raw.content.len() as u64),
            )
            .await;

        // PARSED -> COMPLETED (no failure path)
        let usage = self.accountant.measure(&raw, started_at, ended_at);

        Ok(GenerationResult {
            request_id,
            challenge,
            usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::TracingSink;

    #[test]
    fn test_from_config_wiring() {
        let config = GenerationConfig::default();
        let orchestrator = GenerationOrchestrator::from_config(&config, Arc::new(TracingSink));

        // Deadline reflects the configured retry budget
        let expected = config.retry.run_deadline(config.provider.timeout());
        assert_eq!(orchestrator.client.run_deadline(), expected);
    }
}
