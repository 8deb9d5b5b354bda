//! Telemetry events for pipeline stage transitions.
//!
//! One append-only sequence of events exists per run, keyed by the run's
//! request id. Events are never mutated after emission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The five fixed telemetry points of a pipeline run.
///
/// Exactly one of `Succeeded`/`Failed` is emitted per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// A generation request entered the pipeline
    RequestReceived,

    /// The rendered prompt was handed to the provider client
    PromptSent,

    /// The provider's response was received and parsed
    ResponseReceived,

    /// Terminal: the run produced a challenge
    Succeeded,

    /// Terminal: the run failed at some stage
    Failed,
}

impl PipelineStage {
    /// Whether this stage ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// A single structured, timestamped telemetry event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Unique identifier for this event
    pub id: Uuid,

    /// When this event was emitted
    pub timestamp: DateTime<Utc>,

    /// The pipeline run this event belongs to
    pub request_id: Uuid,

    /// Stage transition the event records
    pub stage: PipelineStage,

    /// Structured context (string keys to JSON values, NO secrets)
    pub payload: Map<String, Value>,
}

impl TelemetryEvent {
    /// Create a new event with the current timestamp and an empty payload
    pub fn new(request_id: Uuid, stage: PipelineStage) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            request_id,
            stage,
            payload: Map::new(),
        }
    }

    /// Attach a payload field
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }
}
