//! Telemetry emission for pipeline stage transitions.
//!
//! The sink is an external collaborator and the only thing that outlives a
//! run. Observability must never become a reliability hazard: a sink error
//! is logged locally and swallowed, never propagated as a pipeline failure.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::TelemetryEvent;

/// Destination for pipeline telemetry events.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Record one event. Failures are the sink's problem, not the run's.
    async fn record(&self, event: &TelemetryEvent) -> Result<()>;
}

/// Emits stage events to a sink without ever failing the pipeline.
#[derive(Clone)]
pub struct TelemetryEmitter {
    sink: Arc<dyn TelemetrySink>,
}

impl TelemetryEmitter {
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self { sink }
    }

    /// Emit one event. Sink errors are logged and swallowed.
    pub async fn emit(&self, event: TelemetryEvent) {
        if let Err(e) = self.sink.record(&event).await {
            warn!(
                stage = ?event.stage,
                request_id = %event.request_id,
                error = %e,
                "Telemetry sink failed, dropping event"
            );
        }
    }
}

/// Default sink that writes events to the tracing log as JSON.
pub struct TracingSink;

#[async_trait]
impl TelemetrySink for TracingSink {
    async fn record(&self, event: &TelemetryEvent) -> Result<()> {
        let payload = serde_json::to_string(&event.payload)?;
        debug!(
            stage = ?event.stage,
            request_id = %event.request_id,
            timestamp = %event.timestamp,
            %payload,
            "Pipeline telemetry"
        );
        Ok(())
    }
}
