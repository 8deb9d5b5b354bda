//! Domain types for the challenge generation pipeline.
//!
//! This module contains the core data structures:
//! - Request: Learner preferences and their validated form
//! - Challenge: The structured challenge a run produces
//! - Usage: Token/cost/latency metrics
//! - Events: Immutable telemetry records of stage transitions

pub mod challenge;
pub mod events;
pub mod request;
pub mod usage;

// Re-export commonly used types
pub use challenge::{GeneratedChallenge, TestCase};
pub use events::{PipelineStage, TelemetryEvent};
pub use request::{Difficulty, GenerationPreferences, GenerationRequest};
pub use usage::{TokenCount, UsageMetrics};
