//! Core pipeline logic.
//!
//! This module contains:
//! - Error: The typed failure taxonomy
//! - Prompt: Deterministic prompt rendering
//! - Parser: Response decoding and schema validation
//! - Usage: Token and cost accounting
//! - Orchestrator: The generation state machine

pub mod error;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod usage;

// Re-export commonly used types
pub use error::{ParseError, PipelineError, ProviderError, ValidationError};
pub use orchestrator::{GenerationOrchestrator, GenerationResult};
pub use parser::ResponseParser;
pub use prompt::{Prompt, PromptBuilder};
pub use usage::UsageAccountant;
