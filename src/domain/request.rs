//! Learner generation preferences and their validation.
//!
//! `GenerationPreferences` is the raw, untrusted caller input. Validation
//! normalizes it into a `GenerationRequest` before any downstream stage
//! touches it. Pure functions, no I/O.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::ValidationError;

/// Maximum length of any free-text preference field, in characters, after
/// trimming.
pub const MAX_FIELD_LEN: usize = 256;

/// Raw generation preferences as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationPreferences {
    /// Requested difficulty ("easy", "medium", "hard", any casing)
    pub difficulty: String,

    /// Challenge category (e.g., "algorithms")
    pub category: String,

    /// Target programming language for the challenge
    pub language: String,

    /// Topic the challenge should cover
    pub topic: String,
}

impl GenerationPreferences {
    /// Validate and normalize the preferences into a `GenerationRequest`.
    ///
    /// Difficulty is matched case-insensitively; text fields are trimmed and
    /// must be non-empty and at most `MAX_FIELD_LEN` characters.
    pub fn validate(&self) -> Result<GenerationRequest, ValidationError> {
        let difficulty = Difficulty::parse(&self.difficulty).ok_or_else(|| {
            ValidationError::UnknownDifficulty {
                value: self.difficulty.trim().to_string(),
            }
        })?;

        Ok(GenerationRequest {
            difficulty,
            category: checked_field("category", &self.category)?,
            language: checked_field("language", &self.language)?,
            topic: checked_field("topic", &self.topic)?,
        })
    }
}

fn checked_field(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }

    // Cap is in characters, not bytes, so multibyte input is not penalized
    let len = trimmed.chars().count();
    if len > MAX_FIELD_LEN {
        return Err(ValidationError::FieldTooLong {
            field,
            len,
            max: MAX_FIELD_LEN,
        });
    }

    Ok(trimmed.to_string())
}

/// Challenge difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a difficulty, case-insensitively. Returns `None` for anything
    /// outside the three levels.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }

    /// Normalized lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, normalized generation request.
///
/// Immutable once produced; owned by the pipeline run that created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub difficulty: Difficulty,
    pub category: String,
    pub language: String,
    pub topic: String,
}
