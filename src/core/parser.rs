//! Parsing and schema validation of provider responses.
//!
//! Decoding is split from validation the same way pipeline loading splits
//! `from_yaml` from `validate`: first turn the payload into a lenient raw
//! shape, then walk every field so schema failures can name the offending
//! wire field instead of surfacing as an opaque decode error.

use serde::Deserialize;

use crate::adapters::ProviderResponse;
use crate::domain::{GeneratedChallenge, TestCase};

use super::error::ParseError;

/// Lenient decode target; presence is checked field by field afterwards.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChallenge {
    title: Option<String>,
    description: Option<String>,
    example_input: Option<String>,
    example_output: Option<String>,
    constraints: Option<String>,
    hints: Option<Vec<String>>,
    test_cases: Option<Vec<RawTestCase>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTestCase {
    input: Option<String>,
    expected_output: Option<String>,
}

/// Parses raw provider output into a `GeneratedChallenge`.
pub struct ResponseParser;

impl ResponseParser {
    /// Decode and schema-validate a provider response.
    ///
    /// Pure function over its input. Fails with `ParseError::Malformed` when
    /// the payload is not JSON, or `ParseError::SchemaViolation` naming the
    /// first missing/blank field.
    pub fn parse(raw: &ProviderResponse) -> Result<GeneratedChallenge, ParseError> {
        let payload = strip_code_fence(&raw.content);

        let raw_challenge: RawChallenge =
            serde_json::from_str(payload).map_err(|source| ParseError::Malformed { source })?;

        let hints = required_list("hints", raw_challenge.hints)?;
        let hints = hints
            .into_iter()
            .enumerate()
            .map(|(i, hint)| required_text(format!("hints[{}]", i), Some(hint)))
            .collect::<Result<Vec<_>, _>>()?;

        let raw_cases = required_list("testCases", raw_challenge.test_cases)?;
        let test_cases = raw_cases
            .into_iter()
            .enumerate()
            .map(|(i, case)| {
                Ok(TestCase {
                    input: required_text(format!("testCases[{}].input", i), case.input)?,
                    expected_output: required_text(
                        format!("testCases[{}].expectedOutput", i),
                        case.expected_output,
                    )?,
                })
            })
            .collect::<Result<Vec<_>, ParseError>>()?;

        Ok(GeneratedChallenge {
            title: required_text("title".to_string(), raw_challenge.title)?,
            description: required_text("description".to_string(), raw_challenge.description)?,
            example_input: required_text("exampleInput".to_string(), raw_challenge.example_input)?,
            example_output: required_text(
                "exampleOutput".to_string(),
                raw_challenge.example_output,
            )?,
            constraints: required_text("constraints".to_string(), raw_challenge.constraints)?,
            hints,
            test_cases,
        })
    }
}

/// Providers routinely wrap JSON in a markdown fence; strip one if present.
/// An unclosed fence is left intact and surfaces as `Malformed` downstream.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        if let Some(inner) = rest.strip_suffix("```") {
            return inner.trim();
        }
    }

    trimmed
}

fn required_text(field: String, value: Option<String>) -> Result<String, ParseError> {
    let value = value.ok_or_else(|| ParseError::SchemaViolation {
        field: field.clone(),
        reason: "is missing",
    })?;

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ParseError::SchemaViolation {
            field,
            reason: "is blank",
        });
    }

    Ok(trimmed.to_string())
}

fn required_list<T>(field: &str, value: Option<Vec<T>>) -> Result<Vec<T>, ParseError> {
    let value = value.ok_or_else(|| ParseError::SchemaViolation {
        field: field.to_string(),
        reason: "is missing",
    })?;

    if value.is_empty() {
        return Err(ParseError::SchemaViolation {
            field: field.to_string(),
            reason: "is empty",
        });
    }

    Ok(value)
}
