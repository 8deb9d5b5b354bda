//! Deterministic prompt rendering.
//!
//! A prompt is built once per run from the validated request and never
//! reused across runs. Identical requests yield byte-identical text, which
//! the fingerprint makes cheap to assert (and usable as a cache key later).

use sha2::{Digest, Sha256};

use crate::domain::GenerationRequest;

/// A rendered provider prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    text: String,
    fingerprint: String,
}

impl Prompt {
    /// The prompt text sent to the provider
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Hex-encoded sha-256 of the prompt text
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Prompt size in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Builds provider prompts from validated requests.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render the prompt for a request. Deterministic, no side effects, no
    /// failure path (the request is already validated).
    pub fn build(request: &GenerationRequest) -> Prompt {
        let text = format!(
            "Generate a {difficulty} coding challenge in the {category} category.\n\
             Target language: {language}. Topic: {topic}.\n\
             Respond with a single JSON object containing exactly these fields: \
             title, description, exampleInput, exampleOutput, constraints, \
             hints (an array of strings, at least one), and testCases (an array \
             of objects with input and expectedOutput, at least one). \
             Do not include any text outside the JSON object.",
            difficulty = request.difficulty,
            category = request.category,
            language = request.language,
            topic = request.topic,
        );

        let fingerprint = hex::encode(Sha256::digest(text.as_bytes()));

        Prompt { text, fingerprint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Difficulty;

    fn request() -> GenerationRequest {
        GenerationRequest {
            difficulty: Difficulty::Medium,
            category: "algorithms".to_string(),
            language: "JavaScript".to_string(),
            topic: "binary search".to_string(),
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        let first = PromptBuilder::build(&request());
        let second = PromptBuilder::build(&request());

        assert_eq!(first.text(), second.text());
        assert_eq!(first.fingerprint(), second.fingerprint());
    }

    #[test]
    fn test_prompt_names_all_preferences() {
        let prompt = PromptBuilder::build(&request());

        assert!(prompt.text().contains("medium"));
        assert!(prompt.text().contains("algorithms"));
        assert!(prompt.text().contains("JavaScript"));
        assert!(prompt.text().contains("binary search"));
    }

    #[test]
    fn test_different_topics_differ() {
        let base = PromptBuilder::build(&request());

        let mut other_request = request();
        other_request.topic = "quicksort".to_string();
        let other = PromptBuilder::build(&other_request);

        assert_ne!(base.text(), other.text());
        assert_ne!(base.fingerprint(), other.fingerprint());
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let prompt = PromptBuilder::build(&request());

        assert_eq!(prompt.fingerprint().len(), 64);
        assert!(prompt.fingerprint().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
