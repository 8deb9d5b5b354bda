//! The structured challenge produced by a successful pipeline run.

use serde::{Deserialize, Serialize};

/// A generated coding challenge.
///
/// Invariants (enforced by the response parser): every string field is
/// non-blank after trimming, and `hints` and `test_cases` are non-empty.
/// Ownership passes to the caller on pipeline completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedChallenge {
    /// Challenge title
    pub title: String,

    /// Full problem statement
    pub description: String,

    /// Worked example input
    pub example_input: String,

    /// Expected output for the worked example
    pub example_output: String,

    /// Input bounds and other constraints
    pub constraints: String,

    /// Ordered hints, from vaguest to most revealing
    pub hints: Vec<String>,

    /// Ordered test cases used to check a solution
    pub test_cases: Vec<TestCase>,
}

/// A single input/output test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}
