//! Response diagnostics.
//!
//! Anomalies found while scoring are reported as data alongside the result
//! rather than as errors, so a caller can always render what was scored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A response that was excluded from scoring, and why.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Diagnostic {
    /// The value does not match the question's declared shape.
    #[error("malformed response for {question_id}: expected {expected}, got {found}")]
    MalformedResponse {
        question_id: String,
        expected: String,
        found: String,
    },

    /// The response names a question the catalog does not contain.
    #[error("response references unknown question {question_id}")]
    UnknownQuestionReference { question_id: String },
}

impl Diagnostic {
    pub fn malformed(
        question_id: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Diagnostic::MalformedResponse {
            question_id: question_id.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unknown(question_id: impl Into<String>) -> Self {
        Diagnostic::UnknownQuestionReference {
            question_id: question_id.into(),
        }
    }

    /// The question id this diagnostic refers to.
    pub fn question_id(&self) -> &str {
        match self {
            Diagnostic::MalformedResponse { question_id, .. }
            | Diagnostic::UnknownQuestionReference { question_id } => question_id,
        }
    }

    /// Returns `true` if the response likely came from an older catalog version.
    pub fn is_stale_reference(&self) -> bool {
        matches!(self, Diagnostic::UnknownQuestionReference { .. })
    }
}
