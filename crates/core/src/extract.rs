//! Extraction of a JSON question array from free-form model output.
//!
//! The generation service is not trusted to answer with pure JSON; responses
//! are regularly wrapped in prose or code fences. The array is located by
//! pattern search (first `[` to the last `]`) and parsed as a separate step
//! with its own error kind, so the whole module can later be swapped for a
//! structured-output mode without touching the session logic.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::{
    error::GenerationError,
    question::{QuestionRecord, RawQuestion},
};

/// Greedy match from the first `[` to the last `]`, across newlines.
static ARRAY_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("array span pattern"));

/// Parses a full model response into an ordered question batch.
///
/// The raw text is written to the diagnostic log on failure; callers must
/// surface only the returned error to end users.
pub fn parse_question_batch(text: &str) -> Result<Vec<QuestionRecord>, GenerationError> {
    let Some(span) = ARRAY_SPAN.find(text) else {
        debug!(raw = %text, "model response contained no JSON array");
        return Err(GenerationError::Parse("no array found"));
    };

    let value: serde_json::Value = serde_json::from_str(span.as_str()).map_err(|err| {
        debug!(raw = %text, %err, "bracketed span was not valid JSON");
        GenerationError::Parse("invalid JSON")
    })?;

    let raw_batch: Vec<RawQuestion> = serde_json::from_value(value).map_err(|err| {
        debug!(raw = %text, %err, "question array did not match the expected shape");
        GenerationError::schema(err.to_string())
    })?;

    raw_batch.into_iter().map(QuestionRecord::try_from).collect()
}
