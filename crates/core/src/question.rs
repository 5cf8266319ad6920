//! Question data model and the mapping from the model's wire shape.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;

/// Every question carries exactly this many options: one correct, three wrong.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Requested difficulty for a generated question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

/// Input parameters controlling one question-generation call.
///
/// The credential is opaque: it is never validated here, only forwarded as a
/// bearer token to the generation service.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub topic: String,
    pub credential: String,
    pub count: u32,
    pub difficulty: Difficulty,
}

/// One multiple-choice question as accepted into a quiz.
///
/// Invariant: `correct_option` is byte-identical to exactly one entry of
/// `options`. Records that fail this are rejected at mapping time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub text: String,
    /// Display order, preserved exactly as received from the model.
    pub options: Vec<String>,
    pub correct_option: String,
}

/// Wire shape of one element of the model's JSON array.
#[derive(Debug, Deserialize)]
pub(crate) struct RawQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl TryFrom<RawQuestion> for QuestionRecord {
    type Error = GenerationError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        if raw.question.trim().is_empty() {
            return Err(GenerationError::schema("empty question text"));
        }
        if raw.options.len() != OPTIONS_PER_QUESTION {
            return Err(GenerationError::schema(format!(
                "expected {OPTIONS_PER_QUESTION} options, got {}",
                raw.options.len()
            )));
        }
        if raw.options.iter().any(|option| option.trim().is_empty()) {
            return Err(GenerationError::schema("empty option text"));
        }
        for (index, option) in raw.options.iter().enumerate() {
            if raw.options[..index].contains(option) {
                return Err(GenerationError::schema(format!(
                    "duplicate option: {option:?}"
                )));
            }
        }
        if !raw.options.contains(&raw.correct_answer) {
            return Err(GenerationError::schema(
                "correct answer is not one of the options",
            ));
        }

        Ok(QuestionRecord {
            text: raw.question,
            options: raw.options,
            correct_option: raw.correct_answer,
        })
    }
}
