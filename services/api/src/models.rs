//! API Models
//!
//! This module defines the request/response bodies of the REST surface and
//! the presented choice sets for the settings screen. Everything here is
//! annotated for OpenAPI generation with `utoipa`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use quizgen_core::question::{Difficulty, QuestionRecord};

/// Topics offered on the settings screen.
pub const SUGGESTED_TOPICS: &[&str] = &[
    "General Knowledge",
    "Science",
    "Mathematics",
    "History",
    "Geography",
    "Computer Basics",
    "Artificial Intelligence",
    "Machine Learning",
    "JavaScript",
    "Python",
    "React",
];

/// Question counts offered on the settings screen. The generation contract
/// itself accepts any positive integer.
pub const QUESTION_COUNTS: &[u32] = &[10, 15, 20, 30];

/// Difficulty labels offered on the settings screen.
pub const DIFFICULTIES: &[Difficulty] =
    &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

/// Request body for a one-shot question generation call.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateQuestionsPayload {
    #[schema(example = "Mathematics")]
    pub topic: String,
    #[schema(example = 10)]
    pub count: u32,
    #[schema(value_type = String, example = "easy")]
    pub difficulty: Difficulty,
    /// Forwarded verbatim as the bearer credential; never validated here.
    #[schema(example = "gsk-...")]
    pub api_key: String,
}

/// One generated question as served to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionPayload {
    pub text: String,
    pub options: Vec<String>,
    pub correct_option: String,
}

impl From<QuestionRecord> for QuestionPayload {
    fn from(record: QuestionRecord) -> Self {
        Self {
            text: record.text,
            options: record.options,
            correct_option: record.correct_option,
        }
    }
}

/// Settings-screen bootstrap data.
#[derive(Debug, Serialize, ToSchema)]
pub struct SettingsResponse {
    /// Credential used for the most recently started quiz, if any.
    pub api_key: Option<String>,
    /// Stored identity object, passed through as-is.
    #[schema(value_type = Option<Object>)]
    pub user: Option<serde_json::Value>,
    pub suggested_topics: Vec<String>,
    pub question_counts: Vec<u32>,
    #[schema(value_type = Vec<String>)]
    pub difficulties: Vec<Difficulty>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}
