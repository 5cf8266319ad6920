//! Question generation against an OpenAI-compatible chat-completion API.
//!
//! The service contract is a single fire-and-forget call: one templated
//! prompt in, one ordered question batch out. No retry, no cache, no
//! streaming. The caller supplies the credential with every request.

use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use tracing::debug;

use crate::{
    error::GenerationError,
    extract,
    question::{GenerationRequest, QuestionRecord},
};

/// Default OpenAI-compatible endpoint (Groq).
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

const MAX_COMPLETION_TOKENS: u32 = 1500;
const SAMPLING_TEMPERATURE: f32 = 0.7;

/// Defines the contract for any service that can produce a question batch.
///
/// This is the seam the web service depends on, so the network-backed
/// implementation can be swapped for a deterministic one in tests and
/// development.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Produces an ordered question batch for one request.
    ///
    /// Returns either the complete batch or an error; never a partial set.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<QuestionRecord>, GenerationError>;
}

/// A `QuestionGenerator` backed by an OpenAI-compatible chat completion API.
pub struct LlmQuestionGenerator {
    api_base: String,
    model: String,
}

impl LlmQuestionGenerator {
    /// Creates a generator for the given endpoint and model.
    ///
    /// No client is held here: the caller's credential authenticates each
    /// call, so the client is rebuilt per request.
    pub fn new(api_base: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            model: model.into(),
        }
    }

    /// Single-turn instruction asking for exactly the requested batch, with
    /// the responder told to answer with nothing but the JSON array.
    fn build_prompt(request: &GenerationRequest) -> String {
        format!(
            "Generate {count} multiple choice quiz questions on the topic \"{topic}\". \
             Provide each question with 4 options (one correct answer and three wrong answers), \
             indicate the correct answer, and make difficulty level {difficulty}.\n\n\
             Format the response as a JSON array of objects with properties: \
             question (string), options (array of 4 strings), correct_answer (string).\n\
             Respond ONLY with JSON array.",
            count = request.count,
            topic = request.topic,
            difficulty = request.difficulty,
        )
    }
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<QuestionRecord>, GenerationError> {
        let config = OpenAIConfig::new()
            .with_api_key(&request.credential)
            .with_api_base(&self.api_base);
        let client = Client::with_config(config);

        debug!(
            topic = %request.topic,
            count = request.count,
            difficulty = %request.difficulty,
            model = %self.model,
            "requesting question batch"
        );

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestUserMessageArgs::default()
                    .content(Self::build_prompt(request))
                    .build()
                    .map_err(transport)?
                    .into(),
            ])
            .max_tokens(MAX_COMPLETION_TOKENS)
            .temperature(SAMPLING_TEMPERATURE)
            .build()
            .map_err(transport)?;

        let response = client.chat().create(chat_request).await.map_err(transport)?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| GenerationError::Transport {
                message: "generation service returned an empty completion".to_string(),
            })?;

        let batch = extract::parse_question_batch(&content)?;
        debug!(returned = batch.len(), "question batch accepted");
        Ok(batch)
    }
}

/// Maps a failed call onto the transport error kind, preferring the upstream
/// `error` message when the response body carried one.
fn transport(err: OpenAIError) -> GenerationError {
    let message = match err {
        OpenAIError::ApiError(api) => api.message,
        other => other.to_string(),
    };
    GenerationError::Transport { message }
}

/// A deterministic generator for development and tests.
///
/// Mirrors the requested count without touching the network; every record
/// satisfies the batch invariants.
pub struct StaticQuestionGenerator;

#[async_trait]
impl QuestionGenerator for StaticQuestionGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<QuestionRecord>, GenerationError> {
        Ok((1..=request.count)
            .map(|n| QuestionRecord {
                text: format!("Placeholder question {n} about {}", request.topic),
                options: vec![
                    format!("Answer A{n}"),
                    format!("Answer B{n}"),
                    format!("Answer C{n}"),
                    format!("Answer D{n}"),
                ],
                correct_option: format!("Answer A{n}"),
            })
            .collect())
    }
}
