//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling HTTP requests: the
//! settings-screen bootstrap read and one-shot question generation. It uses
//! `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, warn};

use quizgen_core::question::GenerationRequest;

use crate::{
    models::{
        DIFFICULTIES, ErrorResponse, GenerateQuestionsPayload, QUESTION_COUNTS, QuestionPayload,
        SUGGESTED_TOPICS, SettingsResponse,
    },
    state::AppState,
};

pub enum ApiError {
    BadRequest(String),
    /// The generation service failed or answered unusably; the message is
    /// already user-facing (raw upstream text only ever hits the log).
    UpstreamFailed(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::UpstreamFailed(message) => {
                (StatusCode::BAD_GATEWAY, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

/// Fetch the settings-screen bootstrap data.
#[utoipa::path(
    get,
    path = "/settings",
    responses(
        (status = 200, description = "Stored credential, stored user, and presented choice sets", body = SettingsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsResponse>, ApiError> {
    // A damaged settings file should not break the settings screen; the
    // next started quiz rewrites it anyway.
    let stored = state.store.load().await.unwrap_or_else(|err| {
        warn!(error = ?err, "Settings document unreadable; serving defaults");
        Default::default()
    });

    Ok(Json(SettingsResponse {
        api_key: stored.api_key,
        user: stored.user,
        suggested_topics: SUGGESTED_TOPICS.iter().map(|s| s.to_string()).collect(),
        question_counts: QUESTION_COUNTS.to_vec(),
        difficulties: DIFFICULTIES.to_vec(),
    }))
}

/// Generate a question batch without opening a quiz session.
#[utoipa::path(
    post,
    path = "/quiz/generate",
    request_body = GenerateQuestionsPayload,
    responses(
        (status = 200, description = "The complete generated batch, in display order", body = [QuestionPayload]),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 502, description = "The generation service failed or answered unusably", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn generate_questions(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateQuestionsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let topic = payload.topic.trim();
    if topic.is_empty() {
        return Err(ApiError::BadRequest("topic must not be empty".to_string()));
    }
    if payload.count == 0 {
        return Err(ApiError::BadRequest(
            "count must be a positive integer".to_string(),
        ));
    }

    // Starting a quiz records the credential for next time.
    state.store.remember_credential(&payload.api_key).await?;

    let request = GenerationRequest {
        topic: topic.to_string(),
        credential: payload.api_key,
        count: payload.count,
        difficulty: payload.difficulty,
    };

    let questions = state.generator.generate(&request).await.map_err(|err| {
        warn!(%err, topic = %request.topic, "Question generation failed");
        ApiError::UpstreamFailed(err.to_string())
    })?;

    let body: Vec<QuestionPayload> = questions.into_iter().map(QuestionPayload::from).collect();
    Ok((StatusCode::OK, Json(body)))
}
