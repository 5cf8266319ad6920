//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API, WebSocket endpoint, and OpenAPI documentation.

use crate::{
    handlers,
    models::{ErrorResponse, GenerateQuestionsPayload, QuestionPayload, SettingsResponse},
    state::AppState,
    ws::ws_handler,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_settings, handlers::generate_questions),
    components(
        schemas(SettingsResponse, GenerateQuestionsPayload, QuestionPayload, ErrorResponse)
    ),
    tags(
        (name = "Quizgen API", description = "LLM-backed multiple-choice quiz generation and sessions")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Group all routes that require AppState into their own router.
    let api_router = Router::new()
        .route("/settings", get(handlers::get_settings))
        .route("/quiz/generate", post(handlers::generate_questions))
        .route("/ws", get(ws_handler))
        // Apply the state ONLY to this group of routes.
        .with_state(app_state);

    // Merge the stateful routes with the stateless Swagger UI routes.
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
