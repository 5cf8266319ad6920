//! Shared Application State
//!
//! This module defines the `AppState` struct, which holds all shared,
//! clonable resources: the question generator seam, the settings store, and
//! the loaded configuration.

use std::sync::Arc;

use quizgen_core::generator::QuestionGenerator;

use crate::{config::Config, store::SettingsStore};

/// The shared application state, created once at startup and passed to all
/// handlers and WebSocket sessions.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn QuestionGenerator>,
    pub store: Arc<SettingsStore>,
    pub config: Arc<Config>,
}
