//! Defines the WebSocket message protocol between the quiz client and the server.

use serde::{Deserialize, Serialize};

use quizgen_core::{question::Difficulty, session::AnswerOutcome};

/// Messages sent from the client (browser) to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Carries a full generation request and starts a fresh quiz,
    /// superseding any quiz already running on this connection.
    Start {
        topic: String,
        count: u32,
        difficulty: Difficulty,
        /// Forwarded verbatim as the bearer credential.
        api_key: String,
    },
    /// Selects one option for the question on display.
    Answer { option: String },
    /// Discards the current quiz so the client can collect new settings.
    Restart,
}

/// Messages sent from the server to the client (browser).
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Question generation is in flight.
    Loading,
    /// The question at `index` is on display; a selection is expected.
    Question {
        index: usize,
        total: usize,
        text: String,
        options: Vec<String>,
        score: u32,
    },
    /// The selection was scored. `correct_option` accompanies an incorrect
    /// outcome so the client can show what the right answer was.
    Feedback {
        outcome: AnswerOutcome,
        #[serde(skip_serializing_if = "Option::is_none")]
        correct_option: Option<String>,
        score: u32,
    },
    /// The walk is over; final tally for the results screen.
    Finished { score: u32, total: usize, percent: u32 },
    /// The current load failed. Terminal until the client restarts.
    Error { message: String },
}
