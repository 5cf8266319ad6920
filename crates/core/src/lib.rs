//! Core contracts of the quizgen system: generating a multiple-choice
//! question set from a chat-completion service and walking a user through it.
//!
//! The crate is runtime-agnostic. `generator` performs the one network call
//! behind a trait seam, `session` is a pure state machine, and everything
//! interactive (sockets, timers) lives in the service crate.

pub mod error;
pub mod extract;
pub mod generator;
pub mod question;
pub mod session;
