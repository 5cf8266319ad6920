//! Quizgen API Library Crate
//!
//! This library contains all the logic for the quizgen web service: the
//! application state, configuration, settings store, REST handlers,
//! WebSocket quiz driver, and routing. The binaries are thin wrappers
//! around this library.

pub mod config;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
pub mod store;
pub mod ws;
