//! WebSocket Quiz Sessions
//!
//! This module contains the logic for walking a client through a generated
//! quiz over a WebSocket. It is structured into submodules for clarity:
//!
//! - `protocol`: Defines the JSON-based message format for client-server communication.
//! - `driver`: Socket-free transition logic, including the session epoch guard.
//! - `session`: Manages the connection lifecycle, wiring sockets, tasks, and timers.

mod driver;
pub mod protocol;
pub mod session;

pub use session::ws_handler;
