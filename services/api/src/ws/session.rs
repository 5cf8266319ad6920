//! Manages the WebSocket connection lifecycle for a quiz session.

use super::{
    driver::{Effect, QuizDriver},
    protocol::{ClientMessage, ServerMessage},
};
use crate::state::AppState;
use anyhow::Result;
use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use quizgen_core::{
    error::GenerationError,
    question::{GenerationRequest, QuestionRecord},
};
use std::{sync::Arc, time::Duration};
use tokio::{sync::mpsc, task::JoinHandle, time};
use tracing::{Instrument, debug, info, warn};
use uuid::Uuid;

/// Results of background work, tagged with the driver epoch they were
/// started under so the loop can discard what a restart made stale.
enum DriverEvent {
    Loaded {
        epoch: u64,
        result: Result<Vec<QuestionRecord>, GenerationError>,
    },
    DwellElapsed {
        epoch: u64,
    },
}

/// Axum handler to upgrade an HTTP connection to a WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Entry point for a new connection: sets up the session span and runs the
/// quiz loop until the client goes away.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let session_span = tracing::info_span!("quiz_session", %connection_id);
    async move {
        info!("New quiz connection");
        if let Err(e) = run_quiz_session(socket, state).await {
            warn!(error = ?e, "Quiz session terminated with error");
        }
        info!("Quiz connection closed");
    }
    .instrument(session_span)
    .await
}

/// The main event loop for an active quiz connection.
///
/// Client messages and background results (generation, dwell expiry) are
/// serialized through one loop, so no two operations ever race on the same
/// quiz state. Teardown aborts the in-flight generation; expired dwell
/// timers are epoch-guarded instead.
async fn run_quiz_session(socket: WebSocket, state: Arc<AppState>) -> Result<()> {
    let (mut socket_tx, mut socket_rx) = socket.split();
    let (event_tx, mut event_rx) = mpsc::channel::<DriverEvent>(8);
    let mut driver = QuizDriver::new();
    let mut generation_task: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            Some(msg_result) = socket_rx.next() => {
                let ws_msg = match msg_result {
                    Ok(ws_msg) => ws_msg,
                    Err(e) => {
                        warn!("Error receiving from client WebSocket: {:?}", e);
                        break;
                    }
                };
                match ws_msg {
                    Message::Text(text) => {
                        let Ok(msg) = serde_json::from_str::<ClientMessage>(&text) else {
                            warn!("Ignoring unreadable client message");
                            continue;
                        };
                        match msg {
                            ClientMessage::Start { topic, count, difficulty, api_key } => {
                                let topic = topic.trim().to_string();
                                if topic.is_empty() || count == 0 {
                                    let message = "a topic and a positive question count are required".to_string();
                                    send_msg(&mut socket_tx, ServerMessage::Error { message }).await?;
                                    continue;
                                }

                                // Starting a quiz records the credential for
                                // next time; a store failure must not block
                                // the quiz itself.
                                if let Err(e) = state.store.remember_credential(&api_key).await {
                                    warn!(error = ?e, "Failed to persist credential");
                                }

                                // One in-flight generation per connection:
                                // a new start supersedes the old call.
                                if let Some(handle) = generation_task.take() {
                                    handle.abort();
                                }
                                let (message, effect) = driver.start();
                                send_msg(&mut socket_tx, message).await?;
                                if let Effect::SpawnGeneration { epoch } = effect {
                                    let request = GenerationRequest {
                                        topic,
                                        credential: api_key,
                                        count,
                                        difficulty,
                                    };
                                    generation_task = Some(spawn_generation(
                                        state.clone(),
                                        request,
                                        epoch,
                                        event_tx.clone(),
                                    ));
                                }
                            }
                            ClientMessage::Answer { option } => {
                                if let Some((message, Effect::ScheduleDwell { epoch })) =
                                    driver.answer(&option)
                                {
                                    send_msg(&mut socket_tx, message).await?;
                                    spawn_dwell(state.config.feedback_dwell, epoch, event_tx.clone());
                                }
                            }
                            ClientMessage::Restart => {
                                if let Some(handle) = generation_task.take() {
                                    handle.abort();
                                }
                                driver.restart();
                                debug!("Quiz discarded; awaiting new settings");
                            }
                        }
                    }
                    Message::Close(_) => {
                        info!("Client sent close frame. Shutting down session.");
                        break;
                    }
                    Message::Binary(_) => warn!("Ignoring unexpected binary message"),
                    Message::Ping(_) | Message::Pong(_) => {}
                }
            },
            Some(event) = event_rx.recv() => {
                let message = match event {
                    DriverEvent::Loaded { epoch, result } => driver.loaded(epoch, result),
                    DriverEvent::DwellElapsed { epoch } => driver.dwell_elapsed(epoch),
                };
                if let Some(message) = message {
                    send_msg(&mut socket_tx, message).await?;
                }
            },
            // If all channels close, exit the loop.
            else => break,
        }
    }

    // Clean up the in-flight generation on exit.
    if let Some(handle) = generation_task.take() {
        handle.abort();
    }
    Ok(())
}

/// Runs the generation call on its own task so the loop stays responsive to
/// restarts and disconnects while the network call is in flight.
fn spawn_generation(
    state: Arc<AppState>,
    request: GenerationRequest,
    epoch: u64,
    events: mpsc::Sender<DriverEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = state.generator.generate(&request).await;
        if events.send(DriverEvent::Loaded { epoch, result }).await.is_err() {
            debug!("Quiz connection went away before generation finished");
        }
    })
}

/// Schedules the feedback dwell. The timer is never cancelled; its expiry is
/// epoch-guarded by the driver instead.
fn spawn_dwell(dwell: Duration, epoch: u64, events: mpsc::Sender<DriverEvent>) {
    tokio::spawn(async move {
        time::sleep(dwell).await;
        let _ = events.send(DriverEvent::DwellElapsed { epoch }).await;
    });
}

/// A helper function to serialize and send a `ServerMessage` to the client.
async fn send_msg(
    socket_tx: &mut SplitSink<WebSocket, Message>,
    msg: ServerMessage,
) -> Result<()> {
    let serialized = serde_json::to_string(&msg)?;
    socket_tx.send(Message::Text(serialized.into())).await?;
    Ok(())
}
