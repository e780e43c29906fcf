// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket endpoint — per-connection join/command dispatch.
//!
//! Each connection gets a reader loop (this module) and a writer task that
//! owns the sink half, with an mpsc channel in between. The registry holds
//! clones of the channel's sender, so broadcasts never touch the socket
//! directly and a slow client cannot block anyone else.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::broadcast;
use crate::events::{ClientMessage, ServerEvent};
use crate::ingress;
use crate::registry::ConnectionSender;
use crate::state::RelayState;
use crate::transport::auth;

/// Query parameters for the WebSocket upgrade.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// The station binding a connection acquires at join time.
#[derive(Debug, Clone)]
pub struct Joined {
    pub station_id: String,
    pub user_id: i64,
}

/// Per-connection state: identity, outbound sender, and the binding set
/// once by the first successful join.
pub struct Connection {
    pub id: Uuid,
    pub sender: ConnectionSender,
    pub joined: Option<Joined>,
}

impl Connection {
    pub fn new(sender: ConnectionSender) -> Self {
        Self { id: Uuid::new_v4(), sender, joined: None }
    }
}

/// `GET /ws` — WebSocket upgrade for station clients.
pub async fn ws_handler(
    State(state): State<Arc<RelayState>>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    if auth::validate_ws_token(query.token.as_deref(), state.config.auth_token.as_deref()).is_err()
    {
        return axum::http::Response::builder()
            .status(401)
            .body(axum::body::Body::from("unauthorized"))
            .unwrap_or_default()
            .into_response();
    }

    ws.on_upgrade(move |socket| handle_connection(state, socket)).into_response()
}

/// Per-connection reader loop.
async fn handle_connection(state: Arc<RelayState>, socket: WebSocket) {
    let (ws_tx, mut ws_rx) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Message>();
    let mut conn = Connection::new(tx);

    tracing::debug!(conn_id = %conn.id, "websocket connected");

    let writer = tokio::spawn(writer_task(ws_tx, rx));

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => break,

            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_message(&state, &mut conn, &text).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(conn_id = %conn.id, err = %e, "websocket receive error");
                        break;
                    }
                    // Ping/pong are answered by axum; binary frames are not
                    // part of the protocol.
                    _ => {}
                }
            }
        }
    }

    writer.abort();
    on_close(&state, &conn).await;
    tracing::debug!(conn_id = %conn.id, "websocket disconnected");
}

/// Writer task: owns the sink half, drains the connection's outbound queue.
async fn writer_task(mut ws_tx: SplitSink<WebSocket, Message>, mut rx: mpsc::UnboundedReceiver<Message>) {
    while let Some(msg) = rx.recv().await {
        if ws_tx.send(msg).await.is_err() {
            break;
        }
    }
}

/// Dispatch one inbound text frame.
///
/// Malformed JSON, unknown message types, and frames with missing required
/// fields are logged and dropped; the connection stays open.
pub async fn handle_message(state: &Arc<RelayState>, conn: &mut Connection, text: &str) {
    let msg = match serde_json::from_str::<ClientMessage>(text) {
        Ok(msg) => msg,
        Err(e) => {
            tracing::debug!(conn_id = %conn.id, err = %e, "dropping unparseable frame");
            return;
        }
    };

    match msg {
        ClientMessage::Join { station_id, user_id } => {
            // First join wins. A second join is rejected outright rather
            // than silently re-registering under a new station.
            if let Some(joined) = conn.joined.as_ref() {
                tracing::debug!(
                    conn_id = %conn.id,
                    bound = %joined.station_id,
                    requested = %station_id,
                    "re-join rejected"
                );
                return;
            }

            state.registry.register(&station_id, conn.id, conn.sender.clone()).await;
            conn.joined = Some(Joined { station_id: station_id.clone(), user_id });
            tracing::info!(conn_id = %conn.id, station_id = %station_id, user_id, "joined station");

            broadcast::send_to(&conn.sender, &ServerEvent::Joined { station_id });
        }
        ClientMessage::Command { session_id, command, parameters } => {
            let Some(joined) = conn.joined.clone() else {
                tracing::debug!(conn_id = %conn.id, "command before join dropped");
                return;
            };

            ingress::handle_command(
                state,
                &joined.station_id,
                joined.user_id,
                session_id,
                command,
                parameters,
            )
            .await;
        }
    }
}

/// Deregister on disconnect. Idempotent: never-joined connections and
/// repeated calls are no-ops.
pub async fn on_close(state: &RelayState, conn: &Connection) {
    if let Some(joined) = conn.joined.as_ref() {
        state.registry.unregister(&joined.station_id, conn.id).await;
        tracing::debug!(conn_id = %conn.id, station_id = %joined.station_id, "connection unregistered");
    }
}
