// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command ingress — persists accepted commands and fans them out.
//!
//! The relay does not validate `command` or `parameters` beyond JSON
//! structure; command whitelisting belongs to the authorization layer
//! upstream of the socket.

use std::sync::Arc;

use chrono::Utc;

use crate::broadcast;
use crate::events::ServerEvent;
use crate::state::RelayState;
use crate::storage::{CommandEvent, STATUS_EXECUTED};
use crate::telemetry;

/// Accept one command from a joined connection.
///
/// Persists the command, broadcasts `command_executed` to the station, then
/// schedules the follow-up telemetry sample. Persistence is best-effort:
/// live viewers are served from the in-memory event, so a store failure is
/// logged and the broadcast proceeds.
pub async fn handle_command(
    state: &Arc<RelayState>,
    station_id: &str,
    user_id: i64,
    session_id: i64,
    command: String,
    parameters: serde_json::Value,
) {
    let event = CommandEvent {
        session_id,
        user_id,
        station_id: station_id.to_owned(),
        command: command.clone(),
        parameters: parameters.clone(),
        status: STATUS_EXECUTED.to_owned(),
    };

    if let Err(e) = state.command_store.persist_command(event).await {
        tracing::warn!(station_id, session_id, err = %e, "command persistence failed, broadcasting anyway");
    }

    let executed = ServerEvent::CommandExecuted { command, parameters, timestamp: Utc::now() };
    broadcast::send(&state.registry, station_id, &executed).await;

    // Scheduled strictly after the command broadcast, so every viewer sees
    // command_executed before the matching telemetry event.
    telemetry::schedule_sample(state, station_id.to_owned(), session_id);
}
