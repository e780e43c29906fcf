// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event fan-out to station members.

use axum::extract::ws::Message;

use crate::events::ServerEvent;
use crate::registry::{ConnectionSender, StationRegistry};

/// Send one event to every socket currently joined to a station.
///
/// The payload is serialized exactly once. Each send is independent and
/// best-effort: a connection that closed between snapshot and send is
/// skipped without affecting delivery to the rest. Returns the number of
/// sockets the event was delivered to.
pub async fn send(registry: &StationRegistry, station_id: &str, event: &ServerEvent) -> usize {
    let json = match serde_json::to_string(event) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(station_id, err = %e, "event serialization failed");
            return 0;
        }
    };

    let members = registry.snapshot(station_id).await;
    let mut delivered = 0;
    for sender in &members {
        if sender.send(Message::Text(json.clone().into())).is_ok() {
            delivered += 1;
        }
    }
    if delivered < members.len() {
        tracing::debug!(
            station_id,
            delivered,
            members = members.len(),
            "some sockets closed mid-broadcast"
        );
    }
    delivered
}

/// Send one event to a single socket.
pub fn send_to(sender: &ConnectionSender, event: &ServerEvent) {
    if let Ok(json) = serde_json::to_string(event) {
        let _ = sender.send(Message::Text(json.into()));
    }
}
