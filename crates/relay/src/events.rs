// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-format message types for the station relay.
//!
//! All frames are JSON text over a single `/ws` connection. Inbound frames
//! parse into [`ClientMessage`]; outbound frames serialize from
//! [`ServerEvent`]. The dashboard frontend speaks camelCase field names, so
//! both enums rename accordingly. Unknown tags and missing required fields
//! fail deserialization and the frame is dropped by the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Messages accepted from a connected client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe this socket to a station's event stream.
    #[serde(rename_all = "camelCase")]
    Join { station_id: String, user_id: i64 },
    /// An operator command for the previously joined station.
    #[serde(rename_all = "camelCase")]
    Command {
        session_id: i64,
        command: String,
        #[serde(default = "empty_parameters")]
        parameters: serde_json::Value,
    },
}

fn empty_parameters() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Events pushed to clients joined to a station.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Join acknowledgement, sent to the joining socket only.
    #[serde(rename_all = "camelCase")]
    Joined { station_id: String },
    /// A command was accepted and relayed to the station.
    CommandExecuted {
        command: String,
        parameters: serde_json::Value,
        timestamp: DateTime<Utc>,
    },
    /// Synthetic hardware feedback following a command.
    Telemetry { position: f64, velocity: f64, load: f64, timestamp: DateTime<Utc> },
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
