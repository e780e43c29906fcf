// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synthetic telemetry generation.
//!
//! Real deployments would stream sensor data back from the station
//! hardware; the relay stands in with one synthesized sample per accepted
//! command, emitted after a configurable delay.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;

use crate::broadcast;
use crate::events::ServerEvent;
use crate::state::RelayState;
use crate::storage::TelemetrySample;

/// Schedule the telemetry sample that follows an accepted command.
///
/// The task is tracked on the state's `TaskTracker` and runs to completion
/// even if the triggering connection closes first; broadcasting to a
/// station with no remaining viewers is a harmless no-op.
pub fn schedule_sample(state: &Arc<RelayState>, station_id: String, session_id: i64) {
    let state = Arc::clone(state);
    let delay = state.config.telemetry_delay();
    let tracker = state.telemetry_tasks.clone();
    tracker.spawn(async move {
        tokio::time::sleep(delay).await;

        let sample = synthesize(station_id.clone(), session_id);
        let event = ServerEvent::Telemetry {
            position: sample.position,
            velocity: sample.velocity,
            load: sample.load,
            timestamp: sample.timestamp,
        };

        if let Err(e) = state.telemetry_store.persist_telemetry(sample).await {
            tracing::warn!(station_id = %station_id, session_id, err = %e, "telemetry persistence failed, broadcasting anyway");
        }

        broadcast::send(&state.registry, &station_id, &event).await;
    });
}

/// One synthetic sample scoped to the triggering command's station/session.
fn synthesize(station_id: String, session_id: i64) -> TelemetrySample {
    let mut rng = rand::rng();
    let position = rng.random_range(0.0..360.0);
    let velocity = rng.random_range(-5.0..5.0);
    let load = rng.random_range(0.0..100.0);

    TelemetrySample {
        station_id,
        session_id,
        position,
        velocity,
        load,
        raw_data: serde_json::json!({
            "position": position,
            "velocity": velocity,
            "load": load,
            "source": "synthetic",
        }),
        timestamp: Utc::now(),
    }
}
