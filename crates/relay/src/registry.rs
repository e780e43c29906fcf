// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection registry — maps a station ID to the live sockets subscribed
//! to it.
//!
//! The registry holds only the cloneable sender half of each connection's
//! outbound channel; the socket itself is owned by its connection task.
//! Entries are created lazily on first join and removed when the last
//! member leaves, so an absent key and an empty station are the same thing.

use std::collections::HashMap;

use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Sender half of a connection's outbound message channel.
pub type ConnectionSender = mpsc::UnboundedSender<Message>;

/// Registry of live connections per station.
///
/// Constructed per [`crate::state::RelayState`], never process-global, so
/// tests get a fresh instance with a deterministic lifecycle.
#[derive(Default)]
pub struct StationRegistry {
    stations: RwLock<HashMap<String, HashMap<Uuid, ConnectionSender>>>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection under a station, creating the entry if absent.
    pub async fn register(&self, station_id: &str, conn_id: Uuid, sender: ConnectionSender) {
        let mut stations = self.stations.write().await;
        stations.entry(station_id.to_owned()).or_default().insert(conn_id, sender);
    }

    /// Remove a connection from a station. Idempotent: unknown stations and
    /// already-removed connections are no-ops. Drops the station entry when
    /// its member set empties.
    pub async fn unregister(&self, station_id: &str, conn_id: Uuid) {
        let mut stations = self.stations.write().await;
        if let Some(members) = stations.get_mut(station_id) {
            members.remove(&conn_id);
            if members.is_empty() {
                stations.remove(station_id);
            }
        }
    }

    /// Senders registered for a station at the time of the call.
    pub async fn snapshot(&self, station_id: &str) -> Vec<ConnectionSender> {
        let stations = self.stations.read().await;
        stations.get(station_id).map(|m| m.values().cloned().collect()).unwrap_or_default()
    }

    /// Number of stations with at least one live connection.
    pub async fn station_count(&self) -> usize {
        self.stations.read().await.len()
    }

    /// Total live connections across all stations.
    pub async fn connection_count(&self) -> usize {
        self.stations.read().await.values().map(HashMap::len).sum()
    }

    /// `(station id, viewer count)` pairs for all live stations.
    pub async fn stations(&self) -> Vec<(String, usize)> {
        let stations = self.stations.read().await;
        stations.iter().map(|(id, members)| (id.clone(), members.len())).collect()
    }

    /// Viewer count for one station, if it has any live connections.
    pub async fn viewers(&self, station_id: &str) -> Option<usize> {
        self.stations.read().await.get(station_id).map(HashMap::len)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
