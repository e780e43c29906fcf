// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence seams for commands and telemetry.
//!
//! The relay is a transport: it hands accepted commands and generated
//! samples to a store and moves on. The standalone daemon runs on the
//! in-memory implementation below; deployments embedding the relay inject
//! their database-backed stores through the same traits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Status assigned to every accepted command. The relay does not model a
/// pending/failed state machine.
pub const STATUS_EXECUTED: &str = "executed";

/// An accepted operator command, as handed to the command store.
#[derive(Debug, Clone)]
pub struct CommandEvent {
    pub session_id: i64,
    pub user_id: i64,
    pub station_id: String,
    pub command: String,
    pub parameters: serde_json::Value,
    pub status: String,
}

/// A persisted operator command.
#[derive(Debug, Clone)]
pub struct CommandRecord {
    pub id: i64,
    pub session_id: i64,
    pub user_id: i64,
    pub station_id: String,
    pub command: String,
    pub parameters: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// One synthetic telemetry sample, as handed to the telemetry store.
#[derive(Debug, Clone)]
pub struct TelemetrySample {
    pub station_id: String,
    pub session_id: i64,
    pub position: f64,
    pub velocity: f64,
    pub load: f64,
    pub raw_data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// A persisted telemetry sample.
#[derive(Debug, Clone)]
pub struct TelemetryRecord {
    pub id: i64,
    pub station_id: String,
    pub session_id: i64,
    pub position: f64,
    pub velocity: f64,
    pub load: f64,
    pub raw_data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

#[async_trait]
pub trait CommandStore: Send + Sync {
    /// Persist one accepted command, returning the stored record.
    async fn persist_command(&self, event: CommandEvent) -> anyhow::Result<CommandRecord>;
}

#[async_trait]
pub trait TelemetryStore: Send + Sync {
    /// Persist one telemetry sample, returning the stored record.
    async fn persist_telemetry(&self, sample: TelemetrySample) -> anyhow::Result<TelemetryRecord>;
}

/// In-memory store backing the standalone daemon and tests.
#[derive(Default)]
pub struct MemoryStore {
    commands: RwLock<Vec<CommandRecord>>,
    telemetry: RwLock<Vec<TelemetryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All persisted commands, in insertion order.
    pub async fn commands(&self) -> Vec<CommandRecord> {
        self.commands.read().await.clone()
    }

    /// All persisted telemetry samples, in insertion order.
    pub async fn telemetry(&self) -> Vec<TelemetryRecord> {
        self.telemetry.read().await.clone()
    }
}

#[async_trait]
impl CommandStore for MemoryStore {
    async fn persist_command(&self, event: CommandEvent) -> anyhow::Result<CommandRecord> {
        let mut commands = self.commands.write().await;
        let record = CommandRecord {
            id: commands.len() as i64 + 1,
            session_id: event.session_id,
            user_id: event.user_id,
            station_id: event.station_id,
            command: event.command,
            parameters: event.parameters,
            status: event.status,
            created_at: Utc::now(),
        };
        commands.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl TelemetryStore for MemoryStore {
    async fn persist_telemetry(&self, sample: TelemetrySample) -> anyhow::Result<TelemetryRecord> {
        let mut telemetry = self.telemetry.write().await;
        let record = TelemetryRecord {
            id: telemetry.len() as i64 + 1,
            station_id: sample.station_id,
            session_id: sample.session_id,
            position: sample.position,
            velocity: sample.velocity,
            load: sample.load,
            raw_data: sample.raw_data,
            timestamp: sample.timestamp,
        };
        telemetry.push(record.clone());
        Ok(record)
    }
}
