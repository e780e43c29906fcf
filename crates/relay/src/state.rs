// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::RelayConfig;
use crate::registry::StationRegistry;
use crate::storage::{CommandStore, MemoryStore, TelemetryStore};

/// Shared relay state.
pub struct RelayState {
    pub registry: StationRegistry,
    pub command_store: Arc<dyn CommandStore>,
    pub telemetry_store: Arc<dyn TelemetryStore>,
    pub config: RelayConfig,
    pub shutdown: CancellationToken,
    /// In-flight deferred telemetry tasks; closed and awaited at shutdown so
    /// scheduled samples finish instead of racing process exit.
    pub telemetry_tasks: TaskTracker,
}

impl RelayState {
    /// State backed by a fresh in-memory store (standalone daemon, tests).
    pub fn new(config: RelayConfig, shutdown: CancellationToken) -> Self {
        let store = Arc::new(MemoryStore::new());
        let command_store: Arc<dyn CommandStore> = store.clone();
        let telemetry_store: Arc<dyn TelemetryStore> = store;
        Self::with_stores(config, shutdown, command_store, telemetry_store)
    }

    /// State with injected persistence collaborators.
    pub fn with_stores(
        config: RelayConfig,
        shutdown: CancellationToken,
        command_store: Arc<dyn CommandStore>,
        telemetry_store: Arc<dyn TelemetryStore>,
    ) -> Self {
        Self {
            registry: StationRegistry::new(),
            command_store,
            telemetry_store,
            config,
            shutdown,
            telemetry_tasks: TaskTracker::new(),
        }
    }
}
