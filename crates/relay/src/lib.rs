// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stationd: command/telemetry relay for remote demo stations.
//!
//! Clients join a station over `/ws`, send operator commands, and receive
//! fan-out of command acknowledgements and synthetic telemetry. The
//! surrounding dashboard (CRUD, auth, layout editor) lives elsewhere; this
//! daemon only relays.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod events;
pub mod ingress;
pub mod registry;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod transport;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::RelayConfig;
use crate::state::RelayState;
use crate::transport::build_router;

/// Run the relay server until shutdown.
pub async fn run(config: RelayConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();
    let state = Arc::new(RelayState::new(config, shutdown.clone()));

    // Ctrl-c cancels the token so axum drains and telemetry tasks finish.
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    let router = build_router(Arc::clone(&state));
    let listener = TcpListener::bind(&addr).await?;

    if state.config.auth_token.is_some() {
        tracing::info!("stationd listening on {addr} (auth enabled)");
    } else {
        tracing::info!("stationd listening on {addr}");
    }

    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    // Let scheduled telemetry finish before exit.
    state.telemetry_tasks.close();
    state.telemetry_tasks.wait().await;

    Ok(())
}
