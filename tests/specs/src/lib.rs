// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end test harness for the station relay.
//!
//! Binds the real axum router on an ephemeral port inside the test process
//! and drives it over real WebSockets with tokio-tungstenite, so the full
//! upgrade/join/command/telemetry path is exercised without racing an
//! external binary.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use stationd::config::RelayConfig;
use stationd::state::RelayState;
use stationd::storage::{CommandStore, MemoryStore, TelemetryStore};
use stationd::transport::build_router;

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A relay server running in-process on an ephemeral port.
pub struct RelayServer {
    pub port: u16,
    pub state: Arc<RelayState>,
    pub store: Arc<MemoryStore>,
    shutdown: CancellationToken,
}

impl RelayServer {
    /// Start with the default test config: no auth, 25ms telemetry delay.
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(|_| {}).await
    }

    pub async fn start_with(tweak: impl FnOnce(&mut RelayConfig)) -> anyhow::Result<Self> {
        let mut config = RelayConfig {
            host: "127.0.0.1".to_owned(),
            port: 0,
            auth_token: None,
            telemetry_delay_ms: 25,
        };
        tweak(&mut config);

        let shutdown = CancellationToken::new();
        let store = Arc::new(MemoryStore::new());
        let command_store: Arc<dyn CommandStore> = store.clone();
        let telemetry_store: Arc<dyn TelemetryStore> = store.clone();
        let state = Arc::new(RelayState::with_stores(
            config,
            shutdown.clone(),
            command_store,
            telemetry_store,
        ));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        let router = build_router(Arc::clone(&state));
        let server_shutdown = shutdown.clone();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router)
                .with_graceful_shutdown(server_shutdown.cancelled_owned())
                .await;
        });

        Ok(Self { port, state, store, shutdown })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://127.0.0.1:{}/ws", self.port)
    }

    /// Open a client socket against `/ws`.
    pub async fn connect(&self) -> anyhow::Result<WsClient> {
        let (ws, _) = tokio_tungstenite::connect_async(self.ws_url()).await?;
        Ok(ws)
    }

    /// Wait until the registry settles at `count` live connections.
    pub async fn wait_for_connections(&self, count: usize) -> anyhow::Result<()> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            if self.state.registry.connection_count().await == count {
                return Ok(());
            }
            if tokio::time::Instant::now() > deadline {
                anyhow::bail!("registry never reached {count} connections");
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Drop for RelayServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Send one JSON value as a text frame.
pub async fn send_json(ws: &mut WsClient, value: &serde_json::Value) -> anyhow::Result<()> {
    ws.send(Message::Text(value.to_string().into())).await?;
    Ok(())
}

/// Receive the next text frame as JSON, with a timeout.
pub async fn recv_json(ws: &mut WsClient) -> anyhow::Result<serde_json::Value> {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await?
            .ok_or_else(|| anyhow::anyhow!("socket closed"))??;
        match msg {
            Message::Text(text) => return Ok(serde_json::from_str(text.as_str())?),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => anyhow::bail!("unexpected frame: {other:?}"),
        }
    }
}

/// Assert that no application frame arrives within `window`.
pub async fn assert_silent(ws: &mut WsClient, window: Duration) -> anyhow::Result<()> {
    match tokio::time::timeout(window, ws.next()).await {
        Err(_) => Ok(()),
        Ok(None) => anyhow::bail!("socket closed while expecting silence"),
        Ok(Some(Ok(Message::Ping(_) | Message::Pong(_)))) => Ok(()),
        Ok(Some(frame)) => anyhow::bail!("unexpected frame: {frame:?}"),
    }
}
