// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Configuration for the station relay daemon.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "stationd", about = "Command/telemetry relay for remote demo stations")]
pub struct RelayConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "STATIOND_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 9400, env = "STATIOND_PORT")]
    pub port: u16,

    /// Bearer token for API and WebSocket auth. If unset, auth is disabled.
    #[arg(long, env = "STATIOND_AUTH_TOKEN")]
    pub auth_token: Option<String>,

    /// Delay between an accepted command and its telemetry sample, in milliseconds.
    #[arg(long, default_value_t = 100, env = "STATIOND_TELEMETRY_DELAY_MS")]
    pub telemetry_delay_ms: u64,
}

impl RelayConfig {
    pub fn telemetry_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.telemetry_delay_ms)
    }
}
