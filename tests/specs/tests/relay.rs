// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end relay tests over real WebSockets.

use std::time::Duration;

use serde_json::json;

use stationd_specs::{assert_silent, recv_json, send_json, RelayServer};

// -- HTTP ---------------------------------------------------------------------

#[tokio::test]
async fn http_health() -> anyhow::Result<()> {
    let server = RelayServer::start().await?;

    let resp: serde_json::Value =
        reqwest::get(format!("{}/api/v1/health", server.base_url())).await?.json().await?;

    assert_eq!(resp["status"], "running");
    assert_eq!(resp["station_count"], 0);
    assert_eq!(resp["connection_count"], 0);

    Ok(())
}

#[tokio::test]
async fn http_stations_show_joined_viewer() -> anyhow::Result<()> {
    let server = RelayServer::start().await?;

    let mut ws = server.connect().await?;
    send_json(&mut ws, &json!({"type": "join", "stationId": "S1", "userId": 7})).await?;
    recv_json(&mut ws).await?;

    let resp: serde_json::Value =
        reqwest::get(format!("{}/api/v1/stations", server.base_url())).await?.json().await?;
    assert_eq!(resp[0]["id"], "S1");
    assert_eq!(resp[0]["viewers"], 1);

    Ok(())
}

// -- Join ---------------------------------------------------------------------

#[tokio::test]
async fn join_receives_ack() -> anyhow::Result<()> {
    let server = RelayServer::start().await?;
    let mut ws = server.connect().await?;

    send_json(&mut ws, &json!({"type": "join", "stationId": "S1", "userId": 7})).await?;

    let ack = recv_json(&mut ws).await?;
    assert_eq!(ack["type"], "joined");
    assert_eq!(ack["stationId"], "S1");

    Ok(())
}

// -- Command fan-out ----------------------------------------------------------

#[tokio::test]
async fn command_fans_out_to_all_viewers() -> anyhow::Result<()> {
    let server = RelayServer::start().await?;

    let mut first = server.connect().await?;
    send_json(&mut first, &json!({"type": "join", "stationId": "S1", "userId": 7})).await?;
    recv_json(&mut first).await?;

    let mut second = server.connect().await?;
    send_json(&mut second, &json!({"type": "join", "stationId": "S1", "userId": 8})).await?;
    recv_json(&mut second).await?;

    send_json(
        &mut first,
        &json!({
            "type": "command",
            "sessionId": 1,
            "command": "move_forward",
            "parameters": {"speed": 10},
        }),
    )
    .await?;

    for ws in [&mut first, &mut second] {
        let executed = recv_json(ws).await?;
        assert_eq!(executed["type"], "command_executed");
        assert_eq!(executed["command"], "move_forward");
        assert_eq!(executed["parameters"]["speed"], 10);

        let telemetry = recv_json(ws).await?;
        assert_eq!(telemetry["type"], "telemetry");
        assert!(telemetry["position"].is_number());
        assert!(telemetry["velocity"].is_number());
        assert!(telemetry["load"].is_number());
        assert!(telemetry["timestamp"].is_string());
    }

    let commands = server.store.commands().await;
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].command, "move_forward");
    assert_eq!(commands[0].status, "executed");
    assert_eq!(server.store.telemetry().await.len(), 1);

    Ok(())
}

#[tokio::test]
async fn departed_viewer_misses_the_broadcast() -> anyhow::Result<()> {
    let server = RelayServer::start().await?;

    let mut first = server.connect().await?;
    send_json(&mut first, &json!({"type": "join", "stationId": "S1", "userId": 7})).await?;
    recv_json(&mut first).await?;
    first.close(None).await?;
    server.wait_for_connections(0).await?;

    let mut second = server.connect().await?;
    send_json(&mut second, &json!({"type": "join", "stationId": "S1", "userId": 8})).await?;
    recv_json(&mut second).await?;

    send_json(
        &mut second,
        &json!({"type": "command", "sessionId": 2, "command": "stop", "parameters": {}}),
    )
    .await?;

    let executed = recv_json(&mut second).await?;
    assert_eq!(executed["type"], "command_executed");
    assert_eq!(recv_json(&mut second).await?["type"], "telemetry");

    Ok(())
}

#[tokio::test]
async fn command_without_join_is_ignored() -> anyhow::Result<()> {
    let server = RelayServer::start().await?;
    let mut ws = server.connect().await?;

    send_json(
        &mut ws,
        &json!({"type": "command", "sessionId": 1, "command": "move_forward", "parameters": {}}),
    )
    .await?;

    assert_silent(&mut ws, Duration::from_millis(200)).await?;
    assert!(server.store.commands().await.is_empty());

    Ok(())
}

// -- Auth ---------------------------------------------------------------------

#[tokio::test]
async fn ws_auth_rejects_missing_token() -> anyhow::Result<()> {
    let server =
        RelayServer::start_with(|c| c.auth_token = Some("sekrit".to_owned())).await?;

    // No token: the upgrade is refused outright.
    assert!(tokio_tungstenite::connect_async(server.ws_url()).await.is_err());

    // With the token the relay behaves normally.
    let url = format!("{}?token=sekrit", server.ws_url());
    let (mut ws, _) = tokio_tungstenite::connect_async(url).await?;
    send_json(&mut ws, &json!({"type": "join", "stationId": "S1", "userId": 7})).await?;
    assert_eq!(recv_json(&mut ws).await?["type"], "joined");

    Ok(())
}
