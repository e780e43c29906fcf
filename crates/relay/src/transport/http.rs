// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP handlers for relay introspection.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::error::RelayError;
use crate::state::RelayState;

// -- Response types -----------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub station_count: usize,
    pub connection_count: usize,
}

#[derive(Debug, Serialize)]
pub struct StationInfo {
    pub id: String,
    pub viewers: usize,
}

// -- Handlers -----------------------------------------------------------------

/// `GET /api/v1/health`
pub async fn health(State(s): State<Arc<RelayState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "running".to_owned(),
        station_count: s.registry.station_count().await,
        connection_count: s.registry.connection_count().await,
    })
}

/// `GET /api/v1/stations` — stations with at least one live viewer.
pub async fn list_stations(State(s): State<Arc<RelayState>>) -> impl IntoResponse {
    let mut stations: Vec<StationInfo> = s
        .registry
        .stations()
        .await
        .into_iter()
        .map(|(id, viewers)| StationInfo { id, viewers })
        .collect();
    stations.sort_by(|a, b| a.id.cmp(&b.id));
    Json(stations)
}

/// `GET /api/v1/stations/{id}` — viewer count for one live station.
pub async fn station_detail(
    State(s): State<Arc<RelayState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match s.registry.viewers(&id).await {
        Some(viewers) => Json(StationInfo { id, viewers }).into_response(),
        None => RelayError::StationNotFound
            .to_http_response(format!("no live connections for station {id}"))
            .into_response(),
    }
}
