pub mod payments;
pub mod qr;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

/// Envelope status for API responses, matching the `SUCCESS`/`FAILED`
/// strings of the wire format.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApiStatus {
    Success,
    Failed,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub transactions: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        transactions: state.ledger.len().await,
    })
}
