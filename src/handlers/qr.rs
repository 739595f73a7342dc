use axum::{extract::State, response::IntoResponse, Json};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::ApiStatus;
use crate::error::AppError;
use crate::validation::validate_upi_id;
use crate::AppState;

const DEFAULT_UPI_ID: &str = "demo@upi";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrRequest {
    pub merchant_name: Option<String>,
    pub upi_id: Option<String>,
    pub amount: Option<BigDecimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrDetails {
    pub payee_name: String,
    pub upi_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<BigDecimal>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrResponse {
    pub status: ApiStatus,
    pub qr_data: String,
    pub details: QrDetails,
}

/// Builds a canonical `upi://pay?...` intent URL for the requested
/// merchant. Absent fields default to the demo merchant, so a bare request
/// always yields a scannable payload.
pub async fn generate_qr(
    State(state): State<AppState>,
    Json(request): Json<GenerateQrRequest>,
) -> impl IntoResponse {
    let upi_id = request
        .upi_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_UPI_ID.to_string());
    let payee_name = request
        .merchant_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| state.directory.resolve_name(&upi_id).0);

    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("pa", &upi_id);
    query.append_pair("pn", &payee_name);
    if let Some(amount) = &request.amount {
        query.append_pair("am", &amount.to_string());
    }
    let qr_data = format!("upi://pay?{}", query.finish());

    Json(GenerateQrResponse {
        status: ApiStatus::Success,
        qr_data,
        details: QrDetails {
            payee_name,
            upi_id,
            amount: request.amount,
        },
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpiIdRequest {
    pub upi_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanQrResponse {
    pub status: ApiStatus,
    pub payee_name: String,
    pub verified: bool,
}

/// Merchant lookup for a scanned UPI id. Unknown ids are not an error:
/// they get a derived display name and `verified: false`.
pub async fn scan_qr(
    State(state): State<AppState>,
    Json(request): Json<UpiIdRequest>,
) -> Result<impl IntoResponse, AppError> {
    let upi_id = request
        .upi_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Validation("upiId is required".to_string()))?;

    let (payee_name, verified) = state.directory.resolve_name(upi_id);
    Ok(Json(ScanQrResponse {
        status: ApiStatus::Success,
        payee_name,
        verified,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpiValidity {
    Valid,
    Invalid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateUpiResponse {
    pub status: UpiValidity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

/// Shape check for a UPI id: INVALID when the `@`-separated domain part is
/// missing. A well-formed id also reports its directory standing.
pub async fn validate_upi(
    State(state): State<AppState>,
    Json(request): Json<UpiIdRequest>,
) -> impl IntoResponse {
    let upi_id = request.upi_id.as_deref().map(str::trim).unwrap_or_default();

    if validate_upi_id(upi_id).is_err() {
        return Json(ValidateUpiResponse {
            status: UpiValidity::Invalid,
            payee_name: None,
            verified: None,
        });
    }

    let (payee_name, verified) = state.directory.resolve_name(upi_id);
    Json(ValidateUpiResponse {
        status: UpiValidity::Valid,
        payee_name: Some(payee_name),
        verified: Some(verified),
    })
}
