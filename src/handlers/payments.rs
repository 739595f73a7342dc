use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tokio::time::sleep;

use super::ApiStatus;
use crate::domain::intent::PaymentIntent;
use crate::domain::transaction::Transaction;
use crate::error::AppError;
use crate::remote::{PayRequest, PayResponse};
use crate::validation::ValidatedPayment;
use crate::AppState;

/// Resolves a payment against the local resolver and ledger. This is the
/// remote payment-resolution endpoint the fallback orchestrator consumes.
/// The configured processing delay simulates upstream settlement time.
pub async fn pay(
    State(state): State<AppState>,
    Json(request): Json<PayRequest>,
) -> Result<impl IntoResponse, AppError> {
    let intent = PaymentIntent {
        merchant_name: request.payee_name.clone(),
        payee_id: request.upi_id.clone(),
        amount: request.amount.clone(),
        ..Default::default()
    };
    let payment = ValidatedPayment::from_intent(&intent)?;

    if !state.processing_delay.is_zero() {
        sleep(state.processing_delay).await;
    }

    let tx = state.resolver.resolve(&payment).await?;
    tracing::info!(
        transaction_id = %tx.transaction_id,
        status = ?tx.status,
        "payment resolved"
    );

    Ok(Json(PayResponse {
        status: tx.status,
        transaction_id: Some(tx.transaction_id),
        message: Some("UPI transaction simulated".to_string()),
        amount: Some(tx.amount),
        payee_name: Some(tx.payee_name),
        upi_id: tx.upi_id,
        timestamp: Some(tx.created_at),
    }))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .ledger
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound("not found".to_string()))?;

    Ok(Json(tx))
}

#[derive(Serialize)]
pub struct TransactionsResponse {
    pub status: ApiStatus,
    pub transactions: Vec<Transaction>,
}

pub async fn list_transactions(State(state): State<AppState>) -> impl IntoResponse {
    Json(TransactionsResponse {
        status: ApiStatus::Success,
        transactions: state.ledger.list().await,
    })
}
