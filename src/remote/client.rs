use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use failsafe::futures::CircuitBreaker as FuturesCircuitBreaker;
use failsafe::{backoff, failure_policy, Config, Error as FailsafeError, StateMachine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::transaction::TxnStatus;
use crate::validation::ValidatedPayment;

/// Transport-level failures on the remote payment channel. None of these
/// reach the user: the orchestrator recovers them via the local resolver.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid response from payment endpoint: {0}")]
    InvalidResponse(String),
    #[error("payment endpoint circuit breaker is open")]
    CircuitOpen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub amount: Option<BigDecimal>,
    pub payee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
}

impl From<&ValidatedPayment> for PayRequest {
    fn from(payment: &ValidatedPayment) -> Self {
        Self {
            amount: Some(payment.amount.clone()),
            payee_name: Some(payment.payee_name.clone()),
            upi_id: payment.upi_id.clone(),
        }
    }
}

/// Wire shape of a `/pay` answer. Application-level FAILED answers arrive
/// through this type too (with a 4xx status), so a decoded response is
/// authoritative whatever its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayResponse {
    pub status: TxnStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// HTTP client for the remote payment-resolution endpoint.
#[derive(Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: String,
    circuit_breaker: StateMachine<failure_policy::ConsecutiveFailures<backoff::EqualJittered>, ()>,
}

impl RemoteClient {
    /// Creates a client with the given call-level timeout. The circuit
    /// breaker opens after 3 consecutive transport failures and resets
    /// after roughly a minute.
    pub fn new(base_url: String, call_timeout: Duration) -> Self {
        Self::with_circuit_breaker(base_url, call_timeout, 3, 60)
    }

    pub fn with_circuit_breaker(
        base_url: String,
        call_timeout: Duration,
        failure_threshold: u32,
        reset_timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(call_timeout)
            .build()
            .unwrap_or_default();

        let backoff = backoff::equal_jittered(
            Duration::from_secs(reset_timeout_secs),
            Duration::from_secs(reset_timeout_secs * 2),
        );
        let policy = failure_policy::consecutive_failures(failure_threshold, backoff);
        let circuit_breaker = Config::new().failure_policy(policy).build();

        RemoteClient {
            client,
            base_url,
            circuit_breaker,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn circuit_state(&self) -> &'static str {
        if self.circuit_breaker.is_call_permitted() {
            "closed"
        } else {
            "open"
        }
    }

    /// Submits a payment to the remote `/pay` endpoint. Returns the decoded
    /// answer, or a transport-level error when the endpoint is unreachable,
    /// times out, answers 5xx, or breaks the response contract.
    pub async fn pay(&self, request: &PayRequest) -> Result<PayResponse, RemoteError> {
        let url = format!("{}/pay", self.base_url.trim_end_matches('/'));
        let client = self.client.clone();
        let body = request.clone();

        let result = self
            .circuit_breaker
            .call(async move {
                let response = client.post(&url).json(&body).send().await?;
                let status = response.status();

                if status.is_server_error() {
                    return Err(RemoteError::InvalidResponse(format!(
                        "endpoint returned {status}"
                    )));
                }

                let payload = response.json::<PayResponse>().await?;
                if payload.status == TxnStatus::Success && payload.transaction_id.is_none() {
                    return Err(RemoteError::InvalidResponse(
                        "SUCCESS answer without a transaction id".to_string(),
                    ));
                }
                Ok(payload)
            })
            .await;

        match result {
            Ok(payload) => Ok(payload),
            Err(FailsafeError::Rejected) => Err(RemoteError::CircuitOpen),
            Err(FailsafeError::Inner(err)) => Err(err),
        }
    }
}
