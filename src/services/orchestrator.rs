//! Remote/local fallback orchestrator.
//!
//! Single entry point for a presentation layer submitting a payment. The
//! remote channel is attempted first; any transport-level failure falls
//! back to the local resolver, so the user-facing flow never depends on
//! the remote endpoint being reachable. A minimum perceived-latency floor
//! runs alongside the attempt and gates the receipt.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::intent::PaymentIntent;
use crate::domain::transaction::{Transaction, TxnStatus};
use crate::error::AppError;
use crate::remote::{PayRequest, PayResponse, RemoteClient};
use crate::resolver::TransactionResolver;
use crate::validation::ValidatedPayment;

/// Which path produced a receipt. A deliberate remote answer is
/// authoritative; the local path only runs on transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResolutionChannel {
    Remote,
    Local,
}

/// Tagged resolution outcome, selected by the orchestrator. Validation
/// rejection is the `Err` branch of `submit_payment` and never reaches
/// this type.
#[derive(Debug)]
enum Resolution {
    Remote(PayResponse),
    Local(Transaction),
}

/// Outcome object returned to the caller after a submission completes.
/// FAILED receipts omit the amount/payee echo fields: they signal "failed,
/// try again" rather than a confirmation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub status: TxnStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub channel: ResolutionChannel,
}

impl Receipt {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn from_remote(payment: &ValidatedPayment, answer: PayResponse) -> Self {
        let timestamp = answer.timestamp.unwrap_or_else(Utc::now);
        match answer.status {
            TxnStatus::Success => Receipt {
                status: TxnStatus::Success,
                transaction_id: answer.transaction_id,
                message: answer
                    .message
                    .unwrap_or_else(|| "payment completed".to_string()),
                amount: Some(payment.amount.clone()),
                payee_name: Some(payment.payee_name.clone()),
                upi_id: payment.upi_id.clone(),
                timestamp,
                channel: ResolutionChannel::Remote,
            },
            TxnStatus::Failed => Receipt {
                status: TxnStatus::Failed,
                transaction_id: answer.transaction_id,
                message: answer
                    .message
                    .unwrap_or_else(|| "payment failed, please try again".to_string()),
                amount: None,
                payee_name: None,
                upi_id: None,
                timestamp,
                channel: ResolutionChannel::Remote,
            },
            TxnStatus::Pending => Receipt {
                status: TxnStatus::Pending,
                transaction_id: answer.transaction_id,
                message: answer
                    .message
                    .unwrap_or_else(|| "payment is processing, check back shortly".to_string()),
                amount: Some(payment.amount.clone()),
                payee_name: Some(payment.payee_name.clone()),
                upi_id: payment.upi_id.clone(),
                timestamp,
                channel: ResolutionChannel::Remote,
            },
        }
    }

    fn from_local(tx: Transaction) -> Self {
        let succeeded = tx.status == TxnStatus::Success;
        Receipt {
            status: tx.status,
            transaction_id: Some(tx.transaction_id),
            message: if succeeded {
                "payment completed".to_string()
            } else {
                "payment failed, please try again".to_string()
            },
            amount: succeeded.then_some(tx.amount),
            payee_name: succeeded.then_some(tx.payee_name),
            upi_id: if succeeded { tx.upi_id } else { None },
            timestamp: tx.created_at,
            channel: ResolutionChannel::Local,
        }
    }
}

pub struct PaymentOrchestrator {
    remote: RemoteClient,
    resolver: TransactionResolver,
    min_latency: Duration,
}

impl PaymentOrchestrator {
    pub fn new(remote: RemoteClient, resolver: TransactionResolver, min_latency: Duration) -> Self {
        Self {
            remote,
            resolver,
            min_latency,
        }
    }

    /// Submits a payment and returns its receipt.
    ///
    /// Validation failures return synchronously, before the latency floor
    /// or any network work starts. Otherwise the receipt is revealed only
    /// once both the resolution attempt and the minimum-latency floor have
    /// settled, however fast the remote answered.
    pub async fn submit_payment(&self, intent: &PaymentIntent) -> Result<Receipt, AppError> {
        let payment = ValidatedPayment::from_intent(intent)?;

        let (resolution, ()) = tokio::join!(self.attempt(&payment), sleep(self.min_latency));

        let receipt = match resolution? {
            Resolution::Remote(answer) => Receipt::from_remote(&payment, answer),
            Resolution::Local(tx) => Receipt::from_local(tx),
        };
        tracing::info!(
            status = ?receipt.status,
            channel = ?receipt.channel,
            transaction_id = receipt.transaction_id.as_deref().unwrap_or(""),
            "payment submission settled"
        );
        Ok(receipt)
    }

    async fn attempt(&self, payment: &ValidatedPayment) -> Result<Resolution, AppError> {
        match self.remote.pay(&PayRequest::from(payment)).await {
            Ok(answer) => Ok(Resolution::Remote(answer)),
            Err(err) => {
                tracing::warn!(error = %err, "remote resolution unavailable, falling back to local");
                let tx = self.resolver.resolve(payment).await?;
                Ok(Resolution::Local(tx))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payment() -> ValidatedPayment {
        ValidatedPayment {
            amount: BigDecimal::from_str("250").unwrap(),
            payee_name: "Demo Merchant".to_string(),
            upi_id: Some("demo@upi".to_string()),
        }
    }

    fn remote_answer(status: TxnStatus) -> PayResponse {
        PayResponse {
            status,
            transaction_id: Some("TXNREMOTE01".to_string()),
            message: None,
            amount: None,
            payee_name: None,
            upi_id: None,
            timestamp: None,
        }
    }

    #[test]
    fn success_receipt_echoes_payment_fields() {
        let receipt = Receipt::from_remote(&payment(), remote_answer(TxnStatus::Success));
        assert_eq!(receipt.transaction_id.as_deref(), Some("TXNREMOTE01"));
        assert_eq!(receipt.amount, Some(BigDecimal::from_str("250").unwrap()));
        assert_eq!(receipt.payee_name.as_deref(), Some("Demo Merchant"));
        assert!(receipt.is_terminal());
    }

    #[test]
    fn failed_receipt_omits_echo_fields() {
        let receipt = Receipt::from_remote(&payment(), remote_answer(TxnStatus::Failed));
        assert_eq!(receipt.status, TxnStatus::Failed);
        assert!(receipt.amount.is_none());
        assert!(receipt.payee_name.is_none());
        assert!(receipt.upi_id.is_none());
        // Still carries the id for support lookup.
        assert_eq!(receipt.transaction_id.as_deref(), Some("TXNREMOTE01"));
    }

    #[test]
    fn pending_receipt_is_advisory_not_terminal() {
        let receipt = Receipt::from_remote(&payment(), remote_answer(TxnStatus::Pending));
        assert_eq!(receipt.status, TxnStatus::Pending);
        assert!(!receipt.is_terminal());
        assert!(receipt.amount.is_some());
    }

    #[test]
    fn channel_serializes_uppercase() {
        assert_eq!(
            serde_json::to_value(ResolutionChannel::Remote).unwrap(),
            "REMOTE"
        );
        assert_eq!(
            serde_json::to_value(ResolutionChannel::Local).unwrap(),
            "LOCAL"
        );
    }
}
