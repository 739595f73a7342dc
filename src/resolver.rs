//! Local transaction resolver.
//!
//! Decides the outcome of a validated payment from a weighted draw, mints
//! the transaction id, and records the result in the ledger before
//! returning it. A caller never observes an unrecorded transaction.

use chrono::Utc;
use std::sync::Arc;

use crate::domain::transaction::{Transaction, TxnStatus};
use crate::error::AppError;
use crate::ledger::{LedgerError, TransactionLedger};
use crate::random::RandomSource;
use crate::validation::ValidatedPayment;

/// Weighted outcome policy: 90% SUCCESS, 10% FAILED. The failure share is
/// simulated noise, not an error path; FAILED transactions are recorded
/// like any other.
pub const SUCCESS_RATE: f64 = 0.9;

const TXN_ID_PREFIX: &str = "TXN";
const TXN_ID_LEN: usize = 8;
const TXN_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Clone)]
pub struct TransactionResolver {
    ledger: TransactionLedger,
    random: Arc<dyn RandomSource>,
}

impl TransactionResolver {
    pub fn new(ledger: TransactionLedger, random: Arc<dyn RandomSource>) -> Self {
        Self { ledger, random }
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    /// Resolves a validated payment to a recorded transaction. The id is
    /// minted independently of the outcome; on an id collision the id is
    /// reminted once, and a second collision is an internal error.
    pub async fn resolve(&self, payment: &ValidatedPayment) -> Result<Transaction, AppError> {
        let status = if self.random.next_f64() < SUCCESS_RATE {
            TxnStatus::Success
        } else {
            TxnStatus::Failed
        };

        let mut tx = Transaction {
            transaction_id: self.mint_id(),
            amount: payment.amount.clone(),
            payee_name: payment.payee_name.clone(),
            upi_id: payment.upi_id.clone(),
            status,
            created_at: Utc::now(),
        };

        if let Err(LedgerError::DuplicateId(id)) = self.ledger.insert(tx.clone()).await {
            tracing::warn!(transaction_id = %id, "transaction id collision, reminting");
            tx.transaction_id = self.mint_id();
            self.ledger
                .insert(tx.clone())
                .await
                .map_err(|err| AppError::Internal(format!("transaction id space exhausted: {err}")))?;
        }

        tracing::debug!(
            transaction_id = %tx.transaction_id,
            status = ?tx.status,
            payee = %tx.payee_name,
            "transaction resolved locally"
        );
        Ok(tx)
    }

    fn mint_id(&self) -> String {
        let mut id = String::with_capacity(TXN_ID_PREFIX.len() + TXN_ID_LEN);
        id.push_str(TXN_ID_PREFIX);
        for _ in 0..TXN_ID_LEN {
            let idx = self.random.next_index(TXN_ID_CHARSET.len());
            id.push(TXN_ID_CHARSET[idx] as char);
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn payment() -> ValidatedPayment {
        ValidatedPayment {
            amount: BigDecimal::from_str("250").unwrap(),
            payee_name: "Demo Merchant".to_string(),
            upi_id: Some("demo@upi".to_string()),
        }
    }

    fn resolver(seed: u64) -> TransactionResolver {
        TransactionResolver::new(TransactionLedger::new(), Arc::new(SeededRandom::new(seed)))
    }

    #[tokio::test]
    async fn minted_ids_have_the_expected_shape() {
        let resolver = resolver(1);
        let tx = resolver.resolve(&payment()).await.unwrap();

        assert!(tx.transaction_id.starts_with("TXN"));
        assert_eq!(tx.transaction_id.len(), 3 + 8);
        assert!(tx.transaction_id[3..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn resolved_transaction_is_recorded_before_return() {
        let resolver = resolver(2);
        let tx = resolver.resolve(&payment()).await.unwrap();

        let recorded = resolver.ledger().get(&tx.transaction_id).await.unwrap();
        assert_eq!(recorded, tx);
    }

    #[tokio::test]
    async fn failed_transactions_are_recorded_too() {
        let resolver = resolver(3);
        let mut seen_failed = None;
        for _ in 0..200 {
            let tx = resolver.resolve(&payment()).await.unwrap();
            if tx.status == TxnStatus::Failed {
                seen_failed = Some(tx);
                break;
            }
        }

        let failed = seen_failed.expect("a failed outcome within 200 draws");
        let recorded = resolver.ledger().get(&failed.transaction_id).await.unwrap();
        assert_eq!(recorded.status, TxnStatus::Failed);
    }

    #[tokio::test]
    async fn local_resolution_never_mints_pending() {
        let resolver = resolver(4);
        for _ in 0..500 {
            let tx = resolver.resolve(&payment()).await.unwrap();
            assert_ne!(tx.status, TxnStatus::Pending);
        }
    }
}
