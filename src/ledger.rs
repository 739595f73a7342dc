//! In-memory transaction ledger.
//!
//! Shared handle over a single process-wide store: insert-once, lookup by
//! transaction id, ordered listing. Transactions are never updated or
//! deleted once recorded; the ledger lives for the process lifetime.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::domain::transaction::Transaction;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("transaction id already recorded: {0}")]
    DuplicateId(String),
}

#[derive(Default)]
struct LedgerInner {
    by_id: HashMap<String, Transaction>,
    // Insertion order, for listing.
    order: Vec<String>,
}

#[derive(Clone, Default)]
pub struct TransactionLedger {
    inner: Arc<RwLock<LedgerInner>>,
}

impl TransactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, tx: Transaction) -> Result<(), LedgerError> {
        let mut inner = self.inner.write().await;
        let LedgerInner { by_id, order } = &mut *inner;
        match by_id.entry(tx.transaction_id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateId(tx.transaction_id)),
            Entry::Vacant(slot) => {
                order.push(tx.transaction_id.clone());
                slot.insert(tx);
                Ok(())
            }
        }
    }

    pub async fn get(&self, transaction_id: &str) -> Option<Transaction> {
        let inner = self.inner.read().await;
        inner.by_id.get(transaction_id).cloned()
    }

    pub async fn list(&self) -> Vec<Transaction> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.order.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
