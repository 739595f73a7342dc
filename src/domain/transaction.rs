//! Transaction domain entity.
//! Framework-agnostic representation of a settled payment attempt.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a resolved transaction. Assigned exactly once at resolution
/// and never mutated; a retry mints a new transaction instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxnStatus {
    Success,
    Failed,
    Pending,
}

impl TxnStatus {
    /// PENDING is an advisory, non-terminal answer from a remote resolver.
    pub fn is_terminal(self) -> bool {
        !matches!(self, TxnStatus::Pending)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    pub amount: BigDecimal,
    pub payee_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
    pub status: TxnStatus,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}
