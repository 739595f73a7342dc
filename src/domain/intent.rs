//! Payment intent domain entity.
//! Canonical "who to pay, how much" representation prior to submission.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// How the display name on an intent was obtained.
///
/// A `Derived` placeholder (synthesized from the UPI id's local part) is
/// unverified and may be upgraded to `Directory` by merchant lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameSource {
    #[default]
    Unknown,
    Scanned,
    Derived,
    Directory,
}

/// Parsed representation of a scanned or manually entered payment.
///
/// All fields are optional until submission: validation requires a positive
/// amount and at least one of merchant name / payee id. Lives for a single
/// request, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub merchant_name: Option<String>,
    pub payee_id: Option<String>,
    pub amount: Option<BigDecimal>,
    #[serde(default)]
    pub name_source: NameSource,
}

impl PaymentIntent {
    pub fn is_empty(&self) -> bool {
        self.merchant_name.is_none() && self.payee_id.is_none() && self.amount.is_none()
    }
}

/// Placeholder display name for a UPI id: the local part (before `@`),
/// first character capitalized. `"rahul@bank"` becomes `"Rahul"`.
pub fn display_name_from_id(upi_id: &str) -> String {
    let local = upi_id.split('@').next().unwrap_or(upi_id);
    let mut chars = local.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
