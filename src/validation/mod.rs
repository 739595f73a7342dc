use bigdecimal::BigDecimal;
use std::fmt;

use crate::domain::intent::{display_name_from_id, PaymentIntent};

pub const PAYEE_NAME_MAX_LEN: usize = 120;
pub const UPI_ID_MAX_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

/// A UPI id must carry an `@`-separated domain part, e.g. `rahul@bank`.
pub fn validate_upi_id(upi_id: &str) -> ValidationResult {
    let upi_id = sanitize_string(upi_id);
    validate_required("upiId", &upi_id)?;
    validate_max_len("upiId", &upi_id, UPI_ID_MAX_LEN)?;

    match upi_id.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::new(
            "upiId",
            "must be of the form name@bank",
        )),
    }
}

pub fn validate_positive_amount(amount: &BigDecimal) -> ValidationResult {
    if amount <= &BigDecimal::from(0) {
        return Err(ValidationError::new("amount", "must be greater than zero"));
    }

    Ok(())
}

/// A payment that passed submission validation: positive amount and a
/// resolvable payee. Producing this type is the only path into the
/// transaction resolver, so resolution never re-checks these invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayment {
    pub amount: BigDecimal,
    pub payee_name: String,
    pub upi_id: Option<String>,
}

impl ValidatedPayment {
    pub fn from_intent(intent: &PaymentIntent) -> Result<Self, ValidationError> {
        let payee_name = match (&intent.merchant_name, &intent.payee_id) {
            (Some(name), _) if !name.trim().is_empty() => sanitize_string(name),
            (_, Some(id)) if !id.trim().is_empty() => display_name_from_id(id.trim()),
            _ => {
                return Err(ValidationError::new(
                    "payee",
                    "merchant name or UPI id is required",
                ))
            }
        };
        validate_max_len("payee", &payee_name, PAYEE_NAME_MAX_LEN)?;

        let amount = intent
            .amount
            .clone()
            .ok_or_else(|| ValidationError::new("amount", "must be a positive decimal"))?;
        validate_positive_amount(&amount)?;

        let upi_id = intent
            .payee_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        Ok(Self {
            amount,
            payee_name,
            upi_id,
        })
    }
}
