//! Static merchant directory.
//!
//! Process-wide reference data mapping a UPI id to a verified display
//! name. Loaded once at startup, never mutated. Unknown ids are not an
//! error: callers fall back to a derived, unverified placeholder name.

use std::collections::HashMap;

use crate::domain::intent::{display_name_from_id, NameSource, PaymentIntent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantRecord {
    pub display_name: String,
    pub verified: bool,
}

const SEED_MERCHANTS: &[(&str, &str, bool)] = &[
    ("demo@upi", "Demo Merchant", true),
    ("chai@okaxis", "Chai Point", true),
    ("grocers@okhdfcbank", "City Grocers", true),
    ("bookstall@paytm", "Corner Book Stall", true),
    ("kirana@ybl", "Sharma Kirana Store", false),
];

pub struct MerchantDirectory {
    records: HashMap<String, MerchantRecord>,
}

impl Default for MerchantDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl MerchantDirectory {
    pub fn new() -> Self {
        let records = SEED_MERCHANTS
            .iter()
            .map(|(id, name, verified)| {
                (
                    (*id).to_string(),
                    MerchantRecord {
                        display_name: (*name).to_string(),
                        verified: *verified,
                    },
                )
            })
            .collect();
        Self { records }
    }

    pub fn lookup(&self, payee_id: &str) -> Option<&MerchantRecord> {
        self.records.get(payee_id)
    }

    /// Display name plus verification flag for a UPI id. Unknown ids get
    /// the derived placeholder and `false`.
    pub fn resolve_name(&self, payee_id: &str) -> (String, bool) {
        match self.lookup(payee_id) {
            Some(record) => (record.display_name.clone(), record.verified),
            None => (display_name_from_id(payee_id), false),
        }
    }

    /// Fills a missing or derived display name from the directory. A name
    /// scanned verbatim off the payload is left alone.
    pub fn enrich(&self, intent: &mut PaymentIntent) {
        let Some(payee_id) = &intent.payee_id else {
            return;
        };
        if intent.merchant_name.is_some() && intent.name_source != NameSource::Derived {
            return;
        }
        if let Some(record) = self.lookup(payee_id) {
            intent.merchant_name = Some(record.display_name.clone());
            intent.name_source = NameSource::Directory;
        }
    }
}
