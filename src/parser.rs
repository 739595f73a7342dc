//! Scanned-payload parser.
//!
//! Converts the raw text a QR image decodes to into a canonical
//! [`PaymentIntent`]. Three dialects are accepted, tried in priority order:
//! a `upi://pay?...` intent URL, a JSON object, and loose `label: value`
//! pairs. Parsing never fails: anything unrecognizable degrades to the
//! whole string being treated as the merchant name.

use bigdecimal::BigDecimal;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::domain::intent::{display_name_from_id, NameSource, PaymentIntent};

static MERCHANT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:merchant|pn|payee)[:=]\s*([^;,\n]+)").expect("merchant pattern")
});
static UPI_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:upiId|upi|pa)[:=]\s*([^;,\n]+)").expect("upi id pattern")
});
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:amount|am)[:=]\s*([^;,\n]+)").expect("amount pattern")
});

pub fn parse(raw: &str) -> PaymentIntent {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PaymentIntent::default();
    }

    let mut intent = if is_intent_url(trimmed) {
        parse_intent_url(trimmed).unwrap_or_else(|| parse_key_values(trimmed))
    } else if trimmed.starts_with('{') {
        parse_structured(trimmed).unwrap_or_else(|| parse_key_values(trimmed))
    } else {
        parse_key_values(trimmed)
    };

    // A payee id without a display name gets an unverified placeholder,
    // distinct from a directory-confirmed name.
    if intent.merchant_name.is_none() {
        if let Some(id) = &intent.payee_id {
            let derived = display_name_from_id(id);
            if !derived.is_empty() {
                intent.merchant_name = Some(derived);
                intent.name_source = NameSource::Derived;
            }
        }
    }

    intent
}

fn is_intent_url(raw: &str) -> bool {
    raw.starts_with("upi://") || raw.contains("://pay?")
}

/// Dialect 1: `upi://pay?pa=...&pn=...&am=...`. Query values are
/// percent-decoded by the URL parser; missing parameters stay empty.
fn parse_intent_url(raw: &str) -> Option<PaymentIntent> {
    let url = Url::parse(raw).ok()?;
    let mut intent = PaymentIntent::default();

    for (key, value) in url.query_pairs() {
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "pa" => intent.payee_id = Some(value.to_string()),
            "pn" => {
                intent.merchant_name = Some(value.to_string());
                intent.name_source = NameSource::Scanned;
            }
            "am" => intent.amount = parse_amount(value),
            _ => {}
        }
    }

    Some(intent)
}

/// Dialect 2: a JSON object with field synonyms. The first present,
/// non-empty synonym wins: merchant/payee/pn, upiId/pa/upi, amount/am.
fn parse_structured(raw: &str) -> Option<PaymentIntent> {
    let value: serde_json::Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;

    let mut intent = PaymentIntent::default();
    if let Some(name) = first_field(object, &["merchant", "payee", "pn"]) {
        intent.merchant_name = Some(name);
        intent.name_source = NameSource::Scanned;
    }
    intent.payee_id = first_field(object, &["upiId", "pa", "upi"]);
    intent.amount = first_field(object, &["amount", "am"]).and_then(|a| parse_amount(&a));

    Some(intent)
}

fn first_field(
    object: &serde_json::Map<String, serde_json::Value>,
    synonyms: &[&str],
) -> Option<String> {
    synonyms.iter().find_map(|key| match object.get(*key) {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Dialect 3 (fallback): case-insensitive `label[:=] value` pairs, value
/// running to the next `;`, `,` or newline. When no label matches at all,
/// the entire payload becomes the merchant name.
fn parse_key_values(raw: &str) -> PaymentIntent {
    let mut intent = PaymentIntent::default();
    let mut matched = false;

    if let Some(caps) = MERCHANT_RE.captures(raw) {
        matched = true;
        let name = caps[1].trim();
        if !name.is_empty() {
            intent.merchant_name = Some(name.to_string());
            intent.name_source = NameSource::Scanned;
        }
    }
    if let Some(caps) = UPI_ID_RE.captures(raw) {
        matched = true;
        let id = caps[1].trim();
        if !id.is_empty() {
            intent.payee_id = Some(id.to_string());
        }
    }
    if let Some(caps) = AMOUNT_RE.captures(raw) {
        matched = true;
        intent.amount = parse_amount(caps[1].trim());
    }

    if !matched {
        intent.merchant_name = Some(raw.to_string());
        intent.name_source = NameSource::Scanned;
    }

    intent
}

fn parse_amount(raw: &str) -> Option<BigDecimal> {
    raw.trim().parse::<BigDecimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amount(value: &str) -> Option<BigDecimal> {
        Some(BigDecimal::from_str(value).unwrap())
    }

    #[test]
    fn parses_intent_url_dialect() {
        let intent = parse("upi://pay?pa=chai@okaxis&pn=Chai%20Point&am=120.50");
        assert_eq!(intent.merchant_name.as_deref(), Some("Chai Point"));
        assert_eq!(intent.payee_id.as_deref(), Some("chai@okaxis"));
        assert_eq!(intent.amount, amount("120.50"));
        assert_eq!(intent.name_source, NameSource::Scanned);
    }

    #[test]
    fn parses_structured_dialect() {
        let intent = parse(r#"{"merchant": "Chai Point", "upiId": "chai@okaxis", "amount": "120.50"}"#);
        assert_eq!(intent.merchant_name.as_deref(), Some("Chai Point"));
        assert_eq!(intent.payee_id.as_deref(), Some("chai@okaxis"));
        assert_eq!(intent.amount, amount("120.50"));
    }

    #[test]
    fn parses_key_value_dialect() {
        let intent = parse("merchant: Chai Point; upiId: chai@okaxis; amount: 120.50");
        assert_eq!(intent.merchant_name.as_deref(), Some("Chai Point"));
        assert_eq!(intent.payee_id.as_deref(), Some("chai@okaxis"));
        assert_eq!(intent.amount, amount("120.50"));
    }

    #[test]
    fn equivalent_payloads_yield_the_same_intent() {
        let from_url = parse("upi://pay?pa=chai@okaxis&pn=Chai%20Point&am=120.50");
        let from_json = parse(r#"{"pn": "Chai Point", "pa": "chai@okaxis", "am": 120.50}"#);
        let from_pairs = parse("pn=Chai Point, pa=chai@okaxis, am=120.50");

        assert_eq!(from_url, from_json);
        assert_eq!(from_url, from_pairs);
    }

    #[test]
    fn empty_input_yields_empty_intent() {
        assert_eq!(parse(""), PaymentIntent::default());
        assert_eq!(parse("   \n "), PaymentIntent::default());
    }

    #[test]
    fn plain_text_becomes_the_merchant_name() {
        let intent = parse("Joe's Cafe");
        assert_eq!(intent.merchant_name.as_deref(), Some("Joe's Cafe"));
        assert!(intent.payee_id.is_none());
        assert!(intent.amount.is_none());
    }

    #[test]
    fn malformed_json_degrades_to_fallback_dialect() {
        // Truncated JSON with a bare label is still salvaged by dialect 3.
        let intent = parse("{merchant: Joe");
        assert_eq!(intent.merchant_name.as_deref(), Some("Joe"));

        // Nothing recognizable at all: the payload is the merchant name.
        let intent = parse("{<<garbled>>");
        assert_eq!(intent.merchant_name.as_deref(), Some("{<<garbled>>"));
    }

    #[test]
    fn structured_synonyms_win_in_listed_order() {
        let intent = parse(r#"{"payee": "Second", "merchant": "First", "upi": "b@x", "pa": "a@x"}"#);
        assert_eq!(intent.merchant_name.as_deref(), Some("First"));
        assert_eq!(intent.payee_id.as_deref(), Some("a@x"));
    }

    #[test]
    fn structured_accepts_numeric_amounts() {
        let intent = parse(r#"{"merchant": "Joe", "amount": 99}"#);
        assert_eq!(intent.amount, amount("99"));
    }

    #[test]
    fn payee_id_without_name_gets_derived_placeholder() {
        let intent = parse("upiId: rahul@bank");
        assert_eq!(intent.payee_id.as_deref(), Some("rahul@bank"));
        assert_eq!(intent.merchant_name.as_deref(), Some("Rahul"));
        assert_eq!(intent.name_source, NameSource::Derived);
    }

    #[test]
    fn intent_url_with_missing_parameters_yields_empty_fields() {
        let intent = parse("upi://pay?pa=demo@upi");
        assert_eq!(intent.payee_id.as_deref(), Some("demo@upi"));
        // Placeholder derivation kicks in for the missing display name.
        assert_eq!(intent.merchant_name.as_deref(), Some("Demo"));
        assert_eq!(intent.name_source, NameSource::Derived);
        assert!(intent.amount.is_none());
    }

    #[test]
    fn unparseable_amount_is_treated_as_absent() {
        let intent = parse("merchant: Joe; amount: lots");
        assert_eq!(intent.merchant_name.as_deref(), Some("Joe"));
        assert!(intent.amount.is_none());
    }

    #[test]
    fn key_value_labels_are_case_insensitive() {
        let intent = parse("MERCHANT=Joe's Cafe\nAMOUNT=12");
        assert_eq!(intent.merchant_name.as_deref(), Some("Joe's Cafe"));
        assert_eq!(intent.amount, amount("12"));
    }

    #[test]
    fn value_stops_at_separators() {
        let intent = parse("merchant: Joe, amount: 12, upi: joe@upi");
        assert_eq!(intent.merchant_name.as_deref(), Some("Joe"));
        assert_eq!(intent.amount, amount("12"));
        assert_eq!(intent.payee_id.as_deref(), Some("joe@upi"));
    }
}
