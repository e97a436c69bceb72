//! Mollie payment resource as returned by the API

use crate::{
    error::{PaymentError, PaymentResult},
    money::Amount,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Mollie payment states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MolliePaymentStatus {
    Open,
    Pending,
    Authorized,
    Paid,
    Canceled,
    Expired,
    Failed,
    /// Any state this adapter does not know about
    Unknown,
}

impl MolliePaymentStatus {
    /// Parse from the API status string
    pub fn from_api(s: &str) -> Self {
        match s {
            "open" => Self::Open,
            "pending" => Self::Pending,
            "authorized" => Self::Authorized,
            "paid" => Self::Paid,
            "canceled" => Self::Canceled,
            "expired" => Self::Expired,
            "failed" => Self::Failed,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentFields {
    id: Option<String>,
    status: Option<String>,
    amount: Option<Amount>,
    amount_captured: Option<Value>,
    details: Option<Map<String, Value>>,
    paid_at: Option<String>,
    #[serde(rename = "_links")]
    links: Option<Links>,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    checkout: Option<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

/// A Mollie payment, with typed access to the fields the adapter reads
/// and the raw document kept for auditing.
#[derive(Debug, Clone, PartialEq)]
pub struct MolliePayment {
    pub id: String,
    pub status: String,
    pub amount: Option<Amount>,
    pub amount_captured: Option<Value>,
    pub details: Option<Map<String, Value>>,
    pub paid_at: Option<String>,
    pub checkout_url: Option<String>,
    raw: Value,
}

impl MolliePayment {
    /// Interpret a JSON document
    pub fn from_value(raw: Value) -> PaymentResult<Self> {
        if !raw.is_object() {
            return Err(PaymentError::InvalidResponse(
                "payment resource is not a JSON object".into(),
            ));
        }

        let fields: PaymentFields = serde_json::from_value(raw.clone())
            .map_err(|e| PaymentError::InvalidResponse(e.to_string()))?;

        Ok(Self {
            id: fields.id.unwrap_or_default(),
            status: fields.status.unwrap_or_default(),
            amount: fields.amount,
            amount_captured: fields.amount_captured.filter(|v| !is_empty_value(v)),
            details: fields.details,
            paid_at: fields.paid_at,
            checkout_url: fields.links.and_then(|l| l.checkout).map(|l| l.href),
            raw,
        })
    }

    /// Parse a response body
    pub fn from_slice(body: &[u8]) -> PaymentResult<Self> {
        let raw: Value = serde_json::from_slice(body)?;
        Self::from_value(raw)
    }

    /// The document as received from Mollie
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Serialize the full document for storage
    pub fn to_json(&self) -> PaymentResult<String> {
        Ok(serde_json::to_string(&self.raw)?)
    }

    /// Parsed state
    pub fn state(&self) -> MolliePaymentStatus {
        MolliePaymentStatus::from_api(&self.status)
    }

    /// Paid, judged by the `paidAt` timestamp Mollie sets on capture
    pub fn is_paid(&self) -> bool {
        self.paid_at.is_some() || self.state() == MolliePaymentStatus::Paid
    }

    pub fn is_open(&self) -> bool {
        self.state() == MolliePaymentStatus::Open
    }

    pub fn is_pending(&self) -> bool {
        self.state() == MolliePaymentStatus::Pending
    }

    pub fn is_authorized(&self) -> bool {
        self.state() == MolliePaymentStatus::Authorized
    }

    pub fn is_canceled(&self) -> bool {
        self.state() == MolliePaymentStatus::Canceled
    }

    pub fn is_expired(&self) -> bool {
        self.state() == MolliePaymentStatus::Expired
    }

    pub fn is_failed(&self) -> bool {
        self.state() == MolliePaymentStatus::Failed
    }

    /// A string entry of `details`, empty values count as absent
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .as_ref()?
            .get(key)?
            .as_str()
            .filter(|value| !value.is_empty())
    }

    /// Captured amount value, if Mollie reported one
    pub fn captured_value(&self) -> PaymentResult<Option<&str>> {
        match &self.amount_captured {
            None => Ok(None),
            Some(captured) => captured
                .get("value")
                .and_then(Value::as_str)
                .map(Some)
                .ok_or_else(|| {
                    PaymentError::InvalidResponse("amountCaptured has no value".into())
                }),
        }
    }
}

impl fmt::Display for MolliePayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mollie payment {} ({})", self.id, self.status)
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_payment() {
        let payment = MolliePayment::from_value(json!({
            "resource": "payment",
            "id": "tr_12345",
            "status": "open",
            "amount": {"currency": "EUR", "value": "10.00"},
            "_links": {
                "self": {"href": "https://api.mollie.com/v2/payments/tr_12345", "type": "application/hal+json"},
                "checkout": {"href": "https://www.mollie.com/checkout/select-method/12345", "type": "text/html"}
            }
        }))
        .unwrap();

        assert_eq!(payment.id, "tr_12345");
        assert!(payment.is_open());
        assert!(!payment.is_paid());
        assert_eq!(payment.amount.as_ref().unwrap().value, "10.00");
        assert_eq!(
            payment.checkout_url.as_deref(),
            Some("https://www.mollie.com/checkout/select-method/12345")
        );
    }

    #[test]
    fn test_paid_predicate_uses_paid_at() {
        let payment = MolliePayment::from_value(json!({"paidAt": "2018-03-20T09:28:37+00:00"}))
            .unwrap();
        assert!(payment.is_paid());
        assert_eq!(payment.state(), MolliePaymentStatus::Unknown);

        let payment = MolliePayment::from_value(json!({"status": "paid"})).unwrap();
        assert!(payment.is_paid());
    }

    #[test]
    fn test_states() {
        for (status, state) in [
            ("pending", MolliePaymentStatus::Pending),
            ("authorized", MolliePaymentStatus::Authorized),
            ("canceled", MolliePaymentStatus::Canceled),
            ("expired", MolliePaymentStatus::Expired),
            ("failed", MolliePaymentStatus::Failed),
            ("hoeba", MolliePaymentStatus::Unknown),
        ] {
            let payment = MolliePayment::from_value(json!({ "status": status })).unwrap();
            assert_eq!(payment.state(), state);
        }
    }

    #[test]
    fn test_details_and_captured_amount() {
        let payment = MolliePayment::from_value(json!({
            "status": "failed",
            "details": {"failureReason": "possible_fraud", "failureMessage": "", "cardNumber": 1234},
            "amountCaptured": {"value": "13.37", "currency": "EUR"}
        }))
        .unwrap();

        assert_eq!(payment.detail("failureReason"), Some("possible_fraud"));
        assert_eq!(payment.detail("failureMessage"), None);
        assert_eq!(payment.detail("cardNumber"), None);
        assert_eq!(payment.captured_value().unwrap(), Some("13.37"));
    }

    #[test]
    fn test_empty_captured_amount_counts_as_absent() {
        let payment = MolliePayment::from_value(json!({"status": "paid", "amountCaptured": {}}))
            .unwrap();
        assert_eq!(payment.captured_value().unwrap(), None);

        let payment =
            MolliePayment::from_value(json!({"status": "paid", "amountCaptured": {"currency": "EUR"}}))
                .unwrap();
        assert!(payment.captured_value().is_err());
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(MolliePayment::from_value(json!([1, 2, 3])).is_err());
        assert!(MolliePayment::from_slice(b"not json").is_err());
    }

    #[test]
    fn test_raw_document_is_kept() {
        let raw = json!({"id": "tr_1", "status": "paid", "extra": {"nested": true}});
        let payment = MolliePayment::from_value(raw.clone()).unwrap();

        assert_eq!(payment.raw(), &raw);
        assert!(payment.to_json().unwrap().contains("\"nested\":true"));
    }
}
