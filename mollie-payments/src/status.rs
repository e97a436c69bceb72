//! Mapping of Mollie payment states onto local payment status

use crate::{
    error::PaymentResult,
    money::parse_value,
    response::MolliePayment,
    types::{FraudStatus, PaymentStatus, PaymentUpdates},
};

/// `failureReason` Mollie reports for suspected fraud
pub const FRAUD_FAILURE_REASON: &str = "possible_fraud";

/// Outcome of interpreting a Mollie payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    /// New local status, `None` while Mollie is still processing
    pub next_status: Option<PaymentStatus>,
    /// Explanation stored with the status change
    pub message: String,
    /// Fields to persist; always contains `extra_data`
    pub updates: PaymentUpdates,
}

/// Interpret a Mollie payment.
///
/// Checks run in priority order: paid, canceled/expired, failed, open/pending,
/// and everything else is unexpected.
pub fn parse_payment_status(payment: &MolliePayment) -> PaymentResult<StatusTransition> {
    let mut updates = PaymentUpdates {
        extra_data: Some(payment.to_json()?),
        ..PaymentUpdates::default()
    };
    let mut next_status = None;
    let mut message = String::new();

    if payment.is_paid() {
        next_status = Some(PaymentStatus::Confirmed);
        if let Some(value) = payment.captured_value()? {
            updates.captured_amount = Some(parse_value(value)?);
        }
    } else if payment.is_canceled() || payment.is_expired() {
        next_status = Some(PaymentStatus::Rejected);
        message = failed_message(&payment.status);
    } else if payment.is_failed() {
        next_status = Some(PaymentStatus::Rejected);
        message = failed_message(&payment.status);

        let failure_reason = payment.detail("failureReason");
        let failure_message = payment.detail("failureMessage");

        if let Some(reason) = failure_reason {
            message.push_str(&format!(" reason='{}'", reason));
        }
        if let Some(text) = failure_message {
            message.push_str(&format!(" message='{}'", text));
        }

        if failure_reason == Some(FRAUD_FAILURE_REASON) {
            updates.fraud_status = Some(FraudStatus::Reject);
            updates.fraud_message = Some(failure_message.unwrap_or_default().to_string());
        }
    } else if payment.is_open() || payment.is_pending() {
        // The user or Mollie hasn't finished the payment flow yet
    } else {
        // `authorized` only occurs for Mollie orders, never for payments
        next_status = Some(PaymentStatus::Error);
        message = format!("Mollie returned unexpected status '{}'", payment.status);
    }

    Ok(StatusTransition {
        next_status,
        message,
        updates,
    })
}

fn failed_message(status: &str) -> String {
    format!("Mollie payment failed with status '{}'", status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaymentError;
    use rust_decimal::Decimal;
    use serde_json::{Value, json};

    fn parse(data: Value) -> StatusTransition {
        parse_payment_status(&MolliePayment::from_value(data).unwrap()).unwrap()
    }

    fn without_extra_data(mut updates: PaymentUpdates) -> PaymentUpdates {
        assert!(
            updates.extra_data.take().is_some(),
            "updates should always contain extra_data"
        );
        updates
    }

    #[test]
    fn test_status_table() {
        let cases = [
            (
                json!({"paidAt": "2018-03-20T09:28:37+00:00"}),
                Some(PaymentStatus::Confirmed),
                "",
            ),
            (
                json!({"status": "canceled"}),
                Some(PaymentStatus::Rejected),
                "Mollie payment failed with status 'canceled'",
            ),
            (
                json!({"status": "expired"}),
                Some(PaymentStatus::Rejected),
                "Mollie payment failed with status 'expired'",
            ),
            (
                json!({"status": "failed"}),
                Some(PaymentStatus::Rejected),
                "Mollie payment failed with status 'failed'",
            ),
            (json!({"status": "open"}), None, ""),
            (json!({"status": "pending"}), None, ""),
            (
                json!({"status": "authorized"}),
                Some(PaymentStatus::Error),
                "Mollie returned unexpected status 'authorized'",
            ),
        ];

        for (data, expected_status, expected_message) in cases {
            let transition = parse(data.clone());
            assert_eq!(transition.next_status, expected_status, "{}", data);
            assert_eq!(transition.message, expected_message, "{}", data);
            assert_eq!(
                without_extra_data(transition.updates),
                PaymentUpdates::default(),
                "{}",
                data
            );
        }
    }

    #[test]
    fn test_open_payment_only_stores_snapshot() {
        let transition = parse(json!({"status": "open"}));

        assert_eq!(transition.next_status, None);
        assert_eq!(transition.message, "");
        assert_eq!(
            transition.updates.extra_data.as_deref(),
            Some(r#"{"status":"open"}"#)
        );
    }

    #[test]
    fn test_paid_with_captured_amount() {
        let transition = parse(json!({
            "paidAt": "2018-03-20T09:28:37+00:00",
            "amountCaptured": {"value": "13.37", "currency": "EUR"}
        }));

        assert_eq!(transition.next_status, Some(PaymentStatus::Confirmed));
        assert_eq!(
            transition.updates.captured_amount,
            Some(Decimal::new(1337, 2))
        );
    }

    #[test]
    fn test_unparseable_captured_amount() {
        let payment = MolliePayment::from_value(json!({
            "status": "paid",
            "amountCaptured": {"value": "a lot", "currency": "EUR"}
        }))
        .unwrap();

        assert!(matches!(
            parse_payment_status(&payment),
            Err(PaymentError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_failure_details_are_appended() {
        let transition = parse(json!({
            "status": "failed",
            "details": {
                "failureReason": "some-reason",
                "failureMessage": "Details about failure"
            }
        }));

        assert_eq!(transition.next_status, Some(PaymentStatus::Rejected));
        assert_eq!(
            transition.message,
            "Mollie payment failed with status 'failed' reason='some-reason' message='Details about failure'"
        );
        assert_eq!(
            without_extra_data(transition.updates),
            PaymentUpdates::default()
        );
    }

    #[test]
    fn test_fraud_is_flagged() {
        let transition = parse(json!({
            "status": "failed",
            "details": {"failureReason": "possible_fraud", "failureMessage": "m"}
        }));

        assert_eq!(transition.next_status, Some(PaymentStatus::Rejected));
        let updates = without_extra_data(transition.updates);
        assert_eq!(updates.fraud_status, Some(FraudStatus::Reject));
        assert_eq!(updates.fraud_message.as_deref(), Some("m"));
    }

    #[test]
    fn test_paid_wins_over_failure_details() {
        let transition = parse(json!({
            "status": "failed",
            "paidAt": "2018-03-20T09:28:37+00:00",
            "details": {"failureReason": "possible_fraud", "failureMessage": "m"}
        }));

        assert_eq!(transition.next_status, Some(PaymentStatus::Confirmed));
        assert_eq!(transition.message, "");
        assert_eq!(transition.updates.fraud_status, None);
    }

    #[test]
    fn test_unknown_status() {
        let transition = parse(json!({"status": "hoeba"}));

        assert_eq!(transition.next_status, Some(PaymentStatus::Error));
        assert_eq!(
            transition.message,
            "Mollie returned unexpected status 'hoeba'"
        );
    }

    #[test]
    fn test_translation_is_repeatable() {
        let payment = MolliePayment::from_value(json!({
            "id": "tr_12345",
            "status": "failed",
            "details": {"failureReason": "card_declined"}
        }))
        .unwrap();

        assert_eq!(
            parse_payment_status(&payment).unwrap(),
            parse_payment_status(&payment).unwrap()
        );
    }
}
