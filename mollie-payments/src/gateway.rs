//! Payment-level operations on top of a [`PaymentGateway`]
//!
//! These calls check the local payment before contacting Mollie and turn
//! transport failures into [`PaymentError::Gateway`]. They never change the
//! payment; recording failures is up to the caller.

use crate::{
    client::PaymentGateway,
    error::{PaymentError, PaymentResult},
    payload::build_payment_request,
    record::PaymentRecord,
    response::MolliePayment,
    types::PaymentStatus,
};

/// Create the remote payment for a waiting payment
pub async fn create_payment<G, R>(
    gateway: &G,
    payment: &R,
    return_url: &str,
) -> PaymentResult<MolliePayment>
where
    G: PaymentGateway + ?Sized,
    R: PaymentRecord + ?Sized,
{
    if payment.status() != PaymentStatus::Waiting {
        return Err(PaymentError::IncorrectStatus {
            expected: PaymentStatus::Waiting,
            actual: payment.status(),
        });
    }

    let request = build_payment_request(payment, return_url)?;

    gateway
        .create(&request)
        .await
        .map_err(|e| PaymentError::gateway("Failed to create payment at Mollie", e))
}

/// Fetch the current state of the remote payment
pub async fn retrieve_payment<G, R>(gateway: &G, payment: &R) -> PaymentResult<MolliePayment>
where
    G: PaymentGateway + ?Sized,
    R: PaymentRecord + ?Sized,
{
    let transaction_id = payment.transaction_id();
    if transaction_id.is_empty() {
        return Err(PaymentError::TransactionIdUnknown);
    }

    tracing::debug!(transaction_id = %transaction_id, "Retrieving Mollie payment");

    gateway
        .get(transaction_id)
        .await
        .map_err(|e| PaymentError::gateway("Failed to retrieve payment at Mollie", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::GatewayError, error::ErrorKind, payload::CreatePaymentRequest,
        record::MemoryPayment,
    };
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingGateway {
        requests: Mutex<Vec<CreatePaymentRequest>>,
        fetched: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl PaymentGateway for RecordingGateway {
        async fn create(
            &self,
            request: &CreatePaymentRequest,
        ) -> Result<MolliePayment, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.fail {
                return Err(GatewayError::Decode {
                    status: 400,
                    body: String::new(),
                });
            }
            Ok(MolliePayment::from_value(json!({"id": "tr_12345", "status": "open"})).unwrap())
        }

        async fn get(&self, payment_id: &str) -> Result<MolliePayment, GatewayError> {
            self.fetched.lock().unwrap().push(payment_id.to_string());
            if self.fail {
                return Err(GatewayError::Decode {
                    status: 404,
                    body: String::new(),
                });
            }
            Ok(MolliePayment::from_value(json!({"id": payment_id, "status": "paid"})).unwrap())
        }
    }

    fn payment() -> MemoryPayment {
        MemoryPayment::new(Decimal::new(1999, 2), "EUR", "Order #1")
    }

    #[tokio::test]
    async fn test_create_payment_sends_payload() {
        let gateway = RecordingGateway::default();
        let created = create_payment(&gateway, &payment(), "https://example.com/return-url/")
            .await
            .unwrap();

        assert_eq!(created.id, "tr_12345");
        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].amount.value, "19.99");
        assert_eq!(requests[0].redirect_url, "https://example.com/return-url/");
    }

    #[tokio::test]
    async fn test_create_payment_requires_waiting_status() {
        let gateway = RecordingGateway::default();
        let payment = payment().with_status(PaymentStatus::Confirmed);

        let err = create_payment(&gateway, &payment, "https://example.com/")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BusinessRule);
        assert!(err.to_string().starts_with("Payment status is incorrect"));
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_payment_precondition_skips_gateway() {
        let gateway = RecordingGateway::default();
        let payment = MemoryPayment::new(Decimal::ZERO, "EUR", "Order");

        let err = create_payment(&gateway, &payment, "https://example.com/")
            .await
            .unwrap_err();

        assert!(err.is_programming_error());
        assert!(gateway.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_payment_gateway_failure() {
        let gateway = RecordingGateway {
            fail: true,
            ..Default::default()
        };

        let err = create_payment(&gateway, &payment(), "https://example.com/")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to create payment at Mollie");
        assert_eq!(
            err.gateway_message(),
            Some("Unable to decode Mollie API response (status code: 400): ''.")
        );
    }

    #[tokio::test]
    async fn test_retrieve_payment() {
        let gateway = RecordingGateway::default();
        let payment = payment().submitted("tr_12345");

        let remote = retrieve_payment(&gateway, &payment).await.unwrap();

        assert!(remote.is_paid());
        assert_eq!(*gateway.fetched.lock().unwrap(), vec!["tr_12345".to_string()]);
    }

    #[tokio::test]
    async fn test_retrieve_payment_without_transaction_id() {
        let gateway = RecordingGateway::default();

        let err = retrieve_payment(&gateway, &payment()).await.unwrap_err();

        assert!(matches!(err, PaymentError::TransactionIdUnknown));
        assert_eq!(err.to_string(), "Mollie payment id is unknown");
        assert!(gateway.fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_payment_gateway_failure() {
        let gateway = RecordingGateway {
            fail: true,
            ..Default::default()
        };
        let payment = payment().submitted("tr_12345");

        let err = retrieve_payment(&gateway, &payment).await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to retrieve payment at Mollie");
        assert_eq!(
            err.gateway_message(),
            Some("Unable to decode Mollie API response (status code: 404): ''.")
        );
    }
}
