//! Mollie payment creation payload

use crate::{
    address::{BillingAddress, build_billing_address},
    error::{PaymentError, PaymentResult},
    money::Amount,
    record::PaymentRecord,
};
use serde::{Deserialize, Serialize};

/// Body of `POST /v2/payments`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub amount: Amount,
    pub description: String,
    pub redirect_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address: Option<BillingAddress>,
}

/// Build the creation payload for a payment.
///
/// An empty currency or a zero total is caller misuse and fails with
/// [`PaymentError::Precondition`].
pub fn build_payment_request<R: PaymentRecord + ?Sized>(
    payment: &R,
    return_url: &str,
) -> PaymentResult<CreatePaymentRequest> {
    if payment.currency().is_empty() {
        return Err(PaymentError::Precondition(
            "The payment has no currency, but it is required".into(),
        ));
    }
    if payment.total().is_zero() {
        return Err(PaymentError::Precondition(
            "The payment has no total amount, but it is required".into(),
        ));
    }

    let request = CreatePaymentRequest {
        amount: Amount::new(payment.total(), payment.currency()),
        description: payment.description().to_string(),
        redirect_url: return_url.to_string(),
        billing_address: build_billing_address(payment.billing()),
    };

    tracing::debug!(
        amount = %request.amount,
        has_billing_address = request.billing_address.is_some(),
        "Built Mollie payment request"
    );

    Ok(request)
}
