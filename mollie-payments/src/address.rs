//! Billing address mapping
//!
//! Mollie rejects a billing address that lacks the street, city or country, so
//! an address is only sent when all three are known.
//! See <https://docs.mollie.com/overview/common-data-types#address-object>.

use crate::types::BillingDetails;
use serde::{Deserialize, Serialize};

/// Advisory message for a partially filled billing address
pub const INCOMPLETE_ADDRESS_WARNING: &str = "Some billing address details are set in the payment object, but not enough to fulfill Mollie requirements, omitting the billing address.";

/// Billing address as sent to Mollie
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_and_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// How much of the required address data is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressCompleteness {
    /// None of the required fields are set
    Empty,
    /// Some, but not all, required fields are set
    Partial,
    /// Street, city and country code are all set
    Complete,
}

/// Classify the billing details against Mollie's required fields
pub fn completeness(billing: &BillingDetails) -> AddressCompleteness {
    let required = [&billing.address_1, &billing.city, &billing.country_code];
    let present = required.iter().filter(|field| !field.is_empty()).count();

    match present {
        0 => AddressCompleteness::Empty,
        n if n == required.len() => AddressCompleteness::Complete,
        _ => AddressCompleteness::Partial,
    }
}

/// Names of the required fields that are missing
pub fn missing_required_fields(billing: &BillingDetails) -> Vec<&'static str> {
    [
        ("billing_address_1", &billing.address_1),
        ("billing_city", &billing.city),
        ("billing_country_code", &billing.country_code),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
    .collect()
}

/// Build the Mollie billing address, or `None` when it can't be sent.
///
/// A partially filled address emits a warning event.
pub fn build_billing_address(billing: &BillingDetails) -> Option<BillingAddress> {
    match completeness(billing) {
        AddressCompleteness::Empty => return None,
        AddressCompleteness::Partial => {
            let missing = missing_required_fields(billing);
            tracing::warn!(missing = ?missing, "{}", INCOMPLETE_ADDRESS_WARNING);
            return None;
        }
        AddressCompleteness::Complete => {}
    }

    let mut street_and_number = billing.address_1.clone();
    if !billing.address_2.is_empty() {
        street_and_number.push(' ');
        street_and_number.push_str(&billing.address_2);
    }

    Some(BillingAddress {
        street_and_number: Some(street_and_number),
        postal_code: non_empty(&billing.postcode),
        city: non_empty(&billing.city),
        region: non_empty(&billing.country_area),
        country: non_empty(&billing.country_code),
    })
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
