//! Payment types and data structures

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Local payment status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Created locally, nothing sent to Mollie yet
    #[default]
    Waiting,
    /// Sent to Mollie, the user is completing the checkout
    Input,
    /// Authorized but not captured
    Preauth,
    /// Paid
    Confirmed,
    /// Canceled, expired or failed at Mollie
    Rejected,
    /// Communication failure or unexpected Mollie state
    Error,
    /// Refunded
    Refunded,
}

impl PaymentStatus {
    /// Status code string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Input => "input",
            Self::Preauth => "preauth",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Error => "error",
            Self::Refunded => "refunded",
        }
    }

    /// Parse from string
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "waiting" => Some(Self::Waiting),
            "input" => Some(Self::Input),
            "preauth" => Some(Self::Preauth),
            "confirmed" => Some(Self::Confirmed),
            "rejected" => Some(Self::Rejected),
            "error" => Some(Self::Error),
            "refunded" => Some(Self::Refunded),
            _ => None,
        }
    }

    /// Whether the user should land on the success page
    pub fn is_successful(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Preauth)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fraud assessment of a payment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FraudStatus {
    #[default]
    Unknown,
    Accept,
    Reject,
    Review,
}

impl FraudStatus {
    /// Status code string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Review => "review",
        }
    }
}

impl fmt::Display for FraudStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing fields of a payment; empty strings mean "not provided"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDetails {
    pub address_1: String,
    pub address_2: String,
    pub city: String,
    pub postcode: String,
    pub country_area: String,
    pub country_code: String,
}

impl BillingDetails {
    /// Create billing details from the three fields Mollie requires
    pub fn new(
        address_1: impl Into<String>,
        city: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            address_1: address_1.into(),
            city: city.into(),
            country_code: country_code.into(),
            ..Self::default()
        }
    }

    /// With second address line
    pub fn address_2(mut self, address_2: impl Into<String>) -> Self {
        self.address_2 = address_2.into();
        self
    }

    /// With postal code
    pub fn postcode(mut self, postcode: impl Into<String>) -> Self {
        self.postcode = postcode.into();
        self
    }

    /// With region
    pub fn country_area(mut self, country_area: impl Into<String>) -> Self {
        self.country_area = country_area.into();
        self
    }
}

/// Field updates to persist on a payment in a single write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentUpdates {
    pub transaction_id: Option<String>,
    pub captured_amount: Option<Decimal>,
    pub extra_data: Option<String>,
    pub fraud_status: Option<FraudStatus>,
    pub fraud_message: Option<String>,
}

impl PaymentUpdates {
    /// No field is set
    pub fn is_empty(&self) -> bool {
        self.transaction_id.is_none()
            && self.captured_amount.is_none()
            && self.extra_data.is_none()
            && self.fraud_status.is_none()
            && self.fraud_message.is_none()
    }

    /// Update only the transaction id
    pub fn transaction_id(id: impl Into<String>) -> Self {
        Self {
            transaction_id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Audit trail entry written on every status transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: PaymentStatus,
    pub to: PaymentStatus,
    pub message: String,
    pub changed_at: DateTime<Utc>,
}
