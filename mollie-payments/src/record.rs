//! The payment record contract and an in-memory implementation
//!
//! The host application owns its payments. The provider only needs the narrow
//! set of capabilities in [`PaymentRecord`]: read a handful of fields, move the
//! status forward, persist field updates, and resolve the pages the user is sent
//! back to.

use crate::{
    error::{PaymentError, PaymentResult, ValidationErrors},
    types::{BillingDetails, FraudStatus, PaymentStatus, PaymentUpdates, StatusChange},
};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Capabilities the provider requires from a host payment
#[async_trait]
pub trait PaymentRecord: Send + Sync {
    /// Current status
    fn status(&self) -> PaymentStatus;

    /// Total amount to charge
    fn total(&self) -> Decimal;

    /// ISO 4217 currency code
    fn currency(&self) -> &str;

    /// Description shown to the user at Mollie
    fn description(&self) -> &str;

    /// Mollie payment id, empty until the remote payment exists
    fn transaction_id(&self) -> &str;

    /// Billing fields
    fn billing(&self) -> &BillingDetails;

    /// Opaque token identifying the payment in callback URLs
    fn token(&self) -> &str;

    /// Where the user goes after a successful payment
    fn success_url(&self) -> String;

    /// Where the user goes after a failed or abandoned payment
    fn failure_url(&self) -> String;

    /// Transition to a new status and append an audit trail entry
    async fn change_status(&mut self, status: PaymentStatus, message: &str) -> PaymentResult<()>;

    /// Persist field updates in a single write.
    ///
    /// Implementations must not run full-entity validation here.
    async fn apply_updates(&mut self, updates: &PaymentUpdates) -> PaymentResult<()>;
}

/// Validate the fields Mollie requires on every payment.
///
/// When `update_fields` lists fields, only those are checked. An empty list
/// checks everything, like `None`.
pub fn validate_required_fields<R: PaymentRecord + ?Sized>(
    record: &R,
    update_fields: Option<&[&str]>,
) -> Result<(), ValidationErrors> {
    let update_fields = update_fields.filter(|fields| !fields.is_empty());
    let selected =
        |field: &str| update_fields.is_none_or(|fields| fields.iter().any(|f| *f == field));
    let mut errors = ValidationErrors::new();

    if selected("total") && record.total().is_zero() {
        errors.add("total", required_message("total"));
    }
    if selected("currency") && record.currency().is_empty() {
        errors.add("currency", required_message("currency"));
    }
    if selected("description") && record.description().is_empty() {
        errors.add("description", required_message("description"));
    }

    errors.into_result()
}

fn required_message(field: &str) -> String {
    format!("Mollie requires '{}' to be set", field)
}

/// In-memory payment, useful for tests and for hosts without persistence
#[derive(Debug, Clone)]
pub struct MemoryPayment {
    pub id: Uuid,
    pub token: String,
    pub status: PaymentStatus,
    pub message: String,
    pub total: Decimal,
    pub currency: String,
    pub description: String,
    pub transaction_id: String,
    pub billing: BillingDetails,
    pub captured_amount: Decimal,
    pub extra_data: String,
    pub fraud_status: FraudStatus,
    pub fraud_message: String,
    pub success_url: String,
    pub failure_url: String,
    pub history: Vec<StatusChange>,
}

impl MemoryPayment {
    /// Create a waiting payment
    pub fn new(total: Decimal, currency: impl Into<String>, description: impl Into<String>) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            token: Uuid::new_v4().to_string(),
            status: PaymentStatus::Waiting,
            message: String::new(),
            total,
            currency: currency.into(),
            description: description.into(),
            transaction_id: String::new(),
            billing: BillingDetails::default(),
            captured_amount: Decimal::ZERO,
            extra_data: String::new(),
            fraud_status: FraudStatus::Unknown,
            fraud_message: String::new(),
            success_url: format!("/payments/{}/success/", id),
            failure_url: format!("/payments/{}/failure/", id),
            history: Vec::new(),
        }
    }

    /// A payment that was already sent to Mollie
    pub fn submitted(mut self, transaction_id: impl Into<String>) -> Self {
        self.status = PaymentStatus::Input;
        self.transaction_id = transaction_id.into();
        self
    }

    /// With status
    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    /// With billing details
    pub fn with_billing(mut self, billing: BillingDetails) -> Self {
        self.billing = billing;
        self
    }

    /// With redirect targets
    pub fn with_urls(mut self, success: impl Into<String>, failure: impl Into<String>) -> Self {
        self.success_url = success.into();
        self.failure_url = failure.into();
        self
    }

    /// Validate and accept the payment as a full save
    pub fn save(&self) -> PaymentResult<()> {
        validate_required_fields(self, None).map_err(PaymentError::from)
    }

    /// Validate only the given fields, as a partial save would
    pub fn save_fields(&self, update_fields: &[&str]) -> PaymentResult<()> {
        validate_required_fields(self, Some(update_fields)).map_err(PaymentError::from)
    }
}

#[async_trait]
impl PaymentRecord for MemoryPayment {
    fn status(&self) -> PaymentStatus {
        self.status
    }

    fn total(&self) -> Decimal {
        self.total
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    fn billing(&self) -> &BillingDetails {
        &self.billing
    }

    fn token(&self) -> &str {
        &self.token
    }

    fn success_url(&self) -> String {
        self.success_url.clone()
    }

    fn failure_url(&self) -> String {
        self.failure_url.clone()
    }

    async fn change_status(&mut self, status: PaymentStatus, message: &str) -> PaymentResult<()> {
        self.history.push(StatusChange {
            from: self.status,
            to: status,
            message: message.to_string(),
            changed_at: Utc::now(),
        });
        self.status = status;
        self.message = message.to_string();
        Ok(())
    }

    async fn apply_updates(&mut self, updates: &PaymentUpdates) -> PaymentResult<()> {
        if let Some(id) = &updates.transaction_id {
            self.transaction_id = id.clone();
        }
        if let Some(amount) = updates.captured_amount {
            self.captured_amount = amount;
        }
        if let Some(extra_data) = &updates.extra_data {
            self.extra_data = extra_data.clone();
        }
        if let Some(fraud_status) = updates.fraud_status {
            self.fraud_status = fraud_status;
        }
        if let Some(fraud_message) = &updates.fraud_message {
            self.fraud_message = fraud_message.clone();
        }
        Ok(())
    }
}
