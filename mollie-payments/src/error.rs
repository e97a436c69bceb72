//! Error types for Mollie payment processing

use crate::types::PaymentStatus;
use std::fmt;
use thiserror::Error;

/// Payment error types
#[derive(Error, Debug)]
pub enum PaymentError {
    /// The caller passed a payment that can never be sent to Mollie.
    ///
    /// This is a programming error and is never recorded on the payment.
    #[error("{0}")]
    Precondition(String),

    /// The payment is not in the status the operation requires
    #[error("Payment status is incorrect: expected '{expected}', found '{actual}'")]
    IncorrectStatus {
        expected: PaymentStatus,
        actual: PaymentStatus,
    },

    /// The payment has no Mollie transaction id yet
    #[error("Mollie payment id is unknown")]
    TransactionIdUnknown,

    /// Communication with Mollie failed
    #[error("{message}")]
    Gateway {
        message: String,
        gateway_message: String,
    },

    /// Mollie returned data the adapter cannot interpret
    #[error("Invalid Mollie response: {0}")]
    InvalidResponse(String),

    /// Required payment fields are missing
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The payment record could not be persisted
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        PaymentError::Serialization(err.to_string())
    }
}

impl From<ValidationErrors> for PaymentError {
    fn from(errors: ValidationErrors) -> Self {
        PaymentError::Validation(errors)
    }
}

/// Result type for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

/// Broad classification of a [`PaymentError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller misuse; abort, never retry
    Programming,
    /// Operation preconditions on the payment were violated
    BusinessRule,
    /// Mollie could not be reached or rejected the request
    Gateway,
    /// Invalid data or storage failures inside the adapter
    Internal,
}

impl PaymentError {
    /// Build a gateway error from a summary and the underlying cause
    pub fn gateway(message: impl Into<String>, cause: impl fmt::Display) -> Self {
        PaymentError::Gateway {
            message: message.into(),
            gateway_message: cause.to_string(),
        }
    }

    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Precondition(_) => ErrorKind::Programming,
            Self::IncorrectStatus { .. } | Self::TransactionIdUnknown | Self::Validation(_) => {
                ErrorKind::BusinessRule
            }
            Self::Gateway { .. } => ErrorKind::Gateway,
            Self::InvalidResponse(_) | Self::Storage(_) | Self::Serialization(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// The message reported by Mollie or the transport, if any
    pub fn gateway_message(&self) -> Option<&str> {
        match self {
            Self::Gateway {
                gateway_message, ..
            } => Some(gateway_message),
            _ => None,
        }
    }

    /// Whether the error is caller misuse rather than a processing failure
    pub fn is_programming_error(&self) -> bool {
        self.kind() == ErrorKind::Programming
    }
}

/// Field-level validation failures, in field declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(&'static str, String)>,
}

impl ValidationErrors {
    /// Create an empty set of errors
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for a field
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    /// No failures recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for a field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    /// Names of the failing fields
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|(name, _)| *name).collect()
    }

    /// All messages
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|(_, message)| message.as_str()).collect()
    }

    /// Convert into a result, failing when any error was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            PaymentError::Precondition("no currency".into()).kind(),
            ErrorKind::Programming
        );
        assert_eq!(
            PaymentError::TransactionIdUnknown.kind(),
            ErrorKind::BusinessRule
        );
        assert_eq!(
            PaymentError::gateway("Failed", "boom").kind(),
            ErrorKind::Gateway
        );
        assert!(PaymentError::Precondition("x".into()).is_programming_error());
    }

    #[test]
    fn test_gateway_error_keeps_both_messages() {
        let err = PaymentError::gateway("Failed to create payment at Mollie", "connection refused");
        assert_eq!(err.to_string(), "Failed to create payment at Mollie");
        assert_eq!(err.gateway_message(), Some("connection refused"));
        assert_eq!(PaymentError::TransactionIdUnknown.gateway_message(), None);
    }

    #[test]
    fn test_incorrect_status_message() {
        let err = PaymentError::IncorrectStatus {
            expected: PaymentStatus::Waiting,
            actual: PaymentStatus::Confirmed,
        };
        assert!(err.to_string().starts_with("Payment status is incorrect"));
        assert!(err.to_string().contains("'confirmed'"));
    }

    #[test]
    fn test_validation_errors() {
        let mut errors = ValidationErrors::new();
        assert!(errors.clone().into_result().is_ok());

        errors.add("total", "Mollie requires 'total' to be set");
        errors.add("currency", "Mollie requires 'currency' to be set");

        assert_eq!(errors.fields(), vec!["total", "currency"]);
        assert_eq!(errors.get("currency"), Some("Mollie requires 'currency' to be set"));
        assert_eq!(errors.get("description"), None);
        assert!(errors.into_result().is_err());
    }
}
