//! Amount formatting for the Mollie API

use crate::error::{PaymentError, PaymentResult};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decimal places Mollie expects in amount values
pub const AMOUNT_DECIMALS: u32 = 2;

/// Amount as exchanged with Mollie: a currency code and a string value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// ISO 4217 currency code
    pub currency: String,
    /// Decimal value, e.g. `"120.00"`
    pub value: String,
}

impl Amount {
    /// Create an amount from a decimal total
    pub fn new(value: Decimal, currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            value: format_value(value),
        }
    }

    /// Parse the value back into a decimal
    pub fn to_decimal(&self) -> PaymentResult<Decimal> {
        parse_value(&self.value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.value)
    }
}

/// Format a decimal with exactly two decimal places
pub fn format_value(value: Decimal) -> String {
    let mut rounded =
        value.round_dp_with_strategy(AMOUNT_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(AMOUNT_DECIMALS);
    rounded.to_string()
}

/// Parse a Mollie amount value
pub fn parse_value(value: &str) -> PaymentResult<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|e| PaymentError::InvalidResponse(format!("invalid amount '{}': {}", value, e)))
}
