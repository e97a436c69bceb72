//! Mollie Payment Provider
//!
//! Connects an application's payments to Mollie: builds the payment creation
//! request, follows the user through Mollie's checkout and maps Mollie's
//! payment lifecycle back onto the local payment status.
//!
//! ## Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        MollieProvider                            │
//! │             initiate() | reconcile() | return_url()              │
//! └─────────────────────────────────────────────────────────────────┘
//!        │                       │                        ▲
//!        ▼                       ▼                        │
//! ┌──────────────┐      ┌─────────────────┐     ┌──────────────────┐
//! │   Payload    │      │     Gateway     │     │ Status Translator│
//! │ (+ address)  │─────▶│ create | get    │────▶│ paid / failed /  │
//! └──────────────┘      └─────────────────┘     │ open / unknown   │
//!                                │              └──────────────────┘
//!                                ▼
//!                      ┌─────────────────┐
//!                      │  Mollie API v2  │
//!                      └─────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mollie_payments::{MollieConfig, MollieProvider, InitiateOutcome};
//!
//! let provider = MollieProvider::new(MollieConfig::from_env()?);
//!
//! // Checkout: send the user to Mollie
//! match provider.initiate(&mut payment).await? {
//!     InitiateOutcome::RedirectTo(url) => redirect(url),
//!     InitiateOutcome::Ready(status) => show_status(status),
//! }
//!
//! // Callback endpoint: webhook POSTs and browser returns
//! let response = provider.reconcile(&mut payment, request.method()).await?;
//! return response.into_response();
//! ```

pub mod address;
pub mod callback;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod money;
pub mod payload;
pub mod provider;
pub mod record;
pub mod response;
pub mod status;
pub mod types;

pub use address::{AddressCompleteness, BillingAddress, INCOMPLETE_ADDRESS_WARNING};
pub use callback::{CallbackResponse, InitiateOutcome};
pub use client::{GatewayError, MollieClient, PaymentGateway};
pub use config::{ConfigError, MollieConfig};
pub use error::*;
pub use gateway::{create_payment, retrieve_payment};
pub use money::Amount;
pub use payload::{CreatePaymentRequest, build_payment_request};
pub use provider::MollieProvider;
pub use record::{MemoryPayment, PaymentRecord, validate_required_fields};
pub use response::{MolliePayment, MolliePaymentStatus};
pub use status::{StatusTransition, parse_payment_status};
pub use types::*;
