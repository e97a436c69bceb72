// payments-mollie - Mollie payment provider for Rust applications
//
// This library connects an application's payment records to the Mollie
// payment service provider.

// Re-export core functionality
pub use mollie_payments::*;

// Needed by host applications implementing `PaymentRecord`
pub use async_trait::async_trait;
pub use serde_json;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        BillingDetails,
        CallbackResponse,
        ErrorKind,
        FraudStatus,
        InitiateOutcome,
        MemoryPayment,
        MollieClient,
        MollieConfig,
        MolliePayment,
        MollieProvider,
        PaymentError,
        PaymentGateway,
        PaymentRecord,
        PaymentResult,
        PaymentStatus,
        PaymentUpdates,
        async_trait,
    };
}
