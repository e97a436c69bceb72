//! Mollie provider: drives a local payment through the Mollie flow

use crate::{
    callback::{CallbackResponse, InitiateOutcome, is_allowed},
    client::{MollieClient, PaymentGateway},
    config::MollieConfig,
    error::{PaymentError, PaymentResult},
    gateway::{create_payment, retrieve_payment},
    record::PaymentRecord,
    response::MolliePayment,
    status::parse_payment_status,
    types::{PaymentStatus, PaymentUpdates},
};
use http::Method;

/// Payment provider backed by Mollie
pub struct MollieProvider<G = MollieClient> {
    gateway: G,
    config: MollieConfig,
}

impl MollieProvider<MollieClient> {
    /// Create a provider talking to the Mollie API
    pub fn new(config: MollieConfig) -> Self {
        let gateway = MollieClient::new(&config);
        Self { gateway, config }
    }
}

impl<G: PaymentGateway> MollieProvider<G> {
    /// Create a provider with a custom gateway
    pub fn with_gateway(gateway: G, config: MollieConfig) -> Self {
        Self { gateway, config }
    }

    /// Provider configuration
    pub fn config(&self) -> &MollieConfig {
        &self.config
    }

    /// The gateway used for API calls
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// URL Mollie sends the user back to, also used as the callback endpoint
    pub fn return_url<R: PaymentRecord + ?Sized>(&self, payment: &R) -> String {
        format!(
            "{}://{}/payments/process/{}/",
            self.config.scheme(),
            self.config.payment_host(),
            payment.token()
        )
    }

    /// Create the payment at Mollie.
    ///
    /// A gateway failure moves the payment to `error` before it is returned.
    pub async fn create_remote_payment<R: PaymentRecord + ?Sized>(
        &self,
        payment: &mut R,
    ) -> PaymentResult<MolliePayment> {
        let return_url = self.return_url(payment);
        let created = create_payment(&self.gateway, payment, &return_url).await;
        match created {
            Err(err) => Err(record_gateway_failure(payment, err).await),
            result => result,
        }
    }

    /// Fetch the payment from Mollie.
    ///
    /// A gateway failure moves the payment to `error` before it is returned.
    pub async fn retrieve_remote_payment<R: PaymentRecord + ?Sized>(
        &self,
        payment: &mut R,
    ) -> PaymentResult<MolliePayment> {
        let retrieved = retrieve_payment(&self.gateway, payment).await;
        match retrieved {
            Err(err) => Err(record_gateway_failure(payment, err).await),
            result => result,
        }
    }

    /// Start the payment flow for a waiting payment
    pub async fn initiate<R: PaymentRecord + ?Sized>(
        &self,
        payment: &mut R,
    ) -> PaymentResult<InitiateOutcome> {
        if payment.status() != PaymentStatus::Waiting {
            return Err(PaymentError::IncorrectStatus {
                expected: PaymentStatus::Waiting,
                actual: payment.status(),
            });
        }

        let remote = self.create_remote_payment(payment).await?;

        payment
            .apply_updates(&PaymentUpdates::transaction_id(remote.id.clone()))
            .await?;
        payment.change_status(PaymentStatus::Input, "").await?;

        tracing::info!(
            transaction_id = %remote.id,
            status = %remote.status,
            "Created Mollie payment"
        );

        Ok(match remote.checkout_url {
            Some(url) => InitiateOutcome::RedirectTo(url),
            None => InitiateOutcome::Ready(payment.status()),
        })
    }

    /// Handle a request on the callback endpoint.
    ///
    /// Mollie POSTs webhooks here and the user's browser returns here with GET;
    /// both bring the payment up to date with Mollie.
    pub async fn reconcile<R: PaymentRecord + ?Sized>(
        &self,
        payment: &mut R,
        method: &Method,
    ) -> PaymentResult<CallbackResponse> {
        if !is_allowed(method) {
            return Ok(CallbackResponse::MethodNotAllowed);
        }

        let remote = self.retrieve_remote_payment(payment).await?;
        let mut transition = parse_payment_status(&remote)?;

        if transition.next_status == Some(PaymentStatus::Confirmed)
            && transition.updates.captured_amount.is_none()
        {
            transition.updates.captured_amount = Some(payment.total());
        }

        if let Some(status) = transition.next_status {
            tracing::info!(
                transaction_id = %remote.id,
                from = %payment.status(),
                to = %status,
                "Updating payment status"
            );
            payment.change_status(status, &transition.message).await?;
        }
        payment.apply_updates(&transition.updates).await?;

        if *method == Method::POST {
            return Ok(CallbackResponse::Acknowledged);
        }

        let target = if payment.status().is_successful() {
            payment.success_url()
        } else {
            payment.failure_url()
        };
        Ok(CallbackResponse::Redirect(target))
    }
}

async fn record_gateway_failure<R: PaymentRecord + ?Sized>(
    payment: &mut R,
    err: PaymentError,
) -> PaymentError {
    let Some(gateway_message) = err.gateway_message() else {
        return err;
    };

    tracing::warn!(
        transaction_id = %payment.transaction_id(),
        error = %gateway_message,
        "{}", err
    );

    let recorded = payment
        .change_status(PaymentStatus::Error, gateway_message)
        .await;
    match recorded {
        Ok(()) => err,
        Err(storage) => storage,
    }
}
