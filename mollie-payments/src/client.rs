//! HTTP client for the Mollie payments API

use crate::{config::MollieConfig, payload::CreatePaymentRequest, response::MolliePayment};
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Failures talking to Mollie
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never got a response
    #[error("Unable to communicate with Mollie: {0}")]
    Network(String),

    /// Mollie answered with an error document
    #[error("{detail}")]
    Api {
        status: u16,
        title: String,
        detail: String,
    },

    /// The response body could not be decoded
    #[error("Unable to decode Mollie API response (status code: {status}): '{body}'.")]
    Decode { status: u16, body: String },

    /// The request could not be built
    #[error("{0}")]
    InvalidRequest(String),
}

impl GatewayError {
    /// HTTP status of the failed response, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Decode { status, .. } => Some(*status),
            Self::Network(_) | Self::InvalidRequest(_) => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Network(err.to_string())
    }
}

/// Access to Mollie payment resources
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment
    async fn create(&self, request: &CreatePaymentRequest) -> Result<MolliePayment, GatewayError>;

    /// Fetch a payment by id
    async fn get(&self, payment_id: &str) -> Result<MolliePayment, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct MollieErrorResponse {
    status: u16,
    title: String,
    detail: String,
    field: Option<String>,
}

/// reqwest-backed Mollie client
pub struct MollieClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
    user_agent: String,
}

impl MollieClient {
    /// Create a client from configuration
    pub fn new(config: &MollieConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.api_base_url().clone(),
            api_key: SecretString::from(config.api_key().to_string()),
            user_agent: config.user_agent().to_string(),
        }
    }

    /// Use a preconfigured reqwest client
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// API base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// User-Agent sent with every request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn payments_url(&self, payment_id: Option<&str>) -> Result<Url, GatewayError> {
        let mut url = self
            .base_url
            .join("payments")
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;

        if let Some(id) = payment_id {
            url.path_segments_mut()
                .map_err(|_| GatewayError::InvalidRequest("base URL cannot have a path".into()))?
                .push(id);
        }
        Ok(url)
    }

    async fn handle_response(response: reqwest::Response) -> Result<MolliePayment, GatewayError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::error_from_body(status, &body));
        }

        MolliePayment::from_slice(body.as_bytes()).map_err(|_| GatewayError::Decode {
            status: status.as_u16(),
            body,
        })
    }

    fn error_from_body(status: StatusCode, body: &str) -> GatewayError {
        match serde_json::from_str::<MollieErrorResponse>(body) {
            Ok(error) => {
                let detail = match error.field {
                    Some(field) => format!("{} (field: {})", error.detail, field),
                    None => error.detail,
                };
                GatewayError::Api {
                    status: error.status,
                    title: error.title,
                    detail,
                }
            }
            Err(_) => GatewayError::Decode {
                status: status.as_u16(),
                body: body.to_string(),
            },
        }
    }
}

#[async_trait]
impl PaymentGateway for MollieClient {
    async fn create(&self, request: &CreatePaymentRequest) -> Result<MolliePayment, GatewayError> {
        let url = self.payments_url(None)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(self.api_key.expose_secret())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .json(request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    async fn get(&self, payment_id: &str) -> Result<MolliePayment, GatewayError> {
        if payment_id.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(format!(
                "Invalid payment ID: '{}'",
                payment_id
            )));
        }

        let url = self.payments_url(Some(payment_id))?;
        let response = self
            .client
            .get(url)
            .bearer_auth(self.api_key.expose_secret())
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        Self::handle_response(response).await
    }
}
