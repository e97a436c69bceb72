//! HTTP responses produced by the provider's callback endpoint

use http::{Method, Response, StatusCode, header};

/// Body returned to Mollie after a webhook call
pub const WEBHOOK_ACK_BODY: &[u8] = b"webhook processed";

/// Methods accepted on the callback endpoint
pub const ALLOWED_METHODS: [Method; 2] = [Method::GET, Method::POST];

/// Result of starting a payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitiateOutcome {
    /// Send the user to Mollie's checkout
    RedirectTo(String),
    /// Mollie offered no checkout; the payment is in the given status
    Ready(crate::types::PaymentStatus),
}

impl InitiateOutcome {
    /// Checkout URL, if the user must be redirected
    pub fn redirect_url(&self) -> Option<&str> {
        match self {
            Self::RedirectTo(url) => Some(url),
            Self::Ready(_) => None,
        }
    }
}

/// Response to a callback request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackResponse {
    /// Webhook processed
    Acknowledged,
    /// Browser return; send the user on
    Redirect(String),
    /// Only GET and POST are accepted
    MethodNotAllowed,
}

impl CallbackResponse {
    /// HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Acknowledged => StatusCode::OK,
            Self::Redirect(_) => StatusCode::FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Redirect target
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::Redirect(url) => Some(url),
            _ => None,
        }
    }

    /// Convert into an `http` response for the host framework
    pub fn into_response(self) -> Result<Response<Vec<u8>>, http::Error> {
        let builder = Response::builder().status(self.status());
        match self {
            Self::Acknowledged => builder
                .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
                .body(WEBHOOK_ACK_BODY.to_vec()),
            Self::Redirect(url) => builder.header(header::LOCATION, url).body(Vec::new()),
            Self::MethodNotAllowed => builder
                .header(header::ALLOW, allow_header())
                .body(Vec::new()),
        }
    }
}

/// Whether the callback endpoint accepts the method
pub fn is_allowed(method: &Method) -> bool {
    ALLOWED_METHODS.contains(method)
}

fn allow_header() -> String {
    ALLOWED_METHODS
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
