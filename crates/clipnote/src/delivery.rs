//! Delivery of classified entries to the remote endpoint.
//!
//! This module performs one HTTP POST per entry against the configured web
//! app endpoint. There is no retry policy here; a failed attempt is reported
//! to the caller, who decides what the failure means for the current cycle.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::entry::{DeliveryPayload, EnsureSectionsRequest};

/// Response body the endpoint must return for a successful request.
const OK_BODY: &str = "OK";

/// Errors from a single delivery attempt.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The endpoint replied, but not with a 2xx status and a literal `OK`
    /// body.
    #[error("endpoint rejected request: status={status} body={body}")]
    Rejected {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body, trimmed.
        body: String,
    },

    /// No usable response: connect failure, timeout, or transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A local failure outside the HTTP exchange itself.
    #[error("unexpected delivery failure: {0}")]
    Unexpected(String),
}

/// Result type for delivery operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;

/// Something that can deliver a payload to the remote document.
///
/// The watcher is generic over this seam so its loop can be exercised with
/// a recording fake instead of a network.
#[async_trait]
pub trait Deliver: Send + Sync {
    /// Perform one delivery attempt.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] describing why the attempt failed.
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<()>;
}

/// HTTP client for the remote web app endpoint.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    http: Client,
    endpoint_url: String,
}

impl DeliveryClient {
    /// Create a client with a bounded per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(endpoint_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint_url: endpoint_url.into(),
        })
    }

    /// Ask the endpoint to create any missing section headings.
    ///
    /// # Errors
    ///
    /// Returns a [`DeliveryError`] when the endpoint does not accept the
    /// request.
    pub async fn ensure_sections(&self, sections: &[String]) -> Result<()> {
        let request = EnsureSectionsRequest::new(sections.to_vec());
        self.post_expecting_ok(&request).await
    }

    /// POST a JSON body and require the 2xx + `OK` success shape.
    async fn post_expecting_ok<T: Serialize + Sync>(&self, body: &T) -> Result<()> {
        let json = serde_json::to_vec(body)
            .map_err(|e| DeliveryError::Unexpected(format!("payload serialization failed: {e}")))?;

        let response = self
            .http
            .post(&self.endpoint_url)
            .header(CONTENT_TYPE, "application/json")
            .body(json)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let body = body.trim();

        if status.is_success() && body == OK_BODY {
            Ok(())
        } else {
            debug!(status = status.as_u16(), body, "endpoint rejected request");
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body: body.to_string(),
            })
        }
    }
}

#[async_trait]
impl Deliver for DeliveryClient {
    async fn deliver(&self, payload: &DeliveryPayload) -> Result<()> {
        self.post_expecting_ok(payload).await
    }
}
