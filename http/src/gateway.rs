//! Backend order gateway client.
//!
//! Speaks the documented contract: `POST {base_url}/api/shop/order` with
//! `{ "order": ..., "source": "<token id>" }`. Any 2xx is success. No
//! authentication header is sent on this path.

use async_trait::async_trait;
use greengrocer_core::error::SubmissionError;
use greengrocer_core::order::OrderPayload;
use greengrocer_core::synapse::OrderGateway;
use serde::Serialize;

const ORDER_PATH: &str = "/api/shop/order";

#[derive(Serialize)]
struct PlaceOrderBody<'a> {
    order: &'a OrderPayload,
    source: &'a str,
}

/// Reqwest-backed [`OrderGateway`]. One POST per `place_order` call,
/// no retries; timeouts are whatever the supplied client enforces.
pub struct HttpOrderGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrderGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Use a preconfigured client (timeouts, proxies) instead of the default.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        HttpOrderGateway {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl OrderGateway for HttpOrderGateway {
    async fn place_order(&self, order: &OrderPayload, source: &str) -> Result<(), SubmissionError> {
        let url = format!("{}{ORDER_PATH}", self.base_url);
        tracing::debug!(%url, "posting order");

        let response = self
            .client
            .post(&url)
            .json(&PlaceOrderBody { order, source })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SubmissionError::Timeout
                } else {
                    SubmissionError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SubmissionError::Status(status.as_u16()))
        }
    }
}
