//! Token service client.
//!
//! Exchanges the captured card state plus cardholder name for a
//! single-use token at `{base_url}/v1/tokens`, authenticated with a
//! *publishable* key only. Failure reasons are passed through verbatim;
//! this client never interprets them.

use async_trait::async_trait;
use greengrocer_core::error::TokenizationError;
use greengrocer_core::synapse::{CardInput, PaymentToken, PaymentTokenizer};
use serde::Deserialize;

const TOKENS_PATH: &str = "/v1/tokens";

#[derive(Deserialize)]
struct TokenResponse {
    id: String,
}

/// Reqwest-backed [`PaymentTokenizer`] against a Stripe-style token
/// endpoint.
pub struct HttpTokenizer {
    client: reqwest::Client,
    base_url: String,
    publishable_key: String,
}

impl HttpTokenizer {
    pub fn new(base_url: impl Into<String>, publishable_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, publishable_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        publishable_key: impl Into<String>,
    ) -> Self {
        HttpTokenizer {
            client,
            base_url: base_url.into(),
            publishable_key: publishable_key.into(),
        }
    }
}

#[async_trait]
impl PaymentTokenizer for HttpTokenizer {
    async fn create_token(
        &self,
        cardholder: &str,
        card: &CardInput,
    ) -> Result<PaymentToken, TokenizationError> {
        let url = format!("{}{TOKENS_PATH}", self.base_url);
        tracing::debug!(%url, "requesting card token");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.publishable_key)
            .form(&[
                ("card[number]", card.number.as_str()),
                ("card[exp_month]", card.exp_month.as_str()),
                ("card[exp_year]", card.exp_year.as_str()),
                ("card[cvc]", card.cvc.as_str()),
                ("card[name]", cardholder),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    TokenizationError::Unreachable(e.to_string())
                } else {
                    TokenizationError::Rejected(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenizationError::Rejected(format!("HTTP {status}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenizationError::Rejected(format!("malformed token response: {e}")))?;
        Ok(PaymentToken { id: token.id })
    }
}
