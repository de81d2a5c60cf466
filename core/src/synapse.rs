//! Synapses: the integration seams of the checkout flow.
//!
//! A synapse is a connection to an external system behind a standard
//! async interface. The checkout flow only ever talks to its two
//! collaborators through these traits, so tests and demos can swap in
//! stubs and the HTTP implementations live in `greengrocer-http`.

use crate::error::{SubmissionError, TokenizationError};
use crate::order::OrderPayload;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Captured card-widget state, forwarded opaquely to the tokenizer.
///
/// The flow never inspects these fields; only a tokenizer
/// implementation does. `Debug` redacts everything but the last four
/// digits so card data cannot leak into logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInput {
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvc: String,
}

impl fmt::Debug for CardInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last4 = self
            .number
            .get(self.number.len().saturating_sub(4)..)
            .unwrap_or("");
        f.debug_struct("CardInput")
            .field("number", &format_args!("****{last4}"))
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .field("cvc", &"***")
            .finish()
    }
}

/// Opaque single-use credential representing a payment card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentToken {
    pub id: String,
}

/// Turns cardholder name plus captured card state into a token.
///
/// Treated as an opaque capability: failure reasons are surfaced, not
/// interpreted, and nothing is retried here.
#[async_trait]
pub trait PaymentTokenizer: Send + Sync {
    async fn create_token(
        &self,
        cardholder: &str,
        card: &CardInput,
    ) -> Result<PaymentToken, TokenizationError>;
}

/// The backend order endpoint: one submission per call, 2xx means placed.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn place_order(&self, order: &OrderPayload, source: &str)
    -> Result<(), SubmissionError>;
}
