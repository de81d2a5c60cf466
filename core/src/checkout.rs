//! Submission orchestrator - the one place that writes submission state.
//!
//! A submit attempt is a single linear pass: tokenize, build the payload,
//! place the order. No retries, no idempotency key, and no cancellation
//! once an attempt has started (a known limitation, not a feature). The
//! ordering guarantee is structural: the gateway call only exists
//! downstream of a successful token.

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::contact::Contact;
use crate::error::CheckoutError;
use crate::order::OrderPayload;
use crate::session::submittable;
use crate::synapse::{CardInput, OrderGateway, PaymentTokenizer};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;

/// Observable state of the submission flow.
///
/// `Succeeded` and `Failed` are terminal until the next submit attempt
/// re-arms the flow; there is no explicit acknowledge step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    InFlight,
    Succeeded,
    Failed { reason: String },
}

impl SubmissionState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionState::InFlight)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, SubmissionState::Succeeded)
    }
}

/// Coordinates one submit attempt against the two collaborators.
///
/// Only the flow writes [`SubmissionState`]; user-input handlers own the
/// cart and contact values and pass snapshots in. The guard runs under a
/// lock so re-entrant submits are refused even when the UI fails to
/// disable the control in time.
pub struct CheckoutFlow {
    tokenizer: Arc<dyn PaymentTokenizer>,
    gateway: Arc<dyn OrderGateway>,
    state: Mutex<SubmissionState>,
}

/// Holds `InFlight` open for the duration of one attempt.
///
/// Every exit from an attempt must pass through [`InFlightGuard::settle`].
/// If the attempt future is dropped mid-await instead (client gone,
/// task aborted), `Drop` records the abort as a failed attempt so the
/// flow never wedges in `InFlight`.
struct InFlightGuard<'a> {
    state: &'a Mutex<SubmissionState>,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(state: &'a Mutex<SubmissionState>) -> Self {
        InFlightGuard { state, armed: true }
    }

    fn settle(mut self, next: SubmissionState) -> SubmissionState {
        self.armed = false;
        *self.state.lock() = next.clone();
        next
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            *self.state.lock() = SubmissionState::Failed {
                reason: "attempt aborted".into(),
            };
        }
    }
}

impl CheckoutFlow {
    pub fn new(tokenizer: Arc<dyn PaymentTokenizer>, gateway: Arc<dyn OrderGateway>) -> Self {
        CheckoutFlow {
            tokenizer,
            gateway,
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    /// Current submission state, as last written by a submit attempt.
    pub fn state(&self) -> SubmissionState {
        self.state.lock().clone()
    }

    /// Run one submission attempt.
    ///
    /// Guard violations (`AlreadyInFlight`, `NotSubmittable`) are returned
    /// as errors and cause no network activity. Collaborator failures are
    /// absorbed into [`SubmissionState::Failed`]; the caller surfaces a
    /// generic message while the detail stays in the state and the logs.
    pub async fn submit(
        &self,
        cart: &Cart,
        contact: &Contact,
        catalog: &Catalog,
        cardholder: &str,
        card: &CardInput,
    ) -> Result<SubmissionState, CheckoutError> {
        {
            let mut state = self.state.lock();
            if state.is_in_flight() {
                return Err(CheckoutError::AlreadyInFlight);
            }
            if !submittable(cart, contact) {
                return Err(CheckoutError::NotSubmittable);
            }
            *state = SubmissionState::InFlight;
        }

        let attempt_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("Submission", shop.attempt_id = %attempt_id);
        let guard = InFlightGuard::new(&self.state);
        self.attempt(guard, cart, contact, catalog, cardholder, card)
            .instrument(span)
            .await
    }

    async fn attempt(
        &self,
        guard: InFlightGuard<'_>,
        cart: &Cart,
        contact: &Contact,
        catalog: &Catalog,
        cardholder: &str,
        card: &CardInput,
    ) -> Result<SubmissionState, CheckoutError> {
        tracing::debug!("requesting payment token");
        let token = match self.tokenizer.create_token(cardholder, card).await {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "tokenization failed; no order submitted");
                return Ok(guard.settle(SubmissionState::Failed {
                    reason: e.to_string(),
                }));
            }
        };

        let order = match OrderPayload::build(cart, contact, catalog) {
            Ok(order) => order,
            Err(e) => {
                // Programming error, not a collaborator outcome: fail fast
                // and leave the flow re-armable.
                guard.settle(SubmissionState::Idle);
                return Err(e);
            }
        };

        tracing::debug!(items = order.items.len(), "token acquired, placing order");
        match self.gateway.place_order(&order, &token.id).await {
            Ok(()) => {
                tracing::info!("order placed");
                Ok(guard.settle(SubmissionState::Succeeded))
            }
            Err(e) => {
                tracing::error!(error = %e, "order submission failed");
                Ok(guard.settle(SubmissionState::Failed {
                    reason: e.to_string(),
                }))
            }
        }
    }
}
