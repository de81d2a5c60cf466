//! Per-session checkout state and the submit gate.
//!
//! `CheckoutSession` bundles the values the presentation layer drives:
//! catalog, cart, contact and the submission flow. Input handlers go
//! through the session; only the flow writes submission state.

use crate::cart::Cart;
use crate::catalog::{Catalog, ProductId};
use crate::checkout::{CheckoutFlow, SubmissionState};
use crate::contact::{AddressField, Contact, ContactField};
use crate::error::CheckoutError;
use crate::synapse::CardInput;
use std::sync::Arc;

/// The single predicate gating the submit affordance: complete contact
/// details and at least one item in the cart. Computed fresh on every
/// call, nothing here is cached.
pub fn submittable(cart: &Cart, contact: &Contact) -> bool {
    contact.is_complete() && cart.total_quantity() > 0
}

pub struct CheckoutSession {
    catalog: Catalog,
    cart: Cart,
    contact: Contact,
    flow: Arc<CheckoutFlow>,
}

impl CheckoutSession {
    pub fn new(catalog: Catalog, flow: Arc<CheckoutFlow>) -> Self {
        CheckoutSession {
            cart: Cart::empty(&catalog),
            contact: Contact::default(),
            catalog,
            flow,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    /// The submission flow, shareable across tasks so a submit attempt
    /// can run while the session itself stays editable.
    pub fn flow(&self) -> Arc<CheckoutFlow> {
        Arc::clone(&self.flow)
    }

    pub fn adjust(&mut self, id: &ProductId, delta: i64) -> Result<(), CheckoutError> {
        self.cart = self.cart.adjust(id, delta)?;
        Ok(())
    }

    pub fn reset_cart(&mut self) {
        self.cart = self.cart.reset();
    }

    pub fn set_field(&mut self, field: ContactField, value: impl Into<String>) {
        self.contact = self.contact.with_field(field, value);
    }

    pub fn set_address_field(&mut self, field: AddressField, value: impl Into<String>) {
        self.contact = self.contact.with_address_field(field, value);
    }

    /// Running total in minor units.
    pub fn total(&self) -> Result<u64, CheckoutError> {
        self.cart.total(&self.catalog)
    }

    pub fn submittable(&self) -> bool {
        submittable(&self.cart, &self.contact)
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.flow.state()
    }

    /// Submit the session as it stands.
    ///
    /// The cart is deliberately *not* cleared on success: whether a repeat
    /// order should start from an empty cart is an open product decision,
    /// so the flow leaves the session untouched.
    pub async fn submit(
        &self,
        cardholder: &str,
        card: &CardInput,
    ) -> Result<SubmissionState, CheckoutError> {
        self.flow
            .submit(&self.cart, &self.contact, &self.catalog, cardholder, card)
            .await
    }
}
