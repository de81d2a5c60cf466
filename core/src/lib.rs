//! # Greengrocer Core
//!
//! Protocol-agnostic checkout domain: catalog, cart, contact state,
//! order builder and the submission flow. No HTTP in this crate:
//! network collaborators are reached through the synapse traits and
//! implemented in `greengrocer-http`.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod contact;
pub mod error;
pub mod order;
pub mod session;
pub mod synapse;

pub use cart::Cart;
pub use catalog::{Catalog, CatalogEntry, ProductId};
pub use checkout::{CheckoutFlow, SubmissionState};
pub use contact::{Address, AddressField, Contact, ContactField};
pub use error::{CheckoutError, SubmissionError, TokenizationError};
pub use order::{OrderItem, OrderPayload, Shipping};
pub use session::{CheckoutSession, submittable};
pub use synapse::{CardInput, OrderGateway, PaymentToken, PaymentTokenizer};

pub mod prelude {
    pub use crate::cart::Cart;
    pub use crate::catalog::{Catalog, CatalogEntry, ProductId};
    pub use crate::checkout::{CheckoutFlow, SubmissionState};
    pub use crate::contact::{Address, AddressField, Contact, ContactField};
    pub use crate::error::{CheckoutError, SubmissionError, TokenizationError};
    pub use crate::order::OrderPayload;
    pub use crate::session::{CheckoutSession, submittable};
    pub use crate::synapse::{CardInput, OrderGateway, PaymentToken, PaymentTokenizer};
}
