//! # Greengrocer HTTP
//!
//! The network edge of the checkout: reqwest clients for the two
//! consumed collaborators (token service, backend order endpoint) and a
//! Hyper 1.0 native ingress exposing the shop's presentation surface.

pub mod gateway;
pub mod ingress;
pub mod money;
pub mod tokenizer;

pub use gateway::HttpOrderGateway;
pub use ingress::{ShopIngress, ShopState, handle};
pub use money::format_usd;
pub use tokenizer::HttpTokenizer;

pub mod prelude {
    pub use crate::gateway::HttpOrderGateway;
    pub use crate::ingress::{ShopIngress, ShopState};
    pub use crate::money::format_usd;
    pub use crate::tokenizer::HttpTokenizer;
}
