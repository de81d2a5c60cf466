//! Catalog - the fixed product set
//!
//! The catalog is an explicitly constructed value passed into every
//! operation that needs pricing or SKU data. It is never ambient module
//! state, so tests and demos can substitute their own fixtures.

use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Local product identifier used by cart and presentation state.
///
/// Distinct from the backend SKU: the backend only ever sees
/// [`CatalogEntry::external_sku`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::new(id)
    }
}

/// Pricing and backend identity for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unit price in minor units (cents). Integer money only.
    pub unit_price_minor: u32,
    /// Backend-defined SKU identifier, sent as `parent` on order items.
    pub external_sku: u64,
}

/// Immutable mapping of product id to pricing/SKU data.
///
/// Defined once at startup. Iteration order is stable (sorted by id) so
/// derived order payloads are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<ProductId, CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: impl IntoIterator<Item = (ProductId, CatalogEntry)>) -> Self {
        Catalog {
            entries: entries.into_iter().collect(),
        }
    }

    /// The two-product fixture the shop ships with.
    pub fn produce() -> Self {
        Catalog::new([
            (
                ProductId::new("banana"),
                CatalogEntry {
                    unit_price_minor: 150,
                    external_sku: 1,
                },
            ),
            (
                ProductId::new("cucumber"),
                CatalogEntry {
                    unit_price_minor: 100,
                    external_sku: 2,
                },
            ),
        ])
    }

    /// Look up a product, failing fast on ids the catalog does not carry.
    pub fn entry(&self, id: &ProductId) -> Result<&CatalogEntry, CheckoutError> {
        self.entries
            .get(id)
            .ok_or_else(|| CheckoutError::UnknownProduct(id.clone()))
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn products(&self) -> impl Iterator<Item = (&ProductId, &CatalogEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
