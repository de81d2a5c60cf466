//! Cart - per-session quantities
//!
//! The cart is a value type: every mutator returns a new `Cart` instead of
//! mutating shared structure, so handlers can never alias each other's
//! state. Quantities are unsigned and the adjust operation clamps at zero
//! in the state object itself, not only behind a disabled button.

use crate::catalog::{Catalog, ProductId};
use crate::error::CheckoutError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    quantities: BTreeMap<ProductId, u64>,
}

impl Cart {
    /// A cart carrying every catalog product at quantity zero.
    pub fn empty(catalog: &Catalog) -> Self {
        Cart {
            quantities: catalog.products().map(|(id, _)| (id.clone(), 0)).collect(),
        }
    }

    /// Apply a quantity delta, clamped so the result never goes below zero.
    ///
    /// Adjusting a product the cart does not know is a programming error
    /// and is rejected rather than silently inserted.
    pub fn adjust(&self, id: &ProductId, delta: i64) -> Result<Cart, CheckoutError> {
        let current = *self
            .quantities
            .get(id)
            .ok_or_else(|| CheckoutError::UnknownProduct(id.clone()))?;

        let next = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current.saturating_add(delta as u64)
        };

        let mut quantities = self.quantities.clone();
        quantities.insert(id.clone(), next);
        Ok(Cart { quantities })
    }

    /// Every product back to quantity zero.
    pub fn reset(&self) -> Cart {
        Cart {
            quantities: self.quantities.keys().map(|id| (id.clone(), 0)).collect(),
        }
    }

    pub fn quantity(&self, id: &ProductId) -> u64 {
        self.quantities.get(id).copied().unwrap_or(0)
    }

    /// Sum of quantities across all products. Drives the submit gate.
    pub fn total_quantity(&self) -> u64 {
        self.quantities.values().sum()
    }

    /// Cart total in minor units: Σ quantity × unit price. Pure.
    ///
    /// Saturates at `u64::MAX` instead of overflowing; quantities are
    /// only clamped, not capped, so absurd values are representable.
    pub fn total(&self, catalog: &Catalog) -> Result<u64, CheckoutError> {
        self.quantities.iter().try_fold(0u64, |sum, (id, qty)| {
            let entry = catalog.entry(id)?;
            Ok(sum.saturating_add(qty.saturating_mul(u64::from(entry.unit_price_minor))))
        })
    }

    /// Products with their quantities, in stable id order.
    pub fn items(&self) -> impl Iterator<Item = (&ProductId, u64)> {
        self.quantities.iter().map(|(id, qty)| (id, *qty))
    }
}
