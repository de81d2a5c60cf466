//! Contact and shipping address state.
//!
//! Fields are addressed through the [`ContactField`] and [`AddressField`]
//! enums, so writing to an unrecognized field is unrepresentable. Like the
//! cart, mutators return new values instead of mutating in place.

use serde::{Deserialize, Serialize};

/// Shipping address, serialized with the backend's wire names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

impl Address {
    /// All five subfields filled in.
    pub fn is_complete(&self) -> bool {
        !self.line1.is_empty()
            && !self.city.is_empty()
            && !self.state.is_empty()
            && !self.country.is_empty()
            && !self.postal_code.is_empty()
    }
}

/// Top-level contact fields. Coupon is the only optional one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Coupon,
}

/// Nested address fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    Line1,
    City,
    State,
    Country,
    PostalCode,
}

/// Buyer identity and shipping details, edited field by field as the
/// user types. Everything starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub coupon: String,
    pub address: Address,
}

impl Contact {
    /// Replace one top-level field, returning the updated value.
    pub fn with_field(&self, field: ContactField, value: impl Into<String>) -> Contact {
        let mut next = self.clone();
        let value = value.into();
        match field {
            ContactField::Name => next.name = value,
            ContactField::Email => next.email = value,
            ContactField::Coupon => next.coupon = value,
        }
        next
    }

    /// Replace one nested address field, returning the updated value.
    pub fn with_address_field(&self, field: AddressField, value: impl Into<String>) -> Contact {
        let mut next = self.clone();
        let value = value.into();
        match field {
            AddressField::Line1 => next.address.line1 = value,
            AddressField::City => next.address.city = value,
            AddressField::State => next.address.state = value,
            AddressField::Country => next.address.country = value,
            AddressField::PostalCode => next.address.postal_code = value,
        }
        next
    }

    /// Name, email and the full address present. No validation beyond
    /// non-emptiness; the coupon does not participate.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty() && self.address.is_complete()
    }
}
