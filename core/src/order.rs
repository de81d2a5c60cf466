//! Order builder - derives the backend payload from session state.
//!
//! The payload is built fresh on every submission attempt and never
//! mutated afterwards. Serialized field names follow the backend
//! contract exactly: `type`, `parent`, `postal_code`.

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::contact::{Address, Contact};
use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};

/// The only currency this shop charges in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "usd")]
    Usd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    #[serde(rename = "sku")]
    Sku,
}

/// One purchasable line: the backend SKU plus a positive quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub parent: u64,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipping {
    pub name: String,
    pub address: Address,
}

/// Request body for the backend order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub currency: Currency,
    pub items: Vec<OrderItem>,
    pub email: String,
    pub shipping: Shipping,
    /// Omitted from the wire entirely when no coupon was entered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<String>,
}

impl OrderPayload {
    /// Derive a payload from the current cart and contact state.
    ///
    /// Pure and deterministic: zero-quantity items are filtered out,
    /// item order follows catalog id order. A cart entry missing from
    /// the catalog is a programming error and fails the build.
    pub fn build(
        cart: &Cart,
        contact: &Contact,
        catalog: &Catalog,
    ) -> Result<OrderPayload, CheckoutError> {
        let items = cart
            .items()
            .filter(|(_, quantity)| *quantity > 0)
            .map(|(id, quantity)| {
                let entry = catalog.entry(id)?;
                Ok(OrderItem {
                    kind: ItemKind::Sku,
                    parent: entry.external_sku,
                    quantity,
                })
            })
            .collect::<Result<Vec<_>, CheckoutError>>()?;

        Ok(OrderPayload {
            currency: Currency::Usd,
            items,
            email: contact.email.clone(),
            shipping: Shipping {
                name: contact.name.clone(),
                address: contact.address.clone(),
            },
            coupon: (!contact.coupon.is_empty()).then(|| contact.coupon.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::{AddressField, ContactField};

    fn contact() -> Contact {
        Contact::default()
            .with_field(ContactField::Name, "Ada Lovelace")
            .with_field(ContactField::Email, "ada@example.com")
            .with_address_field(AddressField::Line1, "12 Fruit St")
            .with_address_field(AddressField::City, "London")
            .with_address_field(AddressField::State, "LDN")
            .with_address_field(AddressField::Country, "GB")
            .with_address_field(AddressField::PostalCode, "N1 9GU")
    }

    #[test]
    fn excludes_zero_quantity_items() {
        let catalog = Catalog::produce();
        let cart = Cart::empty(&catalog).adjust(&"cucumber".into(), 2).unwrap();

        let payload = OrderPayload::build(&cart, &contact(), &catalog).unwrap();
        assert_eq!(
            payload.items,
            vec![OrderItem {
                kind: ItemKind::Sku,
                parent: 2,
                quantity: 2,
            }]
        );
    }

    #[test]
    fn carries_contact_and_shipping_block() {
        let catalog = Catalog::produce();
        let cart = Cart::empty(&catalog).adjust(&"banana".into(), 1).unwrap();

        let payload = OrderPayload::build(&cart, &contact(), &catalog).unwrap();
        assert_eq!(payload.email, "ada@example.com");
        assert_eq!(payload.shipping.name, "Ada Lovelace");
        assert_eq!(payload.shipping.address.postal_code, "N1 9GU");
    }

    #[test]
    fn omits_coupon_key_when_empty() {
        let catalog = Catalog::produce();
        let cart = Cart::empty(&catalog).adjust(&"banana".into(), 1).unwrap();

        let payload = OrderPayload::build(&cart, &contact(), &catalog).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("coupon").is_none());
        assert_eq!(json["currency"], "usd");
        assert_eq!(json["items"][0]["type"], "sku");
    }

    #[test]
    fn includes_coupon_key_when_set() {
        let catalog = Catalog::produce();
        let cart = Cart::empty(&catalog).adjust(&"banana".into(), 1).unwrap();
        let contact = contact().with_field(ContactField::Coupon, "VEG10");

        let payload = OrderPayload::build(&cart, &contact, &catalog).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["coupon"], "VEG10");
    }

    #[test]
    fn empty_cart_builds_an_empty_item_list() {
        let catalog = Catalog::produce();
        let cart = Cart::empty(&catalog);
        let payload = OrderPayload::build(&cart, &contact(), &catalog).unwrap();
        assert!(payload.items.is_empty());
    }
}
