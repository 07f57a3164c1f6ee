//! Shared order vocabulary
//!
//! Payment/purchase enums, geo points and line item snapshots. Line
//! items are copied from the catalog at cart-add time and copied again
//! into the order at checkout; they are never re-derived afterwards, so
//! later catalog edits cannot retroactively change a cart or an order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Payment
// ============================================================================

/// How the customer pays
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Prepaid electronic wallet - settled before fulfillment
    EWallet,
    /// Pay the courier on handoff
    #[default]
    CashOnDelivery,
    /// Pay at the counter (Dine-In)
    Cash,
}

impl PaymentMethod {
    /// E-wallet payments are settled at checkout time
    pub fn is_prepaid(&self) -> bool {
        matches!(self, Self::EWallet)
    }
}

/// Settlement state of an order's payment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

// ============================================================================
// Purchase Type
// ============================================================================

/// Fulfillment mode. Wire strings match the storefront contract.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PurchaseType {
    /// Courier delivery - requires a delivery location
    #[default]
    Delivery,
    /// Eat in the café - no delivery fields
    #[serde(rename = "Dine In")]
    DineIn,
}

impl PurchaseType {
    pub fn requires_location(&self) -> bool {
        matches!(self, Self::Delivery)
    }
}

// ============================================================================
// Geo Point
// ============================================================================

/// Coordinate validation failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid coordinates: {0}")]
pub struct InvalidCoordinates(pub String);

/// GeoJSON point: `{"type": "Point", "coordinates": [lng, lat]}`
///
/// Stored as-is so the persistence layer can treat it as native
/// geometry and keep location queries possible.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: [lng, lat],
        }
    }

    /// Build from a raw coordinate slice, rejecting anything that is
    /// not exactly two finite numbers
    pub fn try_from_coordinates(coords: &[f64]) -> Result<Self, InvalidCoordinates> {
        match coords {
            [lng, lat] if lng.is_finite() && lat.is_finite() => Ok(Self::new(*lng, *lat)),
            [_, _] => Err(InvalidCoordinates(
                "coordinates must be finite numbers".to_string(),
            )),
            other => Err(InvalidCoordinates(format!(
                "expected [lng, lat], got {} element(s)",
                other.len()
            ))),
        }
    }

    pub fn lng(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn lat(&self) -> f64 {
        self.coordinates[1]
    }
}

// ============================================================================
// Line Items
// ============================================================================

/// Line item inside an active cart
///
/// `price` is the unit price snapshot taken when the item was first
/// added; adding the same product again only increments `quantity`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    /// Catalog reference ("product:xyz")
    pub product_id: String,
    /// Display name snapshot
    pub name: String,
    /// Unit price snapshot (first-added price wins)
    pub price: f64,
    pub quantity: i32,
}

impl CartLineItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Immutable line item inside a persisted order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

impl OrderLineItem {
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

impl From<&CartLineItem> for OrderLineItem {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geo_point_accepts_two_finite_coordinates() {
        let p = GeoPoint::try_from_coordinates(&[121.0, 14.6]).unwrap();
        assert_eq!(p.kind, "Point");
        assert_eq!(p.lng(), 121.0);
        assert_eq!(p.lat(), 14.6);
    }

    #[test]
    fn geo_point_rejects_wrong_arity_and_nan() {
        assert!(GeoPoint::try_from_coordinates(&[]).is_err());
        assert!(GeoPoint::try_from_coordinates(&[1.0]).is_err());
        assert!(GeoPoint::try_from_coordinates(&[1.0, 2.0, 3.0]).is_err());
        assert!(GeoPoint::try_from_coordinates(&[f64::NAN, 2.0]).is_err());
    }

    #[test]
    fn geo_point_serializes_as_geojson() {
        let p = GeoPoint::new(121.0, 14.6);
        let v = serde_json::to_value(&p).unwrap();
        assert_eq!(v["type"], "Point");
        assert_eq!(v["coordinates"][0], 121.0);
        assert_eq!(v["coordinates"][1], 14.6);
    }

    #[test]
    fn purchase_type_wire_strings() {
        assert_eq!(
            serde_json::to_string(&PurchaseType::DineIn).unwrap(),
            "\"Dine In\""
        );
        assert_eq!(
            serde_json::to_string(&PurchaseType::Delivery).unwrap(),
            "\"Delivery\""
        );
        let back: PurchaseType = serde_json::from_str("\"Dine In\"").unwrap();
        assert_eq!(back, PurchaseType::DineIn);
    }

    #[test]
    fn line_item_snapshot_conversion() {
        let cart_item = CartLineItem {
            product_id: "product:latte".to_string(),
            name: "Latte".to_string(),
            price: 50.0,
            quantity: 2,
        };
        let order_item = OrderLineItem::from(&cart_item);
        assert_eq!(order_item.line_total(), 100.0);
        assert_eq!(order_item.name, "Latte");
    }
}
