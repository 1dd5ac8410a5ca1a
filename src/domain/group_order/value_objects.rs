use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::Product;

// ============================================================================
// Group Order Value Objects
// ============================================================================

/// One vendor's stake in a group order. A vendor appears at most once in an
/// order's participant list and always with a quantity of at least 1.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Participation {
    pub vendor_id: Uuid,
    pub quantity: u32,
}

/// Catalog data frozen onto the order when it is opened. Later catalog edits
/// do not retroactively change a running order.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProductSnapshot {
    pub product_id: Uuid,
    pub name: String,
    pub supplier_id: Uuid,
    pub price_per_kg: f64,
    pub unit: String,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            supplier_id: product.supplier_id,
            price_per_kg: product.price_per_kg,
            unit: product.unit.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Open,
    Closed,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Terminal states admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participation_serialization() {
        let participation = Participation {
            vendor_id: Uuid::new_v4(),
            quantity: 20,
        };

        let json = serde_json::to_string(&participation).unwrap();
        let deserialized: Participation = serde_json::from_str(&json).unwrap();

        assert_eq!(participation, deserialized);
    }

    #[test]
    fn test_status_wire_format_is_lowercase() {
        assert_eq!(serde_json::to_string(&OrderStatus::Open).unwrap(), "\"open\"");
        assert_eq!(serde_json::to_string(&OrderStatus::Closed).unwrap(), "\"closed\"");
        assert_eq!(serde_json::to_string(&OrderStatus::Delivered).unwrap(), "\"delivered\"");
        assert_eq!(serde_json::to_string(&OrderStatus::Cancelled).unwrap(), "\"cancelled\"");
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::Open.is_terminal());
        assert!(!OrderStatus::Closed.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_snapshot_from_product() {
        let product = Product {
            id: Uuid::new_v4(),
            name: "Potatoes".to_string(),
            description: None,
            price_per_kg: 18.0,
            category: "Vegetables".to_string(),
            unit: "kg".to_string(),
            min_order_qty: 5,
            supplier_id: Uuid::new_v4(),
            created_at: chrono::Utc::now(),
        };

        let snapshot = ProductSnapshot::from(&product);
        assert_eq!(snapshot.product_id, product.id);
        assert_eq!(snapshot.supplier_id, product.supplier_id);
        assert_eq!(snapshot.price_per_kg, 18.0);
    }
}
