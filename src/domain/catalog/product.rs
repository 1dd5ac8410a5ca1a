use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

// ============================================================================
// Product - Catalog Record
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_per_kg: f64,
    pub category: String,
    pub unit: String,
    /// Smallest quantity a supplier is willing to pool for.
    pub min_order_qty: u32,
    pub supplier_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Fields a supplier provides when listing a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price_per_kg: f64,
    pub category: String,
    pub unit: Option<String>,
    pub min_order_qty: u32,
}
