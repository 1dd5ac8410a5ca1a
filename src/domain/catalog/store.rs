use std::collections::HashMap;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::errors::CatalogError;
use super::product::{NewProduct, Product};

// ============================================================================
// Product Catalog - Lookup Seam + Embedded Implementation
// ============================================================================
//
// The aggregator depends only on the ProductCatalog trait; the embedded
// MemoryCatalog also carries the supplier-facing insert/list operations.
//
// ============================================================================

/// Read-only product lookup, as seen by the group-order aggregator.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn resolve(&self, product_id: Uuid) -> Result<Product, CatalogError>;
}

pub struct MemoryCatalog {
    products: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(HashMap::new()),
        }
    }

    /// List a new product for a supplier.
    pub async fn insert(
        &self,
        supplier_id: Uuid,
        new_product: NewProduct,
    ) -> Result<Product, CatalogError> {
        if new_product.price_per_kg <= 0.0 {
            return Err(CatalogError::Invalid("price must be positive"));
        }
        if new_product.min_order_qty == 0 {
            return Err(CatalogError::Invalid("minimum order quantity must be positive"));
        }
        if new_product.name.trim().is_empty() {
            return Err(CatalogError::Invalid("name must not be empty"));
        }

        let product = Product {
            id: Uuid::new_v4(),
            name: new_product.name,
            description: new_product.description,
            price_per_kg: new_product.price_per_kg,
            category: new_product.category,
            unit: new_product.unit.unwrap_or_else(|| "kg".to_string()),
            min_order_qty: new_product.min_order_qty,
            supplier_id,
            created_at: Utc::now(),
        };

        tracing::info!(
            product_id = %product.id,
            supplier_id = %supplier_id,
            name = %product.name,
            "product listed"
        );

        let mut products = self.products.write().await;
        products.insert(product.id, product.clone());
        Ok(product)
    }

    pub async fn list(&self) -> Vec<Product> {
        let products = self.products.read().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by_key(|p| p.created_at);
        all
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProductCatalog for MemoryCatalog {
    async fn resolve(&self, product_id: Uuid) -> Result<Product, CatalogError> {
        let products = self.products.read().await;
        products
            .get(&product_id)
            .cloned()
            .ok_or(CatalogError::NotFound(product_id))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn onions() -> NewProduct {
        NewProduct {
            name: "Red Onions".to_string(),
            description: Some("Grade A".to_string()),
            price_per_kg: 24.5,
            category: "Vegetables".to_string(),
            unit: None,
            min_order_qty: 10,
        }
    }

    #[tokio::test]
    async fn insert_then_resolve() {
        let catalog = MemoryCatalog::new();
        let supplier_id = Uuid::new_v4();

        let product = catalog.insert(supplier_id, onions()).await.unwrap();
        assert_eq!(product.unit, "kg");

        let resolved = catalog.resolve(product.id).await.unwrap();
        assert_eq!(resolved.name, "Red Onions");
        assert_eq!(resolved.supplier_id, supplier_id);
    }

    #[tokio::test]
    async fn resolve_unknown_product_fails() {
        let catalog = MemoryCatalog::new();
        let missing = Uuid::new_v4();

        let err = catalog.resolve(missing).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(id) if id == missing));
    }

    #[tokio::test]
    async fn invalid_products_are_rejected() {
        let catalog = MemoryCatalog::new();
        let supplier_id = Uuid::new_v4();

        let mut free = onions();
        free.price_per_kg = 0.0;
        assert!(matches!(
            catalog.insert(supplier_id, free).await,
            Err(CatalogError::Invalid(_))
        ));

        let mut zero_min = onions();
        zero_min.min_order_qty = 0;
        assert!(matches!(
            catalog.insert(supplier_id, zero_min).await,
            Err(CatalogError::Invalid(_))
        ));

        assert!(catalog.list().await.is_empty());
    }

    #[tokio::test]
    async fn list_returns_all_products() {
        let catalog = MemoryCatalog::new();
        let supplier_id = Uuid::new_v4();

        catalog.insert(supplier_id, onions()).await.unwrap();
        let mut tomatoes = onions();
        tomatoes.name = "Tomatoes".to_string();
        catalog.insert(supplier_id, tomatoes).await.unwrap();

        assert_eq!(catalog.list().await.len(), 2);
    }
}
