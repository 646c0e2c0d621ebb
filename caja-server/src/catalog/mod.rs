//! Catalog Service - in-memory product metadata cache
//!
//! The catalog of record lives with an external collaborator; this cache
//! is the lookup the engine consults to snapshot name/price/category into
//! line items at order time. Seeded and updated through the products API.

use parking_lot::RwLock;
use shared::models::{Product, ProductUpsert};
use std::collections::HashMap;

/// Product metadata cache
#[derive(Default)]
pub struct CatalogService {
    products: RwLock<HashMap<String, Product>>,
}

impl CatalogService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product
    pub fn upsert(&self, payload: ProductUpsert) -> Product {
        let product = Product {
            product_id: payload.product_id,
            name: payload.name,
            price: payload.price,
            category_name: payload.category_name,
            is_active: payload.is_active,
        };
        self.products
            .write()
            .insert(product.product_id.clone(), product.clone());
        product
    }

    /// Look up one product
    pub fn get(&self, product_id: &str) -> Option<Product> {
        self.products.read().get(product_id).cloned()
    }

    /// Batch lookup for order validation (missing IDs are simply absent)
    pub fn get_batch(&self, product_ids: &[String]) -> HashMap<String, Product> {
        let products = self.products.read();
        product_ids
            .iter()
            .filter_map(|id| products.get(id).map(|p| (id.clone(), p.clone())))
            .collect()
    }

    /// All products, for the listing endpoint
    pub fn list(&self) -> Vec<Product> {
        let mut all: Vec<Product> = self.products.read().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upsert(id: &str, price: f64) -> ProductUpsert {
        ProductUpsert {
            product_id: id.to_string(),
            name: format!("Product {id}"),
            price,
            category_name: None,
            is_active: true,
        }
    }

    #[test]
    fn test_upsert_replaces_price() {
        let catalog = CatalogService::new();
        catalog.upsert(upsert("p1", 10.0));
        catalog.upsert(upsert("p1", 12.5));

        assert_eq!(catalog.get("p1").unwrap().price, 12.5);
        assert_eq!(catalog.list().len(), 1);
    }

    #[test]
    fn test_get_batch_skips_missing() {
        let catalog = CatalogService::new();
        catalog.upsert(upsert("p1", 10.0));

        let found = catalog.get_batch(&["p1".to_string(), "p2".to_string()]);
        assert_eq!(found.len(), 1);
        assert!(found.contains_key("p1"));
    }
}
