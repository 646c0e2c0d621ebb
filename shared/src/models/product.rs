//! Catalog product model
//!
//! The catalog itself is owned by an external collaborator; the engine only
//! needs enough metadata to snapshot name/price/category at order time.

use serde::{Deserialize, Serialize};

/// Catalog product metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    /// Current catalog price. Captured into line items at order time and
    /// never re-read afterwards.
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Upsert payload for seeding the catalog cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpsert {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
