//! Combo models
//!
//! A combo bundles store products at one fixed price. The combo price is
//! intentionally independent of the component prices: combos may be priced
//! as promotions.

use serde::{Deserialize, Serialize};

/// Combo entity, store-scoped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combo {
    pub id: String,
    pub store_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Fixed price in cents
    pub price: i64,
    pub is_available: bool,
    /// Bundled items, in declaration order
    #[serde(default)]
    pub items: Vec<ComboItem>,
}

/// One bundled (store product, quantity) entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ComboItem {
    pub store_product_id: String,
    pub quantity: i64,
}

/// Create combo payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboCreate {
    pub name: String,
    pub description: Option<String>,
    /// Fixed price in cents
    pub price: i64,
    pub items: Vec<ComboItem>,
}

/// Update combo payload (items, when present, replace the whole set)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub is_available: Option<bool>,
    pub items: Option<Vec<ComboItem>>,
}
