//! Storefront (customer-facing) read models
//!
//! Snapshot of one store's menu for the customer frontend. Read-only: all
//! pricing happens server-side when the basket is submitted.

use super::{Combo, Store, StoreProduct};
use serde::{Deserialize, Serialize};

/// A store's menu: categories in display order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreMenu {
    pub store_id: String,
    pub store_name: String,
    pub is_open: bool,
    pub categories: Vec<MenuCategory>,
    /// Available combos; combos sit outside the category tree
    pub combos: Vec<Combo>,
}

/// One category section of the menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    pub category_id: String,
    pub name: String,
    pub products: Vec<MenuProduct>,
}

/// One sellable product with its declared add-ons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuProduct {
    #[serde(flatten)]
    pub product: StoreProduct,
    /// Tracked stock exhausted
    pub sold_out: bool,
    /// Add-ons the customer may attach, with current prices
    pub addons: Vec<StoreProduct>,
}

/// Store summary for the storefront listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSummary {
    pub id: String,
    pub name: String,
    pub address: String,
    pub is_open: bool,
}

impl From<Store> for StoreSummary {
    fn from(s: Store) -> Self {
        Self {
            id: s.id,
            name: s.name,
            address: s.address,
            is_open: s.is_open,
        }
    }
}
