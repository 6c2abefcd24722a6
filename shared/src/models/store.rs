//! Store (tenant) model

use serde::{Deserialize, Serialize};

/// A tenant operating its own catalog and orders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Store {
    /// Assigned at creation from the id generator, never regenerated
    pub id: String,
    pub name: String,
    pub address: String,
    /// Manual open/close toggle for the storefront
    pub is_open: bool,
    pub created_at: String,
}

/// Create store payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreate {
    pub name: String,
    pub address: Option<String>,
}

/// Update store payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub is_open: Option<bool>,
}
