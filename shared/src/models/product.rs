//! Product and StoreProduct models
//!
//! `Product` is the global catalog definition; `StoreProduct` is the
//! store-scoped instance with its own price and availability. Orders always
//! reference StoreProduct, never Product directly.

use serde::{Deserialize, Serialize};

/// Global product definition, independent of any store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// A (store, product) pairing with store-specific price and availability
///
/// Exactly one StoreProduct exists per (store, product) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StoreProduct {
    pub id: String,
    pub store_id: String,
    pub product_id: String,
    /// Display name, defaults to the product's global name
    pub name: String,
    /// Price in cents
    pub price: i64,
    pub is_available: bool,
    /// Remaining stock; None means stock is not tracked
    pub stock: Option<i64>,
}

impl StoreProduct {
    /// Whether the item can be sold in the given quantity right now
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.is_available && self.stock.is_none_or(|s| s >= quantity)
    }
}

/// Create store-product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProductCreate {
    pub product_id: String,
    pub name: Option<String>,
    /// Price in cents
    pub price: i64,
    pub stock: Option<i64>,
}

/// Update store-product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreProductUpdate {
    pub name: Option<String>,
    /// Price in cents
    pub price: Option<i64>,
    pub is_available: Option<bool>,
    /// Some(None) clears stock tracking
    #[serde(default, with = "double_option", skip_serializing_if = "Option::is_none")]
    pub stock: Option<Option<i64>>,
}

/// Serde helper distinguishing "absent" from "explicitly null"
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T, S>(value: &Option<Option<T>>, ser: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(ser),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(de).map(Some)
    }
}
