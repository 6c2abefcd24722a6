//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - staff login and registration
//! - [`stores`] - store management
//! - [`products`] - global product catalog
//! - [`store_products`] - store-scoped instances, add-ons, categories
//! - [`categories`] - menu categories
//! - [`combos`] - fixed-price bundles
//! - [`orders`] - staff order placement and lifecycle
//! - [`storefront`] - public customer-facing menu and checkout

pub mod auth;
pub mod categories;
pub mod combos;
pub mod health;
pub mod orders;
pub mod products;
pub mod storefront;
pub mod store_products;
pub mod stores;

use axum::Router;

use crate::core::ServerState;

/// All API routes, ready for the top-level layers
pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(stores::router())
        .merge(products::router())
        .merge(store_products::router())
        .merge(categories::router())
        .merge(combos::router())
        .merge(orders::router())
        .merge(storefront::router())
}
