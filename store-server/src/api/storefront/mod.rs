//! Storefront API module
//!
//! Public, unauthenticated customer surface: store listing, menus and
//! checkout.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/storefront", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/stores", get(handler::list_stores))
        .route("/stores/{id}/menu", get(handler::store_menu))
        .route("/orders", post(handler::checkout))
}
