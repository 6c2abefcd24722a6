//! Store product API module
//!
//! Everything here is scoped to the caller's active store.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/store-products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/addons", get(handler::list_addons))
        .route(
            "/{id}/addons/{child_id}",
            post(handler::declare_addon).delete(handler::undeclare_addon),
        )
        .route(
            "/{id}/categories/{category_id}",
            post(handler::assign_category).delete(handler::unassign_category),
        )
}
