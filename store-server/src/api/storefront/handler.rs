//! Storefront API Handlers
//!
//! The checkout payload carries no prices: everything is priced from the
//! catalog on the server.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::AppResult;
use shared::models::{Order, PlaceOrderRequest, StoreMenu, StoreSummary};

use crate::core::ServerState;
use crate::services::{pricing, storefront};

/// GET /api/storefront/stores - open stores only
pub async fn list_stores(State(state): State<ServerState>) -> AppResult<Json<Vec<StoreSummary>>> {
    let stores = storefront::list_open_stores(&state.db.pool).await?;
    Ok(Json(stores))
}

/// GET /api/storefront/stores/:id/menu
pub async fn store_menu(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<StoreMenu>> {
    let menu = storefront::store_menu(&state.db.pool, &id).await?;
    Ok(Json(menu))
}

/// POST /api/storefront/orders - customer checkout
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = pricing::place_order(&state.db.pool, &payload).await?;
    Ok(Json(order))
}
