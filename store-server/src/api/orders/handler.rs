//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Order, OrderStatus, PlaceOrderRequest, TransitionRequest};
use shared::{AppError, AppResult};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order as order_repo;
use crate::services::{lifecycle, pricing};

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

/// GET /api/orders?status=PREPARING - the active store's orders
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let orders = order_repo::find_by_store(&mut conn, store_id, query.status).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let order = order_repo::find_by_id(&mut conn, store_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    Ok(Json(order))
}

/// POST /api/orders - place an order on the active store
///
/// The basket's store is always the caller's active store; a mismatching
/// store_id in the body is rejected rather than silently rewritten.
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(mut payload): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    let store_id = user.require_store()?;
    if !payload.store_id.is_empty() && payload.store_id != store_id {
        return Err(AppError::forbidden("Basket targets another store"));
    }
    payload.store_id = store_id.to_string();

    let order = pricing::place_order(&state.db.pool, &payload).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/status - apply a lifecycle transition
pub async fn transition(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<TransitionRequest>,
) -> AppResult<Json<Order>> {
    let store_id = user.require_store()?;
    let order = lifecycle::transition_order(&state.db.pool, store_id, &id, &payload).await?;
    Ok(Json(order))
}
