//! Store API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Store, StoreCreate, StoreUpdate};
use shared::{AppError, AppResult};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::store as store_repo;
use crate::utils::now_rfc3339;

/// GET /api/stores - all stores
pub async fn list(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<Store>>> {
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let stores = store_repo::find_all(&mut conn).await?;
    Ok(Json(stores))
}

/// GET /api/stores/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Store>> {
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let store = store_repo::find_by_id(&mut conn, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Store"))?;
    Ok(Json(store))
}

/// POST /api/stores - create a store, open by default
pub async fn create(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(payload): Json<StoreCreate>,
) -> AppResult<Json<Store>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Store name cannot be empty"));
    }

    let store = Store {
        id: shared::id::new_id_string(),
        name: payload.name,
        address: payload.address.unwrap_or_default(),
        is_open: true,
        created_at: now_rfc3339(),
    };

    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    store_repo::insert(&mut conn, &store).await?;

    tracing::info!(store_id = %store.id, name = %store.name, "Store created");
    Ok(Json(store))
}

/// PUT /api/stores/:id - only employees of the store may change it
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StoreUpdate>,
) -> AppResult<Json<Store>> {
    if !user.is_associated(&id) {
        return Err(AppError::store_not_associated());
    }

    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let store = store_repo::update(&mut conn, &id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found("Store"))?;
    Ok(Json(store))
}
