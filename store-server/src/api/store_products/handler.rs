//! Store product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::ApiResponse;
use shared::models::{StoreProduct, StoreProductCreate, StoreProductUpdate};
use shared::{AppError, AppResult};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::product as product_repo;
use crate::services::catalog;

/// GET /api/store-products - the active store's instances
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<StoreProduct>>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let items = product_repo::find_store_products(&mut conn, store_id).await?;
    Ok(Json(items))
}

/// GET /api/store-products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<StoreProduct>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let sp = product_repo::find_store_product(&mut conn, store_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(Json(sp))
}

/// POST /api/store-products - instantiate a global product in the store
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<StoreProductCreate>,
) -> AppResult<Json<StoreProduct>> {
    let store_id = user.require_store()?;
    let sp = catalog::create_store_product(&state.db.pool, store_id, &payload).await?;
    Ok(Json(sp))
}

/// PUT /api/store-products/:id - reprice, rename, flag, adjust stock
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StoreProductUpdate>,
) -> AppResult<Json<StoreProduct>> {
    let store_id = user.require_store()?;
    if let Some(price) = payload.price
        && price < 0
    {
        return Err(AppError::validation("Price cannot be negative"));
    }

    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let sp = product_repo::update_store_product(&mut conn, store_id, &id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(Json(sp))
}

/// GET /api/store-products/:id/addons
pub async fn list_addons(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<StoreProduct>>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    product_repo::find_store_product(&mut conn, store_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    let addons = product_repo::find_addons(&mut conn, &id).await?;
    Ok(Json(addons))
}

/// POST /api/store-products/:id/addons/:child_id
pub async fn declare_addon(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, child_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let store_id = user.require_store()?;
    catalog::declare_addon(&state.db.pool, store_id, &id, &child_id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /api/store-products/:id/addons/:child_id
pub async fn undeclare_addon(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, child_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    product_repo::find_store_product(&mut conn, store_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    if !product_repo::undeclare_addon(&mut conn, &id, &child_id).await? {
        return Err(AppError::not_found("Add-on declaration"));
    }
    Ok(Json(ApiResponse::ok()))
}

/// POST /api/store-products/:id/categories/:category_id
pub async fn assign_category(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, category_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let store_id = user.require_store()?;
    catalog::assign_category(&state.db.pool, store_id, &id, &category_id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// DELETE /api/store-products/:id/categories/:category_id
pub async fn unassign_category(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path((id, category_id)): Path<(String, String)>,
) -> AppResult<Json<ApiResponse<()>>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    product_repo::find_store_product(&mut conn, store_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    if !product_repo::unassign_category(&mut conn, &id, &category_id).await? {
        return Err(AppError::not_found("Category assignment"));
    }
    Ok(Json(ApiResponse::ok()))
}
