//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::ApiResponse;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::{AppError, AppResult};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::category as category_repo;
use crate::services::catalog;

/// GET /api/categories - the active store's categories in menu order
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Category>>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let categories = category_repo::find_by_store(&mut conn, store_id).await?;
    Ok(Json(categories))
}

/// GET /api/categories/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let category = category_repo::find_by_id(&mut conn, store_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    let store_id = user.require_store()?;
    let category = catalog::create_category(&state.db.pool, store_id, &payload).await?;
    Ok(Json(category))
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let category = category_repo::update(&mut conn, store_id, &id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found("Category"))?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id - memberships cascade, products stay
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if !category_repo::delete(&mut conn, store_id, &id).await? {
        return Err(AppError::not_found("Category"));
    }
    Ok(Json(ApiResponse::ok()))
}
