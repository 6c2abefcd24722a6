//! Global product API Handlers
//!
//! Renaming a global product never rewrites order history; order lines
//! carry their own captured names.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Product, ProductCreate, ProductUpdate};
use shared::{AppError, AppResult};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::product as product_repo;

/// GET /api/products
pub async fn list(
    State(state): State<ServerState>,
    _user: CurrentUser,
) -> AppResult<Json<Vec<Product>>> {
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let products = product_repo::find_all(&mut conn).await?;
    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let product = product_repo::find_by_id(&mut conn, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("Product name cannot be empty"));
    }

    let product = Product {
        id: shared::id::new_id_string(),
        name: payload.name,
        description: payload.description,
        image_url: payload.image_url,
    };

    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    product_repo::insert(&mut conn, &product).await?;
    Ok(Json(product))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let product = product_repo::update(&mut conn, &id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(Json(product))
}
