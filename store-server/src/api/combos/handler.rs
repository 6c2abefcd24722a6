//! Combo API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::ApiResponse;
use shared::models::{Combo, ComboCreate, ComboUpdate};
use shared::{AppError, AppResult};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::combo as combo_repo;
use crate::services::catalog;

/// GET /api/combos - the active store's combos
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Combo>>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let combos = combo_repo::find_by_store(&mut conn, store_id).await?;
    Ok(Json(combos))
}

/// GET /api/combos/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Combo>> {
    let store_id = user.require_store()?;
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    let combo = combo_repo::find_by_id(&mut conn, store_id, &id)
        .await?
        .ok_or_else(|| AppError::not_found("Combo"))?;
    Ok(Json(combo))
}

/// POST /api/combos
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ComboCreate>,
) -> AppResult<Json<Combo>> {
    let store_id = user.require_store()?;
    let combo = catalog::create_combo(&state.db.pool, store_id, &payload).await?;
    Ok(Json(combo))
}

/// PUT /api/combos/:id - items, when present, replace the composition
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ComboUpdate>,
) -> AppResult<Json<Combo>> {
    let store_id = user.require_store()?;
    let combo = catalog::update_combo(&state.db.pool, store_id, &id, &payload).await?;
    Ok(Json(combo))
}

/// DELETE /api/combos/:id - placed orders keep their captured snapshot
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
    if !combo_repo::delete(&mut conn, store_id, &id).await? {
        return Err(AppError::not_found("Combo"));
    }
    Ok(Json(ApiResponse::ok()))
}
