//! Auth API Handlers

use axum::{Json, extract::State};
use shared::models::{Employee, EmployeeCreate, LoginRequest, LoginResponse};
use shared::{AppError, AppResult};

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::employee as employee_repo;
use crate::utils::now_rfc3339;

/// POST /api/auth/login - exchange credentials for a token
///
/// Unknown usernames and wrong passwords produce the same error.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let mut conn = state
        .db
        .pool
        .acquire()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let record = employee_repo::find_by_username(&mut conn, &payload.username)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&payload.password, &record.password_hash) {
        tracing::warn!(username = %payload.username, "Failed login attempt");
        return Err(AppError::invalid_credentials());
    }
    if !record.is_active {
        return Err(AppError::new(shared::ErrorCode::AccountDisabled));
    }

    let stores = employee_repo::find_store_roles(&mut conn, &record.id).await?;
    let token = state
        .jwt
        .generate_token(&record.id, &record.username, &stores)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(username = %payload.username, "Staff logged in");

    Ok(Json(LoginResponse {
        token,
        employee: record.into(),
        stores,
    }))
}

/// POST /api/auth/register - create a staff account (authenticated)
pub async fn register(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<Employee>> {
    if payload.username.trim().is_empty() {
        return Err(AppError::validation("Username cannot be empty"));
    }
    if payload.password.len() < 8 {
        return Err(AppError::validation(
            "Password must be at least 8 characters",
        ));
    }

    let hash = hash_password(&payload.password)?;

    let employee = Employee {
        id: shared::id::new_id_string(),
        username: payload.username.clone(),
        display_name: payload
            .display_name
            .clone()
            .unwrap_or_else(|| payload.username.clone()),
        is_active: true,
        created_at: now_rfc3339(),
    };

    let mut tx = state
        .db
        .pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    employee_repo::insert(&mut tx, &employee, &hash)
        .await
        .map_err(|e| match e {
            crate::db::repository::RepoError::Duplicate(_) => {
                AppError::already_exists("Username")
            }
            other => other.into(),
        })?;

    for store_role in &payload.stores {
        employee_repo::associate_store(&mut tx, &employee.id, store_role).await?;
    }

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    Ok(Json(employee))
}
