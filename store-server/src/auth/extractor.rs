//! JWT Extractor
//!
//! Validates the bearer token and resolves the active store for the
//! request. Handlers take `CurrentUser` as an argument; unauthenticated
//! requests are rejected before the handler body runs.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::AppError;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;

/// Header selecting which associated store a request acts on.
/// Absent: the employee's first association is used.
pub const STORE_HEADER: &str = "x-store-id";

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Reuse an earlier extraction on the same request
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => {
                tracing::warn!(uri = %parts.uri, "Request without credentials");
                return Err(AppError::unauthorized());
            }
        };

        let claims = state.jwt.validate_token(token).map_err(|e| {
            tracing::warn!(uri = %parts.uri, error = %e, "Token rejected");
            match e {
                JwtError::Expired => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            }
        })?;

        let active_store = match parts.headers.get(STORE_HEADER).map(|h| h.to_str()) {
            Some(Ok(requested)) => {
                if !claims.stores.iter().any(|s| s.store_id == requested) {
                    return Err(AppError::store_not_associated()
                        .with_detail("store_id", requested.to_string()));
                }
                Some(requested.to_string())
            }
            Some(Err(_)) => {
                return Err(AppError::validation("X-Store-Id header is not valid UTF-8"));
            }
            None => claims.stores.first().map(|s| s.store_id.clone()),
        };

        let user = CurrentUser {
            id: claims.sub,
            username: claims.username,
            stores: claims.stores,
            active_store,
        };

        parts.extensions.insert(user.clone());

        Ok(user)
    }
}
