//! Store Server - multi-store ordering and delivery backend
//!
//! # Module structure
//!
//! ```text
//! store-server/src/
//! ├── core/          # Config, server state
//! ├── auth/          # JWT, password hashing, request extractor
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── services/      # Pricing, lifecycle, catalog, storefront
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # Logging, time
//! ```
//!
//! The `shared` crate carries the domain models, the error system and
//! the identifier generator.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, ServerState};
pub use db::DbService;
pub use utils::init_logger;

// Re-export unified error types from shared
pub use shared::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Cap on in-flight requests across the whole router
const MAX_CONCURRENT_REQUESTS: usize = 100;

/// Full application router with the standard middleware stack
pub fn app(state: ServerState) -> Router {
    api::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .with_state(state)
}
