//! Shared types for the store platform
//!
//! Domain models, error types, response structures and the identifier
//! generator used by both the server and API clients. This crate performs
//! no I/O; enable the `db` feature to derive `sqlx::FromRow` on row-shaped
//! models.

pub mod error;
pub mod id;
pub mod models;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
