//! Unified error system
//!
//! - [`ErrorCode`]: standardized error codes for every failure the platform
//!   reports to callers
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: error type carrying a code, a message and optional details
//! - [`ApiResponse`]: unified API response envelope
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

mod codes;
mod types;

pub use codes::{ErrorCategory, ErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
