//! Unified error codes
//!
//! Error codes shared by the server and both frontends. Codes are organized
//! by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as `u16` on the wire for cross-language compatibility
/// (Rust, TypeScript).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Unknown error
    Unknown = 1,
    /// Validation failed (malformed quantities, empty basket, bad payloads)
    ValidationFailed = 2,
    /// Resource not found (absent, or belongs to another store)
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Caller's active store does not own the target entity
    PermissionDenied = 2001,
    /// Staff is not associated with the requested store
    StoreNotAssociated = 2002,

    // ==================== 4xxx: Order ====================
    /// Illegal order status transition
    InvalidTransition = 4001,
    /// Discount exceeds the order subtotal (or is negative)
    InvalidDiscount = 4002,
    /// Cancellation requires a non-empty reason
    CancelReasonRequired = 4003,

    // ==================== 6xxx: Catalog ====================
    /// Catalog item exists but is flagged unavailable or out of stock
    ProductUnavailable = 6001,
    /// Requested add-on is not declared for the parent product
    InvalidAddon = 6002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Error category, derived from the code range
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }

    /// Default human-readable message
    pub fn message(&self) -> &'static str {
        match self {
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::NotAuthenticated => "Not authenticated",
            Self::InvalidCredentials => "Invalid username or password",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Token is invalid",
            Self::AccountDisabled => "Account is disabled",
            Self::PermissionDenied => "Permission denied",
            Self::StoreNotAssociated => "Staff is not associated with this store",
            Self::InvalidTransition => "Illegal order status transition",
            Self::InvalidDiscount => "Discount exceeds order subtotal",
            Self::CancelReasonRequired => "Cancellation requires a reason",
            Self::ProductUnavailable => "Item is unavailable",
            Self::InvalidAddon => "Add-on is not declared for this product",
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
        }
    }

    /// HTTP status code this error maps to
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidDiscount
            | Self::CancelReasonRequired
            | Self::InvalidAddon => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,
            Self::AccountDisabled | Self::PermissionDenied | Self::StoreNotAssociated => {
                StatusCode::FORBIDDEN
            }
            Self::InvalidTransition | Self::ProductUnavailable => StatusCode::CONFLICT,
            Self::Unknown | Self::InternalError | Self::DatabaseError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidCredentials),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),
            1005 => Ok(Self::AccountDisabled),
            2001 => Ok(Self::PermissionDenied),
            2002 => Ok(Self::StoreNotAssociated),
            4001 => Ok(Self::InvalidTransition),
            4002 => Ok(Self::InvalidDiscount),
            4003 => Ok(Self::CancelReasonRequired),
            6001 => Ok(Self::ProductUnavailable),
            6002 => Ok(Self::InvalidAddon),
            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            _ => Err(format!("Unknown error code: {value}")),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Error category classification based on error code ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Order errors (4xxx)
    Order,
    /// Catalog errors (6xxx)
    Catalog,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            4000..5000 => Self::Order,
            6000..7000 => Self::Catalog,
            _ => Self::System,
        }
    }
}
