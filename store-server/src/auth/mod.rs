//! Authentication Module
//!
//! JWT issuance/validation, Argon2 password hashing and the request
//! extractor that resolves the acting employee and their active store.

pub mod extractor;
pub mod jwt;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use password::{hash_password, verify_password};
