//! Data models
//!
//! Shared between store-server and the two frontends (via the API).
//! Row-shaped types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All entity ids are UUIDv7 strings produced by [`crate::id`], supplied at
//! creation time — never a database sequence.

pub mod category;
pub mod combo;
pub mod employee;
pub mod order;
pub mod product;
pub mod store;
pub mod storefront;

// Re-exports
pub use category::*;
pub use combo::*;
pub use employee::*;
pub use order::*;
pub use product::*;
pub use store::*;
pub use storefront::*;
