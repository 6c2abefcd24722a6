//! Services Module
//!
//! Business logic above the repositories: basket pricing, order
//! lifecycle, catalog validation and the customer-facing storefront.

pub mod catalog;
pub mod lifecycle;
pub mod pricing;
pub mod storefront;
