//! Utilities

pub mod logger;
pub mod time;

pub use logger::init_logger;
pub use time::now_rfc3339;
