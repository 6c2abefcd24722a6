//! Core Module
//!
//! Configuration and shared server state.

pub mod config;
pub mod state;

pub use config::Config;
pub use state::ServerState;
