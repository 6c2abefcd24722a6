//! Server configuration
//!
//! Everything comes from environment variables (a `.env` file is loaded
//! in main):
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | HTTP_PORT | 3000 | HTTP API port |
//! | DATABASE_PATH | store.db | SQLite database file |
//! | JWT_SECRET | (required) | Token signing secret, min 32 bytes |
//! | JWT_EXPIRATION_MINUTES | 1440 | Token lifetime |
//! | JWT_ISSUER | store-server | Token issuer |
//! | JWT_AUDIENCE | store-staff | Token audience |
//! | ENVIRONMENT | development | development \| production |

use crate::auth::{JwtConfig, JwtError};

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    /// Path to the SQLite database file
    pub database_path: String,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "store.db".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    pub fn jwt_config(&self) -> Result<JwtConfig, JwtError> {
        JwtConfig::from_env()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
