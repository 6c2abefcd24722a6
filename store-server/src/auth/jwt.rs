//! JWT token service
//!
//! Issues and validates the access tokens staff log in with. Claims carry
//! the employee's store associations so scoping needs no database hit per
//! request.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::StoreRole;
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, JwtError> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| JwtError::Config("JWT_SECRET must be set".to_string()))?;
        if secret.len() < 32 {
            return Err(JwtError::Config(
                "JWT_SECRET must be at least 32 characters long".to_string(),
            ));
        }

        Ok(Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "store-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "store-staff".to_string()),
        })
    }
}

/// Claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Employee id (subject)
    pub sub: String,
    pub username: String,
    /// Stores the employee may act on, with their role in each
    pub stores: Vec<StoreRole>,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a token for an employee with their store associations
    pub fn generate_token(
        &self,
        employee_id: &str,
        username: &str,
        stores: &[StoreRole],
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: employee_id.to_string(),
            username: username.to_string(),
            stores: stores.to_vec(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {e}")),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the bearer token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// Acting employee, resolved from the token plus the X-Store-Id header
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    /// All stores the employee is associated with
    pub stores: Vec<StoreRole>,
    /// Store this request acts on; None when the employee has no stores
    pub active_store: Option<String>,
}

impl CurrentUser {
    /// Whether the employee is associated with `store_id`
    pub fn is_associated(&self, store_id: &str) -> bool {
        self.stores.iter().any(|s| s.store_id == store_id)
    }

    /// Active store id, or StoreNotAssociated when there is none
    pub fn require_store(&self) -> Result<&str, shared::AppError> {
        self.active_store
            .as_deref()
            .ok_or_else(|| shared::AppError::store_not_associated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            expiration_minutes: 60,
            issuer: "store-server".to_string(),
            audience: "store-staff".to_string(),
        })
    }

    #[test]
    fn test_generation_and_validation() {
        let service = test_service();
        let stores = vec![StoreRole {
            store_id: "store-1".to_string(),
            role: "manager".to_string(),
        }];

        let token = service
            .generate_token("emp-1", "alice", &stores)
            .expect("generate");
        let claims = service.validate_token(&token).expect("validate");

        assert_eq!(claims.sub, "emp-1");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.stores, stores);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let service = test_service();
        let token = service.generate_token("emp-1", "alice", &[]).expect("generate");

        let other = JwtService::with_config(JwtConfig {
            secret: "ffffffffffffffffffffffffffffffff".to_string(),
            expiration_minutes: 60,
            issuer: "store-server".to_string(),
            audience: "store-staff".to_string(),
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_store_association() {
        let user = CurrentUser {
            id: "emp-1".to_string(),
            username: "alice".to_string(),
            stores: vec![StoreRole {
                store_id: "store-1".to_string(),
                role: "staff".to_string(),
            }],
            active_store: Some("store-1".to_string()),
        };

        assert!(user.is_associated("store-1"));
        assert!(!user.is_associated("store-2"));
        assert_eq!(user.require_store().unwrap(), "store-1");
    }
}
