//! Server state
//!
//! Shared by every handler through axum's state extractor. Cloning is
//! shallow: the pool and the JWT service are reference-counted.

use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;

#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, db: DbService, jwt: JwtService) -> Self {
        Self {
            config,
            db,
            jwt: Arc::new(jwt),
        }
    }
}
