use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;

/// Shared application state, cloned per request. The connection handle is
/// passed in explicitly so tests can substitute an in-memory database.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
