//! Shared application state.

use std::sync::Arc;

use almacen_db::Database;

use crate::auth::JwtManager;
use crate::config::AppConfig;

/// State handed to every handler. Cheap to clone: the database holds a
/// pooled connection internally and the rest sits behind `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        let jwt = Arc::new(JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_lifetime_secs,
        ));
        AppState {
            db,
            config: Arc::new(config),
            jwt,
        }
    }
}
