//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. The JWT secret has a development fallback; production
//! deployments set `JWT_SECRET`.

use std::env;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port.
    pub port: u16,

    /// Path to the SQLite database file.
    pub database_path: String,

    /// JWT signing secret.
    pub jwt_secret: String,

    /// JWT token lifetime in seconds (default: 7 days).
    pub jwt_lifetime_secs: i64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = AppConfig {
            port: env::var("ALMACEN_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("ALMACEN_PORT".to_string()))?,

            database_path: env::var("ALMACEN_DB_PATH")
                .unwrap_or_else(|_| "almacen.db".to_string()),

            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // In production, this MUST be set via environment variable
                "almacen-dev-secret-change-in-production".to_string()
            }),

            jwt_lifetime_secs: env::var("JWT_LIFETIME_SECS")
                .unwrap_or_else(|_| "604800".to_string()) // 7 days
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_LIFETIME_SECS".to_string()))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_without_env() {
        // Env vars are unset in the test environment; defaults win.
        let config = AppConfig::load().unwrap();
        assert_eq!(config.jwt_lifetime_secs, 604_800);
        assert!(!config.jwt_secret.is_empty());
    }
}
