//! # Almacén Server
//!
//! REST API for the inventory & sales backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Almacén Server                                   │
//! │                                                                         │
//! │  Client ───► HTTP (axum) ───► Handlers ───► Repositories ───► SQLite   │
//! │                   │                                                     │
//! │                   └── JWT middleware (all /api routes except login)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod auth;
mod config;
mod error;
mod pdf;
mod routes;
mod state;

use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use almacen_core::NewUser;
use almacen_db::{Database, DbConfig};

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Almacén server...");

    // Load configuration
    let config = AppConfig::load()?;
    info!(
        port = config.port,
        db = %config.database_path,
        "Configuration loaded"
    );

    // Connect to database (runs migrations)
    let db = Database::new(DbConfig::new(&config.database_path)).await?;
    info!("Database ready");

    seed_admin(&db).await?;

    // Build router
    let state = AppState::new(db.clone(), config.clone());
    let app = routes::api_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Seeds the first administrator when the user table is empty, so a
/// fresh install can log in at all.
async fn seed_admin(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    if db.users().count().await? > 0 {
        return Ok(());
    }

    let password_hash = auth::hash_password("admin123")?;
    db.users()
        .insert(
            &NewUser {
                username: "admin".to_string(),
                password: String::new(),
                role: "Administrador".to_string(),
                fullname: Some("Administrador".to_string()),
            },
            &password_hash,
        )
        .await?;

    warn!("Seeded default admin user; change its password after first login");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
