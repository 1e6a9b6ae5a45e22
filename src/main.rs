//! Account Service - HTTP account management backend

use account_service::{api, core, db};

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (handles CLI args, env vars, and config file)
    let config = match core::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Starting Account Service v{}", account_service::VERSION);
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Server configuration"
    );

    if config.security.jwt_secret == core::config::DEFAULT_JWT_SECRET {
        tracing::warn!("Using the default JWT secret; set security.jwt_secret for production");
    }

    info!(path = ?config.database.path, "Initializing database...");
    let db = Arc::new(db::DatabaseManager::new(
        &config.database.path,
        config.database.connection_pool_size,
        Duration::from_millis(config.database.busy_timeout),
    )?);
    info!(pool_size = db.pool_size(), "Database initialized successfully");

    let server = api::ApiServer::new(&config, db);
    let result = server.serve().await;

    if let Err(e) = &result {
        tracing::error!("Server error: {}", e);
    }

    logger.flush();
    result
}
