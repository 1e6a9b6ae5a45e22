//! HTTP Server implementation
//!
//! - Configurable host/port binding
//! - Graceful shutdown on Ctrl+C or SIGTERM

use crate::api::handlers::AppState;
use crate::api::routes::build_router;
use crate::auth::{PasswordHasher, TokenIssuer};
use crate::core::config::{Config, ServerConfig};
use crate::db::{DatabaseManager, SqliteAccountStore};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

/// HTTP API Server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server backed by the SQLite account store
    pub fn new(config: &Config, db: Arc<DatabaseManager>) -> Self {
        let hasher = PasswordHasher::new(config.security.bcrypt_cost);
        let tokens = TokenIssuer::new(&config.security.jwt_secret, config.security.token_ttl_secs);
        let accounts = Arc::new(SqliteAccountStore::new(db, hasher));

        let state = AppState::new(
            accounts,
            tokens,
            hasher,
            config.security.enforce_account_ownership,
        );

        Self {
            router: build_router(state, &config.security.allowed_origins),
            config: config.server.clone(),
        }
    }

    /// Start the HTTP server and listen for requests
    ///
    /// Blocks until the server is shut down gracefully.
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }

    /// Get a reference to the router
    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}
