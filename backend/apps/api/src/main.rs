//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::future::IntoFuture;
use std::sync::Arc;

use auth::{AuthAppState, PgUserRepository, auth_router, require_session};
use axum::{Router, middleware};
use catalog::{CatalogAppState, CatalogConfig, ItemCache, PgItemRepository, catalog_router};
use kernel::error::app_error::AppError;
use platform::database::Database;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{SHUTDOWN_GRACE, ServerConfig};

/// Services shared by every request, built once at startup
struct AppState {
    auth: AuthAppState<PgUserRepository>,
    catalog: CatalogAppState<PgItemRepository>,
}

impl AppState {
    fn new(db: &Database, config: &ServerConfig) -> anyhow::Result<Self> {
        let auth = AuthAppState::new(PgUserRepository::new(db), config.auth_config())?;
        let cache = ItemCache::new(
            Arc::new(PgItemRepository::new(db)),
            &CatalogConfig::default(),
        );

        Ok(Self {
            auth,
            catalog: CatalogAppState { cache },
        })
    }

    /// Auth routes are public; every catalog route needs a session.
    fn router(self) -> Router {
        let protected = catalog_router(self.catalog).route_layer(middleware::from_fn_with_state(
            self.auth.session_state(),
            require_session,
        ));

        Router::new()
            .merge(auth_router(self.auth))
            .merge(protected)
            .fallback(route_not_found)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,catalog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Database connection; unreachable store is fatal here and nowhere else
    let db = Database::connect(&config.database_url, config.db_max_connections).await?;

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(db.pool())
        .await?;

    tracing::info!("Migrations completed");

    let app = AppState::new(&db, &config)?.router();

    // Start server
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    let shutdown = Arc::new(Notify::new());
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown({
                let shutdown = shutdown.clone();
                async move { shutdown.notified().await }
            })
            .into_future(),
    );

    tokio::select! {
        result = &mut server => {
            result??;
            tracing::warn!("Server stopped without a shutdown signal");
        }
        () = shutdown_signal() => {
            tracing::info!("Shutdown signal received, draining connections");
            shutdown.notify_one();
            match tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await {
                Ok(result) => result??,
                Err(_) => {
                    tracing::warn!(
                        grace_secs = SHUTDOWN_GRACE.as_secs(),
                        "Graceful shutdown timed out, dropping open connections"
                    );
                    server.abort();
                }
            }
        }
    }

    db.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
