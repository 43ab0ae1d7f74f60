//! PostgreSQL Gateway
//!
//! Owns the connection pool shared by every repository. Connecting is the
//! only place where an unreachable database is fatal; once the pool exists,
//! store faults surface per call as repository errors.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Default pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect and ping. Fails if the server cannot be reached.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await?;

        let db = Self { pool };
        db.ping().await?;

        tracing::info!(max_connections, "Connected to database");
        Ok(db)
    }

    /// Wrap an existing pool (tests, tooling)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Round-trip a trivial statement
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to be returned
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

/// Build a connection URL from discrete parts
pub fn postgres_url(user: &str, password: &str, host: &str, dbname: &str) -> String {
    format!("postgres://{user}:{password}@{host}/{dbname}?sslmode=disable")
}
