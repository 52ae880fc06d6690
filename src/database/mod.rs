pub mod models;
pub mod schema;
pub mod store;

pub use store::{Store, StoreError};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

/// Open the process-wide connection pool. Called once at startup; the pool is
/// handed to the router state and closed at shutdown.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let url = config.connection_url()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(&url)
        .await?;

    info!(
        max_connections = config.max_connections,
        "database pool established"
    );
    Ok(pool)
}
