use anyhow::Context;
use tracing_subscriber::EnvFilter;

use shelf_api::config::AppConfig;
use shelf_api::database::{self, Store};
use shelf_api::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL and friends.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("shelf_api=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env();

    let pool = database::connect(&config.database)
        .await
        .context("connecting to storage")?;

    database::schema::ensure_schema(&pool)
        .await
        .context("reconciling storage schema")?;

    let app = router::app(Store::new(pool.clone()));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;

    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving requests")?;

    pool.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", err);
    }
}
