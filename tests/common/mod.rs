use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use shelf_api::database::{schema, Store};
use shelf_api::router;

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
}

/// Serve the full application against the database named by
/// TEST_DATABASE_URL, on an ephemeral port. Returns None when the variable
/// is unset so the suite stays runnable without a local Postgres.
pub async fn spawn_app() -> Result<Option<TestApp>> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .context("connecting to the test database")?;

    schema::ensure_schema(&pool)
        .await
        .context("reconciling the test schema")?;

    let app = router::app(Store::new(pool));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("binding an ephemeral port")?;
    let addr = listener.local_addr().context("reading the bound address")?;

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    Ok(Some(TestApp {
        base_url: format!("http://{}", addr),
        client: reqwest::Client::new(),
    }))
}

/// Email that cannot collide with earlier runs against a persistent database.
pub fn unique_email(tag: &str) -> String {
    format!("{}+{}@example.com", tag, Uuid::new_v4().simple())
}

/// Call number drawn from a space wide enough that collisions do not happen
/// in practice.
pub fn unique_call_number() -> i32 {
    (Uuid::new_v4().as_u128() & 0x7fff_ffff) as i32
}
