use sqlx::PgPool;
use tracing::info;

// "SHELF" — keyed advisory lock so concurrently starting processes take turns
// reconciling instead of racing the same DDL.
const SCHEMA_LOCK_KEY: i64 = 0x5348_454C_46;

/// Additive reconciliation statements. Every one is guarded by IF NOT EXISTS so
/// the whole list can run on every startup against a live schema; nothing here
/// drops or rewrites existing data.
///
/// The unique indexes are partial: uniqueness for email and call_number covers
/// live rows only, so soft-deleting a record frees its value for reuse.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS people (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        deleted_at TIMESTAMPTZ
    )",
    "CREATE TABLE IF NOT EXISTS books (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL DEFAULT '',
        author TEXT NOT NULL DEFAULT '',
        call_number INTEGER NOT NULL DEFAULT 0,
        person_id INTEGER NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        deleted_at TIMESTAMPTZ
    )",
    // Column-level reconciliation for tables created by an older build.
    "ALTER TABLE people ADD COLUMN IF NOT EXISTS name TEXT NOT NULL DEFAULT ''",
    "ALTER TABLE people ADD COLUMN IF NOT EXISTS email TEXT NOT NULL DEFAULT ''",
    "ALTER TABLE people ADD COLUMN IF NOT EXISTS created_at TIMESTAMPTZ NOT NULL DEFAULT now()",
    "ALTER TABLE people ADD COLUMN IF NOT EXISTS updated_at TIMESTAMPTZ NOT NULL DEFAULT now()",
    "ALTER TABLE people ADD COLUMN IF NOT EXISTS deleted_at TIMESTAMPTZ",
    "ALTER TABLE books ADD COLUMN IF NOT EXISTS title TEXT NOT NULL DEFAULT ''",
    "ALTER TABLE books ADD COLUMN IF NOT EXISTS author TEXT NOT NULL DEFAULT ''",
    "ALTER TABLE books ADD COLUMN IF NOT EXISTS call_number INTEGER NOT NULL DEFAULT 0",
    "ALTER TABLE books ADD COLUMN IF NOT EXISTS person_id INTEGER NOT NULL DEFAULT 0",
    "ALTER TABLE books ADD COLUMN IF NOT EXISTS created_at TIMESTAMPTZ NOT NULL DEFAULT now()",
    "ALTER TABLE books ADD COLUMN IF NOT EXISTS updated_at TIMESTAMPTZ NOT NULL DEFAULT now()",
    "ALTER TABLE books ADD COLUMN IF NOT EXISTS deleted_at TIMESTAMPTZ",
    "CREATE UNIQUE INDEX IF NOT EXISTS people_email_unique
        ON people (email) WHERE deleted_at IS NULL",
    "CREATE UNIQUE INDEX IF NOT EXISTS books_call_number_unique
        ON books (call_number) WHERE deleted_at IS NULL",
    // Serves the person -> books relationship loader.
    "CREATE INDEX IF NOT EXISTS books_person_id_idx ON books (person_id)",
];

/// Reconcile the storage schema with the entity definitions. Runs once at
/// startup, before the listener opens; failure is fatal to the process.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!("storage schema reconciled ({} statements)", SCHEMA.len());
    Ok(())
}
