//! Persistence gateway for the roll inventory.
//!
//! Owns pool construction, startup schema bootstrap, the `Roll` model and
//! the repository that every HTTP operation goes through.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Idempotent bootstrap for the single `rolls` table. Never drops or alters.
const CREATE_ROLLS_TABLE: &str = "\
    CREATE TABLE IF NOT EXISTS rolls (
        id           BIGSERIAL PRIMARY KEY,
        length       DOUBLE PRECISION NOT NULL,
        weight       DOUBLE PRECISION NOT NULL,
        added_date   TIMESTAMPTZ NOT NULL DEFAULT date_trunc('second', now()),
        removed_date TIMESTAMPTZ NULL
    )";

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Ensure the `rolls` table exists.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_ROLLS_TABLE).execute(pool).await?;
    tracing::debug!("rolls table present");
    Ok(())
}
