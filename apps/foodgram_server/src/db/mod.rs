// apps/foodgram_server/src/db/mod.rs

pub mod pg_store;
pub mod seed;

pub use pg_store::PgStore;
pub use seed::seed_db;

use anyhow::Context;
use sqlx::PgPool;

const SCHEMA_SQL: &str = include_str!("../../schema.sql");

/// Runs the bundled schema. Every statement is `IF NOT EXISTS`, so this is
/// safe on every start.
pub async fn apply_schema(pool: &PgPool) -> anyhow::Result<()> {
  sqlx::raw_sql(SCHEMA_SQL)
    .execute(pool)
    .await
    .context("Failed to apply schema.sql")?;
  tracing::info!("Database schema applied.");
  Ok(())
}
