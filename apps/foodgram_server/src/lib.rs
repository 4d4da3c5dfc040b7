// apps/foodgram_server/src/lib.rs

//! HTTP server for Foodgram: actix-web routes over the `foodgram` domain
//! crate, backed by PostgreSQL or the in-memory store.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod state;
pub mod web;

use std::sync::Arc;

use anyhow::Context;
use foodgram::{Foodgram, MemoryStore, Store};
use sqlx::postgres::PgPoolOptions;

use crate::config::{AppConfig, StorageBackend};
use crate::state::AppState;

/// Builds the shared state for the configured backend: connects the pool,
/// applies the schema and seeds demo data when asked to.
pub async fn build_state(config: AppConfig) -> anyhow::Result<AppState> {
  let store: Arc<dyn Store> = match config.storage_backend {
    StorageBackend::Postgres => {
      let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres backend")?;
      let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to the database")?;
      tracing::info!("Successfully connected to the database.");

      if config.apply_schema {
        db::apply_schema(&pool).await?;
      }
      Arc::new(db::PgStore::new(pool))
    }
    StorageBackend::Memory => {
      tracing::info!("Using the in-memory store; data is lost on shutdown.");
      Arc::new(MemoryStore::new())
    }
  };

  let foodgram = Foodgram::new(store);
  if config.seed_db {
    db::seed_db(&foodgram).await?;
  }

  Ok(AppState {
    foodgram,
    config: Arc::new(config),
  })
}
