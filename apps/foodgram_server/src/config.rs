// apps/foodgram_server/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
  Postgres,
  Memory,
}

impl FromStr for StorageBackend {
  type Err = AppError;

  fn from_str(value: &str) -> Result<Self> {
    match value.to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
      "memory" => Ok(StorageBackend::Memory),
      other => Err(AppError::Config(format!(
        "Invalid STORAGE_BACKEND '{}': expected 'postgres' or 'memory'",
        other
      ))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl LogFormat {
  /// Read separately from `AppConfig` because logging is set up before the
  /// rest of the configuration loads.
  pub fn from_env() -> Result<Self> {
    match env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()).as_str() {
      "pretty" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!("Invalid LOG_FORMAT '{}'", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// Absolute base used for pagination links.
  pub app_base_url: String,

  pub storage_backend: StorageBackend,
  /// Required when `storage_backend` is Postgres.
  pub database_url: Option<String>,
  pub database_max_connections: u32,
  /// Run the bundled schema.sql on startup.
  pub apply_schema: bool,
  /// Insert demo tags and ingredients on startup.
  pub seed_db: bool,

  pub page_size: u32,
  pub log_format: LogFormat,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let app_base_url = get_env("APP_BASE_URL")
      .unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port))
      .trim_end_matches('/')
      .to_string();

    let storage_backend = get_env("STORAGE_BACKEND")
      .unwrap_or_else(|_| "postgres".to_string())
      .parse::<StorageBackend>()?;
    let database_url = match storage_backend {
      StorageBackend::Postgres => Some(get_env("DATABASE_URL")?),
      StorageBackend::Memory => get_env("DATABASE_URL").ok(),
    };
    let database_max_connections = get_env("DATABASE_MAX_CONNECTIONS")
      .unwrap_or_else(|_| "5".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;

    let apply_schema = parse_bool(&get_env("APPLY_SCHEMA").unwrap_or_else(|_| "false".to_string()), "APPLY_SCHEMA")?;
    let seed_db = parse_bool(&get_env("SEED_DB").unwrap_or_else(|_| "false".to_string()), "SEED_DB")?;

    let page_size = get_env("PAGE_SIZE")
      .unwrap_or_else(|_| foodgram::DEFAULT_PAGE_SIZE.to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid PAGE_SIZE: {}", e)))?;
    if page_size == 0 || page_size > foodgram::MAX_PAGE_SIZE {
      return Err(AppError::Config(format!(
        "PAGE_SIZE must be between 1 and {}",
        foodgram::MAX_PAGE_SIZE
      )));
    }

    let log_format = LogFormat::from_env()?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      app_base_url,
      storage_backend,
      database_url,
      database_max_connections,
      apply_schema,
      seed_db,
      page_size,
      log_format,
    })
  }

  /// In-memory configuration for tests and local experiments.
  pub fn in_memory(app_base_url: &str) -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 0,
      app_base_url: app_base_url.trim_end_matches('/').to_string(),
      storage_backend: StorageBackend::Memory,
      database_url: None,
      database_max_connections: 1,
      apply_schema: false,
      seed_db: false,
      page_size: foodgram::DEFAULT_PAGE_SIZE,
      log_format: LogFormat::Pretty,
    }
  }
}

fn parse_bool(value: &str, var_name: &str) -> Result<bool> {
  value
    .parse::<bool>()
    .map_err(|e| AppError::Config(format!("Invalid {} value: {}", var_name, e)))
}
