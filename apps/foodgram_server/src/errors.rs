// apps/foodgram_server/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use foodgram::FoodgramError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Bad Request: {0}")]
  BadRequest(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Domain Error: {source}")]
  Domain {
    #[from]
    source: FoodgramError,
  },
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::Domain { source } => match source {
        FoodgramError::Validation(_) => StatusCode::BAD_REQUEST,
        FoodgramError::Conflict(_) => StatusCode::CONFLICT,
        FoodgramError::NotFound(_) => StatusCode::NOT_FOUND,
        FoodgramError::Forbidden(_) => StatusCode::FORBIDDEN,
        FoodgramError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    match self {
      AppError::Auth(m) => {
        tracing::warn!(application_error = %self, "Responding with error");
        HttpResponse::Unauthorized().json(json!({"detail": m}))
      }
      AppError::BadRequest(m) => {
        tracing::warn!(application_error = %self, "Responding with error");
        HttpResponse::BadRequest().json(json!({"detail": m}))
      }
      AppError::Domain { source } => domain_error_response(source),
      AppError::Config(m) => {
        tracing::error!(application_error = %self, "Responding with error");
        HttpResponse::InternalServerError().json(json!({"detail": "Configuration issue", "error": m}))
      }
    }
  }
}

fn domain_error_response(source: &FoodgramError) -> HttpResponse {
  match source {
    FoodgramError::Validation(errors) => {
      tracing::warn!(validation_errors = %errors, "Rejecting invalid request");
      HttpResponse::BadRequest().json(errors)
    }
    FoodgramError::Conflict(m) => {
      tracing::warn!(conflict = %m, "Rejecting duplicate");
      HttpResponse::Conflict().json(json!({"detail": m}))
    }
    FoodgramError::NotFound(m) => {
      tracing::warn!(not_found = %m, "Responding with not found");
      HttpResponse::NotFound().json(json!({"detail": m}))
    }
    FoodgramError::Forbidden(m) => {
      tracing::warn!(forbidden = %m, "Responding with forbidden");
      HttpResponse::Forbidden().json(json!({"detail": m}))
    }
    FoodgramError::Storage { source } => {
      tracing::error!(storage_error = ?source, "Storage failure");
      HttpResponse::InternalServerError().json(json!({"detail": "Storage operation failed"}))
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
