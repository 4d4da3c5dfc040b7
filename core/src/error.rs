// core/src/error.rs
use anyhow::Error as AnyhowError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field-level validation messages, keyed by the request field they belong to.
///
/// Serializes as `{"field": ["message", ...]}` so the web layer can hand it
/// to the caller unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
  pub fn new() -> Self {
    Self::default()
  }

  /// Shorthand for a single-field failure.
  pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
    let mut errors = Self::new();
    errors.add(field, message);
    errors
  }

  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.entry(field.into()).or_default().push(message.into());
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn contains_field(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn messages(&self, field: &str) -> &[String] {
    self.0.get(field).map(Vec::as_slice).unwrap_or_default()
  }

  /// `Ok(())` when nothing was recorded, otherwise the collected errors.
  pub fn into_result(self) -> FoodgramResult<()> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(FoodgramError::Validation(self))
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, messages) in &self.0 {
      for message in messages {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{}: {}", field, message)?;
        first = false;
      }
    }
    Ok(())
  }
}

#[derive(Debug, Error)]
pub enum FoodgramError {
  #[error("Validation failed: {0}")]
  Validation(ValidationErrors),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Storage backend failed. Source: {source}")]
  Storage {
    #[source]
    source: AnyhowError,
  },
}

impl FoodgramError {
  pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
    FoodgramError::Validation(ValidationErrors::single(field, message))
  }

  pub fn is_validation(&self) -> bool {
    matches!(self, FoodgramError::Validation(_))
  }

  pub fn is_conflict(&self) -> bool {
    matches!(self, FoodgramError::Conflict(_))
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, FoodgramError::NotFound(_))
  }

  pub fn is_forbidden(&self) -> bool {
    matches!(self, FoodgramError::Forbidden(_))
  }
}

// Store implementations report backend failures through anyhow.
impl From<AnyhowError> for FoodgramError {
  fn from(err: AnyhowError) -> Self {
    match err.downcast::<FoodgramError>() {
      Ok(domain_err) => domain_err,
      Err(err) => FoodgramError::Storage { source: err },
    }
  }
}

pub type FoodgramResult<T, E = FoodgramError> = std::result::Result<T, E>;
