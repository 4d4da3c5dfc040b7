// apps/foodgram_server/src/web/extractors.rs

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "X-User-ID";

/// Caller identity taken from the `X-User-ID` header. Handlers that allow
/// anonymous access take `Option<AuthenticatedUser>` instead.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let parsed = req
      .headers()
      .get(USER_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| Uuid::parse_str(value.trim()).ok());

    match parsed {
      Some(user_id) => ready(Ok(AuthenticatedUser { user_id })),
      None => {
        warn!("AuthenticatedUser extractor: Missing or invalid X-User-ID header.");
        ready(Err(AppError::Auth(
          "Authentication credentials were not provided.".to_string(),
        )))
      }
    }
  }
}

pub fn viewer(user: &Option<AuthenticatedUser>) -> Option<Uuid> {
  user.as_ref().map(|user| user.user_id)
}
