// apps/foodgram_server/src/models/user.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
  pub id: Uuid,
  pub email: String,
  pub username: String,
  pub first_name: String,
  pub last_name: String,
  /// `user` or `admin`; the column check keeps anything else out.
  pub role: String,
  pub joined_at: DateTime<Utc>,
}

impl From<UserRow> for foodgram::User {
  fn from(row: UserRow) -> Self {
    foodgram::User {
      id: row.id,
      email: row.email,
      username: row.username,
      first_name: row.first_name,
      last_name: row.last_name,
      role: row.role.parse().unwrap_or_default(),
      joined_at: row.joined_at,
    }
  }
}
