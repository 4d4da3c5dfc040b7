// core/src/model/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::recipe::RecipeShort;

/// Admins may edit and delete any recipe; users only their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
  #[default]
  User,
  Admin,
}

impl UserRole {
  pub fn as_str(self) -> &'static str {
    match self {
      UserRole::User => "user",
      UserRole::Admin => "admin",
    }
  }
}

impl fmt::Display for UserRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for UserRole {
  type Err = String;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "user" => Ok(UserRole::User),
      "admin" => Ok(UserRole::Admin),
      other => Err(format!("Unknown user role '{}'", other)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: Uuid,
  pub email: String,
  pub username: String,
  pub first_name: String,
  pub last_name: String,
  pub role: UserRole,
  pub joined_at: DateTime<Utc>,
}

impl User {
  pub fn is_admin(&self) -> bool {
    self.role == UserRole::Admin
  }
}

/// Registration payload. Credentials live with the external authenticator.
///
/// `role` is never read from a request body; admins are created in code.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub email: String,
  pub username: String,
  pub first_name: String,
  pub last_name: String,
  #[serde(skip_deserializing)]
  pub role: UserRole,
}

/// A user as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCard {
  pub email: String,
  pub id: Uuid,
  pub username: String,
  pub first_name: String,
  pub last_name: String,
  pub is_subscribed: bool,
}

impl UserCard {
  pub fn new(user: User, is_subscribed: bool) -> Self {
    Self {
      email: user.email,
      id: user.id,
      username: user.username,
      first_name: user.first_name,
      last_name: user.last_name,
      is_subscribed,
    }
  }
}

/// An author the viewer follows, with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscription {
  #[serde(flatten)]
  pub author: UserCard,
  pub recipes: Vec<RecipeShort>,
  pub recipes_count: u64,
}
