// core/src/model/catalog.rs

//! Reference data: tags and ingredients. Both are ordered by name, descending.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
  pub id: Uuid,
  pub name: String,
  /// Hex color, `#RRGGBB`.
  pub color: String,
  pub slug: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
  pub name: String,
  pub color: String,
  pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
  pub id: Uuid,
  pub name: String,
  pub measurement_unit: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredient {
  pub name: String,
  pub measurement_unit: String,
}

/// Sort key shared by every store so tag and ingredient listings agree.
pub(crate) fn by_name_desc<'a>(a: &'a str, b: &'a str) -> std::cmp::Ordering {
  b.cmp(a)
}
