// apps/foodgram_server/src/models/catalog.rs

use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct TagRow {
  pub id: Uuid,
  pub name: String,
  pub color: String,
  pub slug: String,
}

impl From<TagRow> for foodgram::Tag {
  fn from(row: TagRow) -> Self {
    foodgram::Tag {
      id: row.id,
      name: row.name,
      color: row.color,
      slug: row.slug,
    }
  }
}

#[derive(Debug, Clone, FromRow)]
pub struct IngredientRow {
  pub id: Uuid,
  pub name: String,
  pub measurement_unit: String,
}

impl From<IngredientRow> for foodgram::Ingredient {
  fn from(row: IngredientRow) -> Self {
    foodgram::Ingredient {
      id: row.id,
      name: row.name,
      measurement_unit: row.measurement_unit,
    }
  }
}
