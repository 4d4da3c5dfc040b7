// apps/foodgram_server/src/models/recipe.rs

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// The `recipes` table alone; tags and ingredients are loaded separately.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
  pub id: Uuid,
  pub author_id: Uuid,
  pub name: String,
  pub text: String,
  pub image: Option<String>,
  pub cooking_time: i32,
  pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecipeTagRow {
  pub recipe_id: Uuid,
  pub id: Uuid,
  pub name: String,
  pub color: String,
  pub slug: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecipeIngredientRow {
  pub recipe_id: Uuid,
  pub ingredient_id: Uuid,
  pub name: String,
  pub measurement_unit: String,
  pub amount: i32,
}

#[derive(Debug, Clone, FromRow)]
pub struct CartLineRow {
  pub recipe_id: Uuid,
  pub name: String,
  pub measurement_unit: String,
  pub amount: i32,
}

impl From<CartLineRow> for foodgram::CartLine {
  fn from(row: CartLineRow) -> Self {
    foodgram::CartLine {
      recipe_id: row.recipe_id,
      name: row.name,
      measurement_unit: row.measurement_unit,
      amount: row.amount,
    }
  }
}

impl From<RecipeTagRow> for foodgram::Tag {
  fn from(row: RecipeTagRow) -> Self {
    foodgram::Tag {
      id: row.id,
      name: row.name,
      color: row.color,
      slug: row.slug,
    }
  }
}

impl From<RecipeIngredientRow> for foodgram::RecipeIngredient {
  fn from(row: RecipeIngredientRow) -> Self {
    foodgram::RecipeIngredient {
      id: row.ingredient_id,
      name: row.name,
      measurement_unit: row.measurement_unit,
      amount: row.amount,
    }
  }
}
