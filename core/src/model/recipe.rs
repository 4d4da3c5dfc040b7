// core/src/model/recipe.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use super::catalog::Tag;
use super::user::UserCard;

/// One association row: an ingredient used by a recipe, with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeIngredient {
  /// The ingredient's id, not the association's.
  pub id: Uuid,
  pub name: String,
  pub measurement_unit: String,
  pub amount: i32,
}

/// A recipe as persisted, with tags and ingredients resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
  pub id: Uuid,
  pub author_id: Uuid,
  pub name: String,
  pub text: String,
  pub image: Option<String>,
  pub cooking_time: i32,
  pub pub_date: DateTime<Utc>,
  pub tags: Vec<Tag>,
  pub ingredients: Vec<RecipeIngredient>,
}

impl Recipe {
  pub fn short(&self) -> RecipeShort {
    RecipeShort {
      id: self.id,
      name: self.name.clone(),
      image: self.image.clone(),
      cooking_time: self.cooking_time,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeShort {
  pub id: Uuid,
  pub name: String,
  pub image: Option<String>,
  pub cooking_time: i32,
}

/// Full representation returned by the read and write endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeView {
  pub id: Uuid,
  pub tags: Vec<Tag>,
  pub author: UserCard,
  pub ingredients: Vec<RecipeIngredient>,
  pub is_favorited: bool,
  pub is_in_shopping_cart: bool,
  pub name: String,
  pub image: Option<String>,
  pub text: String,
  pub cooking_time: i32,
  pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IngredientAmount {
  pub id: Uuid,
  #[serde(deserialize_with = "lenient_integer")]
  pub amount: i64,
}

/// Create/update payload. Numbers are wide so out-of-range values reach
/// validation instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeDraft {
  pub ingredients: Vec<IngredientAmount>,
  pub tags: Vec<Uuid>,
  #[serde(default)]
  pub image: Option<String>,
  pub name: String,
  pub text: String,
  #[serde(deserialize_with = "lenient_integer")]
  pub cooking_time: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntegerOrText {
  Integer(i64),
  Text(String),
}

/// Form-style clients send numbers as strings; accept `200` and `"200"` alike.
fn lenient_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
  match IntegerOrText::deserialize(deserializer)? {
    IntegerOrText::Integer(value) => Ok(value),
    IntegerOrText::Text(text) => text
      .trim()
      .parse()
      .map_err(|_| serde::de::Error::custom(format!("A valid integer is required, got \"{}\".", text))),
  }
}

/// The per-user recipe sets that share one toggle implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecipeMark {
  Favorite,
  ShoppingCart,
}

impl RecipeMark {
  pub fn table(self) -> &'static str {
    match self {
      RecipeMark::Favorite => "favorites",
      RecipeMark::ShoppingCart => "shopping_cart",
    }
  }
}

impl fmt::Display for RecipeMark {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RecipeMark::Favorite => f.write_str("favorites"),
      RecipeMark::ShoppingCart => f.write_str("shopping cart"),
    }
  }
}

/// Store-level listing filter. All present conditions must hold; `tags`
/// matches recipes carrying any of the slugs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
  pub tags: Vec<String>,
  pub author: Option<Uuid>,
  pub favorited_by: Option<Uuid>,
  pub in_cart_of: Option<Uuid>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn numbers_may_arrive_as_strings() {
    let id = Uuid::new_v4();
    let item: IngredientAmount = serde_json::from_value(serde_json::json!({"id": id, "amount": "200"})).unwrap();
    assert_eq!(item.amount, 200);

    let draft: RecipeDraft = serde_json::from_value(serde_json::json!({
      "ingredients": [{"id": id, "amount": 3}],
      "tags": [],
      "name": "Блины",
      "text": "Жарить.",
      "cooking_time": " 15 ",
    }))
    .unwrap();
    assert_eq!(draft.cooking_time, 15);
    assert_eq!(draft.ingredients[0].amount, 3);
  }

  #[test]
  fn non_numeric_strings_are_rejected() {
    let id = Uuid::new_v4();
    for amount in [serde_json::json!("двести"), serde_json::json!("2.5"), serde_json::json!(null)] {
      let parsed = serde_json::from_value::<IngredientAmount>(serde_json::json!({"id": id, "amount": amount}));
      assert!(parsed.is_err());
    }
  }
}
