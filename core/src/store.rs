// core/src/store.rs

//! The persistence seam.
//!
//! A `Store` owns uniqueness and atomicity: duplicate relation inserts come
//! back as `FoodgramError::Conflict`, and every multi-row write either lands
//! completely or not at all. Business rules (validation, ownership, the
//! self-follow ban) live in [`crate::service::Foodgram`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::FoodgramResult;
use crate::model::{Ingredient, NewIngredient, NewTag, NewUser, Recipe, RecipeFilter, RecipeMark, Tag, User};
use crate::pagination::PageRequest;
use crate::shopping_list::CartLine;
use crate::validation::CheckedRecipe;

#[async_trait]
pub trait Store: Send + Sync {
  // --- users ---

  /// Conflict when the email or username is taken.
  async fn insert_user(&self, user: &NewUser) -> FoodgramResult<User>;

  async fn user(&self, id: Uuid) -> FoodgramResult<Option<User>>;

  /// Users in join order.
  async fn users(&self, page: PageRequest) -> FoodgramResult<(Vec<User>, u64)>;

  /// Removes the user together with their recipes, marks and follow edges in
  /// both directions. Returns false when no such user exists.
  async fn delete_user(&self, id: Uuid) -> FoodgramResult<bool>;

  // --- reference data ---

  /// Conflict when the slug is taken.
  async fn insert_tag(&self, tag: &NewTag) -> FoodgramResult<Tag>;

  async fn tags(&self) -> FoodgramResult<Vec<Tag>>;

  async fn tag(&self, id: Uuid) -> FoodgramResult<Option<Tag>>;

  async fn insert_ingredient(&self, ingredient: &NewIngredient) -> FoodgramResult<Ingredient>;

  /// Ingredients whose name starts with `name_prefix`, case-insensitively.
  async fn ingredients(&self, name_prefix: Option<&str>) -> FoodgramResult<Vec<Ingredient>>;

  async fn ingredient(&self, id: Uuid) -> FoodgramResult<Option<Ingredient>>;

  /// Which of `ids` do not name an existing ingredient.
  async fn missing_ingredients(&self, ids: &[Uuid]) -> FoodgramResult<Vec<Uuid>>;

  /// Which of `ids` do not name an existing tag.
  async fn missing_tags(&self, ids: &[Uuid]) -> FoodgramResult<Vec<Uuid>>;

  // --- recipes ---

  /// Inserts the recipe, its tag links and ingredient rows atomically.
  async fn insert_recipe(&self, author_id: Uuid, recipe: &CheckedRecipe) -> FoodgramResult<Recipe>;

  /// Overwrites the scalar fields and replaces the tag and ingredient sets
  /// wholesale, atomically. NotFound when the recipe is gone.
  async fn replace_recipe(&self, id: Uuid, recipe: &CheckedRecipe) -> FoodgramResult<Recipe>;

  /// Cascades to association rows, tag links, favorites and cart entries.
  async fn delete_recipe(&self, id: Uuid) -> FoodgramResult<bool>;

  async fn recipe(&self, id: Uuid) -> FoodgramResult<Option<Recipe>>;

  /// Newest first.
  async fn recipes(&self, filter: &RecipeFilter, page: PageRequest) -> FoodgramResult<(Vec<Recipe>, u64)>;

  // --- favorites and shopping cart ---

  /// Conflict when the pair is already marked.
  async fn insert_mark(&self, mark: RecipeMark, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<()>;

  /// False when the pair was not marked.
  async fn delete_mark(&self, mark: RecipeMark, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<bool>;

  async fn has_mark(&self, mark: RecipeMark, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<bool>;

  /// Every ingredient row of every recipe in the user's cart.
  async fn cart_lines(&self, user_id: Uuid) -> FoodgramResult<Vec<CartLine>>;

  // --- follows ---

  /// Conflict when the edge exists.
  async fn insert_follow(&self, user_id: Uuid, author_id: Uuid) -> FoodgramResult<()>;

  async fn delete_follow(&self, user_id: Uuid, author_id: Uuid) -> FoodgramResult<bool>;

  async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> FoodgramResult<bool>;

  /// Authors `user_id` follows, in join order.
  async fn followed_authors(&self, user_id: Uuid, page: PageRequest) -> FoodgramResult<(Vec<User>, u64)>;
}
