// core/src/memory.rs

//! An in-process [`Store`] backed by plain collections behind one
//! `parking_lot::RwLock`.
//!
//! Every write takes the write guard once and finishes before releasing it, so
//! multi-row writes are atomic with respect to every reader. Guards are never
//! held across an `.await`.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::{FoodgramError, FoodgramResult};
use crate::model::catalog::by_name_desc;
use crate::model::{
  Ingredient, NewIngredient, NewTag, NewUser, Recipe, RecipeFilter, RecipeIngredient, RecipeMark, Tag, User,
};
use crate::pagination::PageRequest;
use crate::shopping_list::CartLine;
use crate::store::Store;
use crate::validation::CheckedRecipe;

#[derive(Debug, Clone)]
struct RecipeRow {
  id: Uuid,
  seq: u64,
  author_id: Uuid,
  name: String,
  text: String,
  image: Option<String>,
  cooking_time: i32,
  pub_date: chrono::DateTime<Utc>,
  tag_ids: Vec<Uuid>,
  ingredients: Vec<(Uuid, i32)>,
}

#[derive(Debug, Default)]
struct Tables {
  next_seq: u64,
  users: Vec<User>,
  tags: Vec<Tag>,
  ingredients: Vec<Ingredient>,
  recipes: Vec<RecipeRow>,
  marks: BTreeSet<(RecipeMark, Uuid, Uuid)>,
  // (follower, author)
  follows: BTreeSet<(Uuid, Uuid)>,
}

impl Tables {
  fn seq(&mut self) -> u64 {
    self.next_seq += 1;
    self.next_seq
  }

  fn recipe_row(&self, id: Uuid) -> Option<&RecipeRow> {
    self.recipes.iter().find(|row| row.id == id)
  }

  fn hydrate(&self, row: &RecipeRow) -> Recipe {
    let mut tags: Vec<Tag> = self
      .tags
      .iter()
      .filter(|tag| row.tag_ids.contains(&tag.id))
      .cloned()
      .collect();
    tags.sort_by(|a, b| by_name_desc(&a.name, &b.name));

    let ingredients = row
      .ingredients
      .iter()
      .filter_map(|(ingredient_id, amount)| {
        self
          .ingredients
          .iter()
          .find(|ingredient| ingredient.id == *ingredient_id)
          .map(|ingredient| RecipeIngredient {
            id: ingredient.id,
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
            amount: *amount,
          })
      })
      .collect();

    Recipe {
      id: row.id,
      author_id: row.author_id,
      name: row.name.clone(),
      text: row.text.clone(),
      image: row.image.clone(),
      cooking_time: row.cooking_time,
      pub_date: row.pub_date,
      tags,
      ingredients,
    }
  }

  fn matches(&self, row: &RecipeRow, filter: &RecipeFilter) -> bool {
    if let Some(author) = filter.author {
      if row.author_id != author {
        return false;
      }
    }
    if let Some(user) = filter.favorited_by {
      if !self.marks.contains(&(RecipeMark::Favorite, user, row.id)) {
        return false;
      }
    }
    if let Some(user) = filter.in_cart_of {
      if !self.marks.contains(&(RecipeMark::ShoppingCart, user, row.id)) {
        return false;
      }
    }
    if !filter.tags.is_empty() {
      let wanted = self
        .tags
        .iter()
        .filter(|tag| filter.tags.contains(&tag.slug))
        .any(|tag| row.tag_ids.contains(&tag.id));
      if !wanted {
        return false;
      }
    }
    true
  }

  fn remove_recipes_where<F: Fn(&RecipeRow) -> bool>(&mut self, doomed: F) -> usize {
    let ids: HashSet<Uuid> = self.recipes.iter().filter(|row| doomed(row)).map(|row| row.id).collect();
    self.recipes.retain(|row| !ids.contains(&row.id));
    self.marks.retain(|(_, _, recipe_id)| !ids.contains(recipe_id));
    ids.len()
  }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of (user, recipe) pairs currently in `mark`.
  pub fn mark_count(&self, mark: RecipeMark) -> usize {
    self.tables.read().marks.iter().filter(|(kind, _, _)| *kind == mark).count()
  }

  pub fn follow_count(&self) -> usize {
    self.tables.read().follows.len()
  }
}

#[async_trait]
impl Store for MemoryStore {
  #[instrument(name = "memory::insert_user", skip(self, user), fields(username = %user.username), err(level = "warn", Display))]
  async fn insert_user(&self, user: &NewUser) -> FoodgramResult<User> {
    let mut tables = self.tables.write();
    let email = user.email.trim().to_lowercase();
    if tables.users.iter().any(|existing| existing.email.to_lowercase() == email) {
      return Err(FoodgramError::Conflict(format!("A user with email {} already exists.", email)));
    }
    if tables.users.iter().any(|existing| existing.username == user.username) {
      return Err(FoodgramError::Conflict(format!(
        "A user with username {} already exists.",
        user.username
      )));
    }

    let created = User {
      id: Uuid::new_v4(),
      email,
      username: user.username.clone(),
      first_name: user.first_name.clone(),
      last_name: user.last_name.clone(),
      role: user.role,
      joined_at: Utc::now(),
    };
    tables.users.push(created.clone());
    debug!(user_id = %created.id, "User stored.");
    Ok(created)
  }

  async fn user(&self, id: Uuid) -> FoodgramResult<Option<User>> {
    Ok(self.tables.read().users.iter().find(|user| user.id == id).cloned())
  }

  async fn users(&self, page: PageRequest) -> FoodgramResult<(Vec<User>, u64)> {
    Ok(page.slice(self.tables.read().users.clone()))
  }

  #[instrument(name = "memory::delete_user", skip(self), err(level = "warn", Display))]
  async fn delete_user(&self, id: Uuid) -> FoodgramResult<bool> {
    let mut tables = self.tables.write();
    let before = tables.users.len();
    tables.users.retain(|user| user.id != id);
    if tables.users.len() == before {
      return Ok(false);
    }

    let removed = tables.remove_recipes_where(|row| row.author_id == id);
    tables.marks.retain(|(_, user_id, _)| *user_id != id);
    tables.follows.retain(|(follower, author)| *follower != id && *author != id);
    debug!(removed_recipes = removed, "User and dependent rows removed.");
    Ok(true)
  }

  async fn insert_tag(&self, tag: &NewTag) -> FoodgramResult<Tag> {
    let mut tables = self.tables.write();
    if tables.tags.iter().any(|existing| existing.slug == tag.slug) {
      return Err(FoodgramError::Conflict(format!("A tag with slug {} already exists.", tag.slug)));
    }
    let created = Tag {
      id: Uuid::new_v4(),
      name: tag.name.clone(),
      color: tag.color.clone(),
      slug: tag.slug.clone(),
    };
    tables.tags.push(created.clone());
    Ok(created)
  }

  async fn tags(&self) -> FoodgramResult<Vec<Tag>> {
    let mut tags = self.tables.read().tags.clone();
    tags.sort_by(|a, b| by_name_desc(&a.name, &b.name));
    Ok(tags)
  }

  async fn tag(&self, id: Uuid) -> FoodgramResult<Option<Tag>> {
    Ok(self.tables.read().tags.iter().find(|tag| tag.id == id).cloned())
  }

  async fn insert_ingredient(&self, ingredient: &NewIngredient) -> FoodgramResult<Ingredient> {
    let created = Ingredient {
      id: Uuid::new_v4(),
      name: ingredient.name.clone(),
      measurement_unit: ingredient.measurement_unit.clone(),
    };
    self.tables.write().ingredients.push(created.clone());
    Ok(created)
  }

  async fn ingredients(&self, name_prefix: Option<&str>) -> FoodgramResult<Vec<Ingredient>> {
    let prefix = name_prefix.map(str::to_lowercase);
    let mut found: Vec<Ingredient> = self
      .tables
      .read()
      .ingredients
      .iter()
      .filter(|ingredient| match &prefix {
        Some(prefix) => ingredient.name.to_lowercase().starts_with(prefix.as_str()),
        None => true,
      })
      .cloned()
      .collect();
    found.sort_by(|a, b| by_name_desc(&a.name, &b.name));
    Ok(found)
  }

  async fn ingredient(&self, id: Uuid) -> FoodgramResult<Option<Ingredient>> {
    Ok(self.tables.read().ingredients.iter().find(|ingredient| ingredient.id == id).cloned())
  }

  async fn missing_ingredients(&self, ids: &[Uuid]) -> FoodgramResult<Vec<Uuid>> {
    let tables = self.tables.read();
    Ok(
      ids
        .iter()
        .filter(|id| !tables.ingredients.iter().any(|ingredient| ingredient.id == **id))
        .copied()
        .collect(),
    )
  }

  async fn missing_tags(&self, ids: &[Uuid]) -> FoodgramResult<Vec<Uuid>> {
    let tables = self.tables.read();
    Ok(ids.iter().filter(|id| !tables.tags.iter().any(|tag| tag.id == **id)).copied().collect())
  }

  #[instrument(name = "memory::insert_recipe", skip(self, recipe), err(level = "warn", Display))]
  async fn insert_recipe(&self, author_id: Uuid, recipe: &CheckedRecipe) -> FoodgramResult<Recipe> {
    let mut tables = self.tables.write();
    if !tables.users.iter().any(|user| user.id == author_id) {
      return Err(FoodgramError::NotFound(format!("User {} not found.", author_id)));
    }
    let seq = tables.seq();
    let row = RecipeRow {
      id: Uuid::new_v4(),
      seq,
      author_id,
      name: recipe.name.clone(),
      text: recipe.text.clone(),
      image: recipe.image.clone(),
      cooking_time: recipe.cooking_time,
      pub_date: Utc::now(),
      tag_ids: recipe.tags.clone(),
      ingredients: recipe.ingredients.clone(),
    };
    let hydrated = tables.hydrate(&row);
    tables.recipes.push(row);
    Ok(hydrated)
  }

  #[instrument(name = "memory::replace_recipe", skip(self, recipe), err(level = "warn", Display))]
  async fn replace_recipe(&self, id: Uuid, recipe: &CheckedRecipe) -> FoodgramResult<Recipe> {
    let mut tables = self.tables.write();
    let row = tables
      .recipes
      .iter_mut()
      .find(|row| row.id == id)
      .ok_or_else(|| FoodgramError::NotFound(format!("Recipe {} not found.", id)))?;

    row.name = recipe.name.clone();
    row.text = recipe.text.clone();
    row.image = recipe.image.clone();
    row.cooking_time = recipe.cooking_time;
    row.tag_ids = recipe.tags.clone();
    row.ingredients = recipe.ingredients.clone();

    let row = row.clone();
    Ok(tables.hydrate(&row))
  }

  #[instrument(name = "memory::delete_recipe", skip(self), err(level = "warn", Display))]
  async fn delete_recipe(&self, id: Uuid) -> FoodgramResult<bool> {
    Ok(self.tables.write().remove_recipes_where(|row| row.id == id) > 0)
  }

  async fn recipe(&self, id: Uuid) -> FoodgramResult<Option<Recipe>> {
    let tables = self.tables.read();
    Ok(tables.recipe_row(id).map(|row| tables.hydrate(row)))
  }

  async fn recipes(&self, filter: &RecipeFilter, page: PageRequest) -> FoodgramResult<(Vec<Recipe>, u64)> {
    let tables = self.tables.read();
    let mut rows: Vec<&RecipeRow> = tables.recipes.iter().filter(|row| tables.matches(row, filter)).collect();
    rows.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.seq.cmp(&a.seq)));
    let (rows, total) = page.slice(rows);
    Ok((rows.into_iter().map(|row| tables.hydrate(row)).collect(), total))
  }

  async fn insert_mark(&self, mark: RecipeMark, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<()> {
    let mut tables = self.tables.write();
    if tables.recipe_row(recipe_id).is_none() {
      return Err(FoodgramError::NotFound(format!("Recipe {} not found.", recipe_id)));
    }
    if !tables.marks.insert((mark, user_id, recipe_id)) {
      return Err(FoodgramError::Conflict(format!("Recipe {} is already in {}.", recipe_id, mark)));
    }
    Ok(())
  }

  async fn delete_mark(&self, mark: RecipeMark, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<bool> {
    Ok(self.tables.write().marks.remove(&(mark, user_id, recipe_id)))
  }

  async fn has_mark(&self, mark: RecipeMark, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<bool> {
    Ok(self.tables.read().marks.contains(&(mark, user_id, recipe_id)))
  }

  async fn cart_lines(&self, user_id: Uuid) -> FoodgramResult<Vec<CartLine>> {
    let tables = self.tables.read();
    let mut lines = Vec::new();
    for (_, _, recipe_id) in tables
      .marks
      .iter()
      .filter(|(mark, user, _)| *mark == RecipeMark::ShoppingCart && *user == user_id)
    {
      let Some(row) = tables.recipe_row(*recipe_id) else {
        continue;
      };
      for (ingredient_id, amount) in &row.ingredients {
        if let Some(ingredient) = tables.ingredients.iter().find(|i| i.id == *ingredient_id) {
          lines.push(CartLine {
            recipe_id: row.id,
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
            amount: *amount,
          });
        }
      }
    }
    Ok(lines)
  }

  async fn insert_follow(&self, user_id: Uuid, author_id: Uuid) -> FoodgramResult<()> {
    let mut tables = self.tables.write();
    if !tables.follows.insert((user_id, author_id)) {
      return Err(FoodgramError::Conflict(format!("Already subscribed to author {}.", author_id)));
    }
    Ok(())
  }

  async fn delete_follow(&self, user_id: Uuid, author_id: Uuid) -> FoodgramResult<bool> {
    Ok(self.tables.write().follows.remove(&(user_id, author_id)))
  }

  async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> FoodgramResult<bool> {
    Ok(self.tables.read().follows.contains(&(user_id, author_id)))
  }

  async fn followed_authors(&self, user_id: Uuid, page: PageRequest) -> FoodgramResult<(Vec<User>, u64)> {
    let tables = self.tables.read();
    let authors: Vec<User> = tables
      .users
      .iter()
      .filter(|user| tables.follows.contains(&(user_id, user.id)))
      .cloned()
      .collect();
    Ok(page.slice(authors))
  }
}
