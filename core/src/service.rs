// core/src/service.rs

//! `Foodgram`: every domain operation, on top of any [`Store`].
//!
//! The service validates input, checks ownership and existence, and builds
//! viewer-relative representations. Uniqueness is left to the store so that a
//! racing duplicate insert is reported the same way as a sequential one.

use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::{FoodgramError, FoodgramResult, ValidationErrors};
use crate::model::{
  Ingredient, NewIngredient, NewTag, NewUser, Recipe, RecipeDraft, RecipeFilter, RecipeMark, RecipeShort,
  RecipeView, Subscription, Tag, User, UserCard,
};
use crate::pagination::{Page, PageRequest};
use crate::shopping_list::{self, ShoppingListItem};
use crate::store::Store;
use crate::validation::{self, CheckedRecipe};

/// Listing options as the caller states them. The favorite and cart flags
/// only narrow the listing for an identified viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
  pub tags: Vec<String>,
  pub author: Option<Uuid>,
  pub is_favorited: bool,
  pub is_in_shopping_cart: bool,
}

#[derive(Clone)]
pub struct Foodgram {
  store: Arc<dyn Store>,
}

impl Foodgram {
  pub fn new(store: Arc<dyn Store>) -> Self {
    Self { store }
  }

  // --- users ---

  #[instrument(name = "foodgram::register_user", skip(self, new_user), fields(username = %new_user.username, role = %new_user.role), err(level = "warn", Display))]
  pub async fn register_user(&self, new_user: NewUser) -> FoodgramResult<UserCard> {
    validation::validate_new_user(&new_user)?;
    let normalized = NewUser {
      email: new_user.email.trim().to_lowercase(),
      ..new_user
    };
    let user = self.store.insert_user(&normalized).await?;
    info!(user_id = %user.id, "User registered.");
    Ok(UserCard::new(user, false))
  }

  pub async fn user_card(&self, viewer: Option<Uuid>, id: Uuid) -> FoodgramResult<UserCard> {
    let user = self.existing_user(id).await?;
    self.card(viewer, user).await
  }

  pub async fn users(&self, viewer: Option<Uuid>, page: PageRequest) -> FoodgramResult<Page<UserCard>> {
    let (users, count) = self.store.users(page).await?;
    page.ensure_within(count)?;
    let mut cards = Vec::with_capacity(users.len());
    for user in users {
      cards.push(self.card(viewer, user).await?);
    }
    Ok(Page::new(page, cards, count))
  }

  #[instrument(name = "foodgram::delete_user", skip(self), err(level = "warn", Display))]
  pub async fn delete_user(&self, id: Uuid) -> FoodgramResult<()> {
    if !self.store.delete_user(id).await? {
      return Err(FoodgramError::NotFound(format!("User {} not found.", id)));
    }
    info!(user_id = %id, "User deleted with dependent rows.");
    Ok(())
  }

  // --- reference data ---

  pub async fn create_tag(&self, tag: NewTag) -> FoodgramResult<Tag> {
    validation::validate_new_tag(&tag)?;
    self.store.insert_tag(&tag).await
  }

  pub async fn tags(&self) -> FoodgramResult<Vec<Tag>> {
    self.store.tags().await
  }

  pub async fn tag(&self, id: Uuid) -> FoodgramResult<Tag> {
    self
      .store
      .tag(id)
      .await?
      .ok_or_else(|| FoodgramError::NotFound(format!("Tag {} not found.", id)))
  }

  pub async fn create_ingredient(&self, ingredient: NewIngredient) -> FoodgramResult<Ingredient> {
    validation::validate_new_ingredient(&ingredient)?;
    self.store.insert_ingredient(&ingredient).await
  }

  pub async fn ingredients(&self, name_prefix: Option<&str>) -> FoodgramResult<Vec<Ingredient>> {
    let prefix = name_prefix.map(str::trim).filter(|prefix| !prefix.is_empty());
    self.store.ingredients(prefix).await
  }

  pub async fn ingredient(&self, id: Uuid) -> FoodgramResult<Ingredient> {
    self
      .store
      .ingredient(id)
      .await?
      .ok_or_else(|| FoodgramError::NotFound(format!("Ingredient {} not found.", id)))
  }

  // --- recipes ---

  #[instrument(name = "foodgram::create_recipe", skip(self, draft), err(level = "warn", Display))]
  pub async fn create_recipe(&self, author_id: Uuid, draft: RecipeDraft) -> FoodgramResult<RecipeView> {
    self.existing_user(author_id).await?;
    let checked = self.check_recipe(draft).await?;
    let recipe = self.store.insert_recipe(author_id, &checked).await?;
    info!(recipe_id = %recipe.id, ingredients = recipe.ingredients.len(), "Recipe created.");
    self.view(Some(author_id), recipe).await
  }

  /// Full replacement: scalar fields, tags and the whole ingredient set.
  #[instrument(name = "foodgram::update_recipe", skip(self, draft), err(level = "warn", Display))]
  pub async fn update_recipe(&self, editor_id: Uuid, recipe_id: Uuid, draft: RecipeDraft) -> FoodgramResult<RecipeView> {
    let current = self.existing_recipe(recipe_id).await?;
    let editor = self.existing_user(editor_id).await?;
    ensure_author(&current, &editor)?;
    let checked = self.check_recipe(draft).await?;
    let recipe = self.store.replace_recipe(recipe_id, &checked).await?;
    info!(recipe_id = %recipe.id, ingredients = recipe.ingredients.len(), "Recipe replaced.");
    self.view(Some(editor_id), recipe).await
  }

  #[instrument(name = "foodgram::delete_recipe", skip(self), err(level = "warn", Display))]
  pub async fn delete_recipe(&self, editor_id: Uuid, recipe_id: Uuid) -> FoodgramResult<()> {
    let current = self.existing_recipe(recipe_id).await?;
    let editor = self.existing_user(editor_id).await?;
    ensure_author(&current, &editor)?;
    if !self.store.delete_recipe(recipe_id).await? {
      return Err(FoodgramError::NotFound(format!("Recipe {} not found.", recipe_id)));
    }
    info!(recipe_id = %recipe_id, "Recipe deleted.");
    Ok(())
  }

  pub async fn recipe(&self, viewer: Option<Uuid>, recipe_id: Uuid) -> FoodgramResult<RecipeView> {
    let recipe = self.existing_recipe(recipe_id).await?;
    self.view(viewer, recipe).await
  }

  pub async fn recipes(
    &self,
    viewer: Option<Uuid>,
    query: &RecipeQuery,
    page: PageRequest,
  ) -> FoodgramResult<Page<RecipeView>> {
    let filter = RecipeFilter {
      tags: query.tags.clone(),
      author: query.author,
      favorited_by: viewer.filter(|_| query.is_favorited),
      in_cart_of: viewer.filter(|_| query.is_in_shopping_cart),
    };
    let (recipes, count) = self.store.recipes(&filter, page).await?;
    page.ensure_within(count)?;
    let mut views = Vec::with_capacity(recipes.len());
    for recipe in recipes {
      views.push(self.view(viewer, recipe).await?);
    }
    Ok(Page::new(page, views, count))
  }

  // --- favorites and shopping cart ---

  #[instrument(name = "foodgram::add_mark", skip(self), err(level = "warn", Display))]
  pub async fn add_mark(&self, mark: RecipeMark, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<RecipeShort> {
    self.existing_user(user_id).await?;
    let recipe = self.existing_recipe(recipe_id).await?;
    self.store.insert_mark(mark, user_id, recipe_id).await?;
    info!(%mark, "Recipe added.");
    Ok(recipe.short())
  }

  #[instrument(name = "foodgram::remove_mark", skip(self), err(level = "warn", Display))]
  pub async fn remove_mark(&self, mark: RecipeMark, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<()> {
    self.existing_recipe(recipe_id).await?;
    if !self.store.delete_mark(mark, user_id, recipe_id).await? {
      warn!(%mark, "Removal requested for a recipe that is not marked.");
      return Err(FoodgramError::NotFound(format!("Recipe {} is not in {}.", recipe_id, mark)));
    }
    info!(%mark, "Recipe removed.");
    Ok(())
  }

  pub async fn add_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<RecipeShort> {
    self.add_mark(RecipeMark::Favorite, user_id, recipe_id).await
  }

  pub async fn remove_favorite(&self, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<()> {
    self.remove_mark(RecipeMark::Favorite, user_id, recipe_id).await
  }

  pub async fn add_to_cart(&self, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<RecipeShort> {
    self.add_mark(RecipeMark::ShoppingCart, user_id, recipe_id).await
  }

  pub async fn remove_from_cart(&self, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<()> {
    self.remove_mark(RecipeMark::ShoppingCart, user_id, recipe_id).await
  }

  /// Totals for every ingredient across the user's cart.
  #[instrument(name = "foodgram::shopping_list", skip(self), err(level = "warn", Display))]
  pub async fn shopping_list(&self, user_id: Uuid) -> FoodgramResult<Vec<ShoppingListItem>> {
    let lines = self.store.cart_lines(user_id).await?;
    let items = shopping_list::aggregate(lines);
    info!(items = items.len(), "Shopping list aggregated.");
    Ok(items)
  }

  pub async fn shopping_list_text(&self, user_id: Uuid) -> FoodgramResult<String> {
    Ok(shopping_list::render(&self.shopping_list(user_id).await?))
  }

  // --- follows ---

  #[instrument(name = "foodgram::subscribe", skip(self), err(level = "warn", Display))]
  pub async fn subscribe(
    &self,
    user_id: Uuid,
    author_id: Uuid,
    recipes_limit: Option<u32>,
  ) -> FoodgramResult<Subscription> {
    if user_id == author_id {
      return Err(FoodgramError::validation("author", "Subscribing to yourself is not allowed."));
    }
    self.existing_user(user_id).await?;
    let author = self.existing_user(author_id).await?;
    self.store.insert_follow(user_id, author_id).await?;
    info!("Subscription created.");
    self.subscription(user_id, author, recipes_limit).await
  }

  #[instrument(name = "foodgram::unsubscribe", skip(self), err(level = "warn", Display))]
  pub async fn unsubscribe(&self, user_id: Uuid, author_id: Uuid) -> FoodgramResult<()> {
    self.existing_user(author_id).await?;
    if !self.store.delete_follow(user_id, author_id).await? {
      return Err(FoodgramError::NotFound(format!("Not subscribed to author {}.", author_id)));
    }
    info!("Subscription removed.");
    Ok(())
  }

  pub async fn subscriptions(
    &self,
    user_id: Uuid,
    page: PageRequest,
    recipes_limit: Option<u32>,
  ) -> FoodgramResult<Page<Subscription>> {
    let (authors, count) = self.store.followed_authors(user_id, page).await?;
    page.ensure_within(count)?;
    let mut results = Vec::with_capacity(authors.len());
    for author in authors {
      results.push(self.subscription(user_id, author, recipes_limit).await?);
    }
    Ok(Page::new(page, results, count))
  }

  // --- helpers ---

  async fn check_recipe(&self, draft: RecipeDraft) -> FoodgramResult<CheckedRecipe> {
    let mut errors = ValidationErrors::new();

    let ingredient_ids: Vec<Uuid> = draft.ingredients.iter().map(|item| item.id).collect();
    for id in self.store.missing_ingredients(&ingredient_ids).await? {
      errors.add("ingredients", format!("Ingredient {} does not exist.", id));
    }
    for id in self.store.missing_tags(&draft.tags).await? {
      errors.add("tags", format!("Tag {} does not exist.", id));
    }

    CheckedRecipe::validate(draft, errors)
  }

  async fn existing_user(&self, id: Uuid) -> FoodgramResult<User> {
    self
      .store
      .user(id)
      .await?
      .ok_or_else(|| FoodgramError::NotFound(format!("User {} not found.", id)))
  }

  async fn existing_recipe(&self, id: Uuid) -> FoodgramResult<Recipe> {
    self
      .store
      .recipe(id)
      .await?
      .ok_or_else(|| FoodgramError::NotFound(format!("Recipe {} not found.", id)))
  }

  async fn card(&self, viewer: Option<Uuid>, user: User) -> FoodgramResult<UserCard> {
    let is_subscribed = match viewer {
      Some(viewer) => self.store.is_following(viewer, user.id).await?,
      None => false,
    };
    Ok(UserCard::new(user, is_subscribed))
  }

  async fn view(&self, viewer: Option<Uuid>, recipe: Recipe) -> FoodgramResult<RecipeView> {
    let author = self.existing_user(recipe.author_id).await?;
    let author = self.card(viewer, author).await?;
    let (is_favorited, is_in_shopping_cart) = match viewer {
      Some(viewer) => (
        self.store.has_mark(RecipeMark::Favorite, viewer, recipe.id).await?,
        self.store.has_mark(RecipeMark::ShoppingCart, viewer, recipe.id).await?,
      ),
      None => (false, false),
    };

    Ok(RecipeView {
      id: recipe.id,
      tags: recipe.tags,
      author,
      ingredients: recipe.ingredients,
      is_favorited,
      is_in_shopping_cart,
      name: recipe.name,
      image: recipe.image,
      text: recipe.text,
      cooking_time: recipe.cooking_time,
      pub_date: recipe.pub_date,
    })
  }

  async fn subscription(
    &self,
    viewer: Uuid,
    author: User,
    recipes_limit: Option<u32>,
  ) -> FoodgramResult<Subscription> {
    let page = match recipes_limit {
      Some(limit) => PageRequest::first(limit),
      None => PageRequest::everything(),
    };
    let filter = RecipeFilter {
      author: Some(author.id),
      ..RecipeFilter::default()
    };
    let (recipes, recipes_count) = self.store.recipes(&filter, page).await?;
    let author = self.card(Some(viewer), author).await?;
    let recipes = match recipes_limit {
      Some(0) => Vec::new(),
      _ => recipes.iter().map(Recipe::short).collect(),
    };

    Ok(Subscription {
      author,
      recipes,
      recipes_count,
    })
  }
}

/// Authors may change their own recipes; admins may change any.
fn ensure_author(recipe: &Recipe, editor: &User) -> FoodgramResult<()> {
  if recipe.author_id != editor.id && !editor.is_admin() {
    return Err(FoodgramError::Forbidden(format!(
      "Only the author or an admin may change recipe {}.",
      recipe.id
    )));
  }
  Ok(())
}
