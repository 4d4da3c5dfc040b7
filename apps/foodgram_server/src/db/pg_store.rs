// apps/foodgram_server/src/db/pg_store.rs

//! PostgreSQL `Store`. Uniqueness comes from the schema's constraints, so a
//! duplicate favorite, cart entry or follow is rejected by the database even
//! when two requests race past the service's checks.

use crate::models::{CartLineRow, IngredientRow, RecipeIngredientRow, RecipeRow, RecipeTagRow, TagRow, UserRow};
use async_trait::async_trait;
use foodgram::{
  CartLine, CheckedRecipe, FoodgramError, FoodgramResult, Ingredient, NewIngredient, NewTag, NewUser, PageRequest,
  Recipe, RecipeFilter, RecipeMark, Store, Tag, User,
};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};
use uuid::Uuid;

const RECIPE_COLUMNS: &str = "r.id, r.author_id, r.name, r.text, r.image, r.cooking_time, r.pub_date";
const USER_COLUMNS: &str = "u.id, u.email, u.username, u.first_name, u.last_name, u.role, u.joined_at";

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Attaches tags (name descending) and ingredients (submission order) to
  /// bare recipe rows with two batched queries.
  async fn hydrate(&self, rows: Vec<RecipeRow>) -> FoodgramResult<Vec<Recipe>> {
    if rows.is_empty() {
      return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let tag_rows = sqlx::query_as::<_, RecipeTagRow>(
      r#"
      SELECT rt.recipe_id, t.id, t.name, t.color, t.slug
      FROM recipe_tags rt
      JOIN tags t ON t.id = rt.tag_id
      WHERE rt.recipe_id = ANY($1)
      ORDER BY t.name COLLATE "C" DESC
      "#,
    )
    .bind(&ids)
    .fetch_all(&self.pool)
    .await
    .map_err(storage)?;

    let ingredient_rows = sqlx::query_as::<_, RecipeIngredientRow>(
      r#"
      SELECT ri.recipe_id, ri.ingredient_id, i.name, i.measurement_unit, ri.amount
      FROM recipe_ingredients ri
      JOIN ingredients i ON i.id = ri.ingredient_id
      WHERE ri.recipe_id = ANY($1)
      ORDER BY ri.position
      "#,
    )
    .bind(&ids)
    .fetch_all(&self.pool)
    .await
    .map_err(storage)?;

    let mut tags: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in tag_rows {
      tags.entry(row.recipe_id).or_default().push(row.into());
    }
    let mut ingredients: HashMap<Uuid, Vec<foodgram::RecipeIngredient>> = HashMap::new();
    for row in ingredient_rows {
      ingredients.entry(row.recipe_id).or_default().push(row.into());
    }

    Ok(
      rows
        .into_iter()
        .map(|row| Recipe {
          tags: tags.remove(&row.id).unwrap_or_default(),
          ingredients: ingredients.remove(&row.id).unwrap_or_default(),
          id: row.id,
          author_id: row.author_id,
          name: row.name,
          text: row.text,
          image: row.image,
          cooking_time: row.cooking_time,
          pub_date: row.pub_date,
        })
        .collect(),
    )
  }

  async fn existing_ids(&self, table: &str, ids: &[Uuid]) -> FoodgramResult<Vec<Uuid>> {
    if ids.is_empty() {
      return Ok(Vec::new());
    }
    let sql = format!("SELECT id FROM {} WHERE id = ANY($1)", table);
    let found: Vec<Uuid> = sqlx::query_scalar(&sql)
      .bind(ids)
      .fetch_all(&self.pool)
      .await
      .map_err(storage)?;
    let found: HashSet<Uuid> = found.into_iter().collect();
    Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
  }
}

fn storage(err: sqlx::Error) -> FoodgramError {
  FoodgramError::Storage { source: err.into() }
}

/// Maps constraint violations onto domain errors: unique to Conflict and a
/// dangling foreign key to NotFound.
fn write_error(err: sqlx::Error, conflict: impl FnOnce() -> String, missing: impl FnOnce() -> String) -> FoodgramError {
  if let Some(db_err) = err.as_database_error() {
    if db_err.is_unique_violation() {
      return FoodgramError::Conflict(conflict());
    }
    if db_err.is_foreign_key_violation() {
      return FoodgramError::NotFound(missing());
    }
  }
  storage(err)
}

fn escape_like(prefix: &str) -> String {
  prefix.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn push_recipe_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &RecipeFilter) {
  qb.push(" WHERE TRUE");
  if let Some(author) = filter.author {
    qb.push(" AND r.author_id = ").push_bind(author);
  }
  if !filter.tags.is_empty() {
    qb.push(
      " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
       WHERE rt.recipe_id = r.id AND t.slug = ANY(",
    )
    .push_bind(filter.tags.clone())
    .push("))");
  }
  if let Some(user_id) = filter.favorited_by {
    qb.push(" AND EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ")
      .push_bind(user_id)
      .push(")");
  }
  if let Some(user_id) = filter.in_cart_of {
    qb.push(" AND EXISTS (SELECT 1 FROM shopping_cart sc WHERE sc.recipe_id = r.id AND sc.user_id = ")
      .push_bind(user_id)
      .push(")");
  }
}

async fn insert_links(conn: &mut PgConnection, recipe_id: Uuid, recipe: &CheckedRecipe) -> FoodgramResult<()> {
  if !recipe.tags.is_empty() {
    sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) SELECT $1, UNNEST($2::uuid[])")
      .bind(recipe_id)
      .bind(&recipe.tags)
      .execute(&mut *conn)
      .await
      .map_err(|e| write_error(e, || "Tag listed more than once.".to_string(), || "Tag not found.".to_string()))?;
  }

  if !recipe.ingredients.is_empty() {
    let (ids, amounts): (Vec<Uuid>, Vec<i32>) = recipe.ingredients.iter().copied().unzip();
    sqlx::query(
      r#"
      INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount, position)
      SELECT $1, i.ingredient_id, i.amount, i.position
      FROM UNNEST($2::uuid[], $3::int4[]) WITH ORDINALITY AS i(ingredient_id, amount, position)
      "#,
    )
    .bind(recipe_id)
    .bind(&ids)
    .bind(&amounts)
    .execute(&mut *conn)
    .await
    .map_err(|e| {
      write_error(
        e,
        || "Ingredient listed more than once.".to_string(),
        || "Ingredient not found.".to_string(),
      )
    })?;
  }
  Ok(())
}

#[async_trait]
impl Store for PgStore {
  #[instrument(name = "pg::insert_user", skip(self, user), fields(username = %user.username), err(level = "warn", Display))]
  async fn insert_user(&self, user: &NewUser) -> FoodgramResult<User> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
      INSERT INTO users (id, email, username, first_name, last_name, role)
      VALUES ($1, $2, $3, $4, $5, $6)
      RETURNING id, email, username, first_name, last_name, role, joined_at
      "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.email.trim().to_lowercase())
    .bind(&user.username)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.role.as_str())
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      write_error(
        e,
        || "A user with this email or username already exists.".to_string(),
        String::new,
      )
    })?;
    debug!(user_id = %row.id, "User stored.");
    Ok(row.into())
  }

  async fn user(&self, id: Uuid) -> FoodgramResult<Option<User>> {
    let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users u WHERE u.id = $1", USER_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(storage)?;
    Ok(row.map(Into::into))
  }

  async fn users(&self, page: PageRequest) -> FoodgramResult<(Vec<User>, u64)> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
      "SELECT {} FROM users u ORDER BY u.joined_at, u.id LIMIT $1 OFFSET $2",
      USER_COLUMNS
    ))
    .bind(page.limit() as i64)
    .bind(page.offset() as i64)
    .fetch_all(&self.pool)
    .await
    .map_err(storage)?;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
      .fetch_one(&self.pool)
      .await
      .map_err(storage)?;
    Ok((rows.into_iter().map(Into::into).collect(), count as u64))
  }

  #[instrument(name = "pg::delete_user", skip(self), err(level = "warn", Display))]
  async fn delete_user(&self, id: Uuid) -> FoodgramResult<bool> {
    // Recipes, marks and follows go with the user via ON DELETE CASCADE.
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(storage)?;
    Ok(result.rows_affected() > 0)
  }

  async fn insert_tag(&self, tag: &NewTag) -> FoodgramResult<Tag> {
    let row = sqlx::query_as::<_, TagRow>(
      "INSERT INTO tags (id, name, color, slug) VALUES ($1, $2, $3, $4) RETURNING id, name, color, slug",
    )
    .bind(Uuid::new_v4())
    .bind(&tag.name)
    .bind(&tag.color)
    .bind(&tag.slug)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      write_error(
        e,
        || format!("A tag with slug {} already exists.", tag.slug),
        String::new,
      )
    })?;
    Ok(row.into())
  }

  async fn tags(&self) -> FoodgramResult<Vec<Tag>> {
    let rows = sqlx::query_as::<_, TagRow>(r#"SELECT id, name, color, slug FROM tags ORDER BY name COLLATE "C" DESC"#)
      .fetch_all(&self.pool)
      .await
      .map_err(storage)?;
    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn tag(&self, id: Uuid) -> FoodgramResult<Option<Tag>> {
    let row = sqlx::query_as::<_, TagRow>("SELECT id, name, color, slug FROM tags WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(storage)?;
    Ok(row.map(Into::into))
  }

  async fn insert_ingredient(&self, ingredient: &NewIngredient) -> FoodgramResult<Ingredient> {
    let row = sqlx::query_as::<_, IngredientRow>(
      "INSERT INTO ingredients (id, name, measurement_unit) VALUES ($1, $2, $3) RETURNING id, name, measurement_unit",
    )
    .bind(Uuid::new_v4())
    .bind(&ingredient.name)
    .bind(&ingredient.measurement_unit)
    .fetch_one(&self.pool)
    .await
    .map_err(storage)?;
    Ok(row.into())
  }

  async fn ingredients(&self, name_prefix: Option<&str>) -> FoodgramResult<Vec<Ingredient>> {
    let rows = match name_prefix {
      Some(prefix) => {
        sqlx::query_as::<_, IngredientRow>(
          r#"
          SELECT id, name, measurement_unit FROM ingredients
          WHERE lower(name) LIKE lower($1) || '%'
          ORDER BY name COLLATE "C" DESC
          "#,
        )
        .bind(escape_like(prefix))
        .fetch_all(&self.pool)
        .await
      }
      None => {
        sqlx::query_as::<_, IngredientRow>(
          r#"SELECT id, name, measurement_unit FROM ingredients ORDER BY name COLLATE "C" DESC"#,
        )
        .fetch_all(&self.pool)
        .await
      }
    }
    .map_err(storage)?;
    Ok(rows.into_iter().map(Into::into).collect())
  }

  async fn ingredient(&self, id: Uuid) -> FoodgramResult<Option<Ingredient>> {
    let row = sqlx::query_as::<_, IngredientRow>("SELECT id, name, measurement_unit FROM ingredients WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(storage)?;
    Ok(row.map(Into::into))
  }

  async fn missing_ingredients(&self, ids: &[Uuid]) -> FoodgramResult<Vec<Uuid>> {
    self.existing_ids("ingredients", ids).await
  }

  async fn missing_tags(&self, ids: &[Uuid]) -> FoodgramResult<Vec<Uuid>> {
    self.existing_ids("tags", ids).await
  }

  #[instrument(name = "pg::insert_recipe", skip(self, recipe), err(level = "warn", Display))]
  async fn insert_recipe(&self, author_id: Uuid, recipe: &CheckedRecipe) -> FoodgramResult<Recipe> {
    let recipe_id = Uuid::new_v4();
    let mut tx = self.pool.begin().await.map_err(storage)?;

    sqlx::query(
      r#"
      INSERT INTO recipes (id, author_id, name, text, image, cooking_time)
      VALUES ($1, $2, $3, $4, $5, $6)
      "#,
    )
    .bind(recipe_id)
    .bind(author_id)
    .bind(&recipe.name)
    .bind(&recipe.text)
    .bind(&recipe.image)
    .bind(recipe.cooking_time)
    .execute(&mut *tx)
    .await
    .map_err(|e| write_error(e, String::new, || format!("User {} not found.", author_id)))?;

    insert_links(&mut tx, recipe_id, recipe).await?;
    tx.commit().await.map_err(storage)?;
    debug!(%recipe_id, "Recipe stored.");

    self
      .recipe(recipe_id)
      .await?
      .ok_or_else(|| FoodgramError::NotFound(format!("Recipe {} not found.", recipe_id)))
  }

  #[instrument(name = "pg::replace_recipe", skip(self, recipe), err(level = "warn", Display))]
  async fn replace_recipe(&self, id: Uuid, recipe: &CheckedRecipe) -> FoodgramResult<Recipe> {
    let mut tx = self.pool.begin().await.map_err(storage)?;

    let updated = sqlx::query("UPDATE recipes SET name = $2, text = $3, image = $4, cooking_time = $5 WHERE id = $1")
      .bind(id)
      .bind(&recipe.name)
      .bind(&recipe.text)
      .bind(&recipe.image)
      .bind(recipe.cooking_time)
      .execute(&mut *tx)
      .await
      .map_err(storage)?;
    if updated.rows_affected() == 0 {
      return Err(FoodgramError::NotFound(format!("Recipe {} not found.", id)));
    }

    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
      .bind(id)
      .execute(&mut *tx)
      .await
      .map_err(storage)?;
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
      .bind(id)
      .execute(&mut *tx)
      .await
      .map_err(storage)?;
    insert_links(&mut tx, id, recipe).await?;
    tx.commit().await.map_err(storage)?;

    self
      .recipe(id)
      .await?
      .ok_or_else(|| FoodgramError::NotFound(format!("Recipe {} not found.", id)))
  }

  #[instrument(name = "pg::delete_recipe", skip(self), err(level = "warn", Display))]
  async fn delete_recipe(&self, id: Uuid) -> FoodgramResult<bool> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await
      .map_err(storage)?;
    Ok(result.rows_affected() > 0)
  }

  async fn recipe(&self, id: Uuid) -> FoodgramResult<Option<Recipe>> {
    let row = sqlx::query_as::<_, RecipeRow>(&format!("SELECT {} FROM recipes r WHERE r.id = $1", RECIPE_COLUMNS))
      .bind(id)
      .fetch_optional(&self.pool)
      .await
      .map_err(storage)?;
    match row {
      Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
      None => Ok(None),
    }
  }

  async fn recipes(&self, filter: &RecipeFilter, page: PageRequest) -> FoodgramResult<(Vec<Recipe>, u64)> {
    let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM recipes r", RECIPE_COLUMNS));
    push_recipe_filter(&mut select, filter);
    select
      .push(" ORDER BY r.pub_date DESC, r.id DESC LIMIT ")
      .push_bind(page.limit() as i64)
      .push(" OFFSET ")
      .push_bind(page.offset() as i64);
    let rows = select
      .build_query_as::<RecipeRow>()
      .fetch_all(&self.pool)
      .await
      .map_err(storage)?;

    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM recipes r");
    push_recipe_filter(&mut count, filter);
    let total: i64 = count
      .build_query_scalar::<i64>()
      .fetch_one(&self.pool)
      .await
      .map_err(storage)?;

    Ok((self.hydrate(rows).await?, total as u64))
  }

  #[instrument(name = "pg::insert_mark", skip(self), err(level = "warn", Display))]
  async fn insert_mark(&self, mark: RecipeMark, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<()> {
    let sql = format!("INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2)", mark.table());
    sqlx::query(&sql)
      .bind(user_id)
      .bind(recipe_id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        write_error(
          e,
          || format!("Recipe is already in {}.", mark),
          || format!("Recipe {} not found.", recipe_id),
        )
      })?;
    Ok(())
  }

  #[instrument(name = "pg::delete_mark", skip(self), err(level = "warn", Display))]
  async fn delete_mark(&self, mark: RecipeMark, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<bool> {
    let sql = format!("DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2", mark.table());
    let result = sqlx::query(&sql)
      .bind(user_id)
      .bind(recipe_id)
      .execute(&self.pool)
      .await
      .map_err(storage)?;
    Ok(result.rows_affected() > 0)
  }

  async fn has_mark(&self, mark: RecipeMark, user_id: Uuid, recipe_id: Uuid) -> FoodgramResult<bool> {
    let sql = format!(
      "SELECT EXISTS (SELECT 1 FROM {} WHERE user_id = $1 AND recipe_id = $2)",
      mark.table()
    );
    sqlx::query_scalar(&sql)
      .bind(user_id)
      .bind(recipe_id)
      .fetch_one(&self.pool)
      .await
      .map_err(storage)
  }

  async fn cart_lines(&self, user_id: Uuid) -> FoodgramResult<Vec<CartLine>> {
    let rows = sqlx::query_as::<_, CartLineRow>(
      r#"
      SELECT ri.recipe_id, i.name, i.measurement_unit, ri.amount
      FROM shopping_cart sc
      JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
      JOIN ingredients i ON i.id = ri.ingredient_id
      WHERE sc.user_id = $1
      "#,
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await
    .map_err(storage)?;
    Ok(rows.into_iter().map(Into::into).collect())
  }

  #[instrument(name = "pg::insert_follow", skip(self), err(level = "warn", Display))]
  async fn insert_follow(&self, user_id: Uuid, author_id: Uuid) -> FoodgramResult<()> {
    sqlx::query("INSERT INTO follows (user_id, author_id) VALUES ($1, $2)")
      .bind(user_id)
      .bind(author_id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        write_error(
          e,
          || "Already subscribed to this author.".to_string(),
          || format!("User {} not found.", author_id),
        )
      })?;
    Ok(())
  }

  #[instrument(name = "pg::delete_follow", skip(self), err(level = "warn", Display))]
  async fn delete_follow(&self, user_id: Uuid, author_id: Uuid) -> FoodgramResult<bool> {
    let result = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
      .bind(user_id)
      .bind(author_id)
      .execute(&self.pool)
      .await
      .map_err(storage)?;
    Ok(result.rows_affected() > 0)
  }

  async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> FoodgramResult<bool> {
    sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)")
      .bind(user_id)
      .bind(author_id)
      .fetch_one(&self.pool)
      .await
      .map_err(storage)
  }

  async fn followed_authors(&self, user_id: Uuid, page: PageRequest) -> FoodgramResult<(Vec<User>, u64)> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
      r#"
      SELECT {} FROM follows f
      JOIN users u ON u.id = f.author_id
      WHERE f.user_id = $1
      ORDER BY u.joined_at, u.id
      LIMIT $2 OFFSET $3
      "#,
      USER_COLUMNS
    ))
    .bind(user_id)
    .bind(page.limit() as i64)
    .bind(page.offset() as i64)
    .fetch_all(&self.pool)
    .await
    .map_err(storage)?;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE user_id = $1")
      .bind(user_id)
      .fetch_one(&self.pool)
      .await
      .map_err(storage)?;
    Ok((rows.into_iter().map(Into::into).collect(), count as u64))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn like_metacharacters_are_escaped() {
    assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
    assert_eq!(escape_like("мука"), "мука");
  }

  #[test]
  fn recipe_filter_binds_every_condition() {
    let filter = RecipeFilter {
      tags: vec!["breakfast".to_string()],
      author: Some(Uuid::new_v4()),
      favorited_by: Some(Uuid::new_v4()),
      in_cart_of: Some(Uuid::new_v4()),
    };
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM recipes r");
    push_recipe_filter(&mut qb, &filter);
    let sql = qb.sql();
    assert!(sql.contains("r.author_id = $1"));
    assert!(sql.contains("t.slug = ANY($2)"));
    assert!(sql.contains("f.user_id = $3"));
    assert!(sql.contains("sc.user_id = $4"));
  }

  #[test]
  fn empty_filter_adds_no_conditions() {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM recipes r");
    push_recipe_filter(&mut qb, &RecipeFilter::default());
    assert_eq!(qb.sql(), "SELECT COUNT(*) FROM recipes r WHERE TRUE");
  }
}
