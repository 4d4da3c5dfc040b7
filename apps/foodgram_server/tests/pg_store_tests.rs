// apps/foodgram_server/tests/pg_store_tests.rs

//! PostgreSQL-backed checks of the store guarantees. They need a server, so
//! they are ignored by default: set DATABASE_URL and run with `--ignored`.
//! Each test gets a fresh database from `sqlx::test`.

use std::sync::Arc;

use foodgram::{Foodgram, IngredientAmount, NewIngredient, NewUser, RecipeDraft, Store, UserRole};
use foodgram_server::db::{apply_schema, PgStore};
use sqlx::PgPool;
use uuid::Uuid;

async fn foodgram(pool: &PgPool) -> Foodgram {
  apply_schema(pool).await.expect("schema applies");
  Foodgram::new(Arc::new(PgStore::new(pool.clone())) as Arc<dyn Store>)
}

async fn user(app: &Foodgram, username: &str) -> Uuid {
  app
    .register_user(NewUser {
      email: format!("{}@example.com", username),
      username: username.to_string(),
      first_name: "Test".to_string(),
      last_name: "User".to_string(),
      role: UserRole::User,
    })
    .await
    .expect("user registers")
    .id
}

async fn ingredient(app: &Foodgram, name: &str, unit: &str) -> Uuid {
  app
    .create_ingredient(NewIngredient {
      name: name.to_string(),
      measurement_unit: unit.to_string(),
    })
    .await
    .expect("ingredient inserts")
    .id
}

fn draft(name: &str, ingredients: &[(Uuid, i64)]) -> RecipeDraft {
  RecipeDraft {
    ingredients: ingredients
      .iter()
      .map(|&(id, amount)| IngredientAmount { id, amount })
      .collect(),
    tags: Vec::new(),
    image: None,
    name: name.to_string(),
    text: format!("How to cook {}.", name),
    cooking_time: 20,
  }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
  sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
    .fetch_one(pool)
    .await
    .expect("count query")
}

#[sqlx::test(migrations = false)]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_duplicate_relation_inserts_conflict_and_keep_set_size(pool: PgPool) {
  let app = foodgram(&pool).await;
  let alice = user(&app, "alice").await;
  let bob = user(&app, "bob").await;
  let flour = ingredient(&app, "мука", "г").await;
  let recipe = app.create_recipe(bob, draft("Блины", &[(flour, 200)])).await.unwrap().id;

  app.add_to_cart(alice, recipe).await.unwrap();
  assert!(app.add_to_cart(alice, recipe).await.unwrap_err().is_conflict());
  assert_eq!(count(&pool, "shopping_cart").await, 1);

  app.add_favorite(alice, recipe).await.unwrap();
  assert!(app.add_favorite(alice, recipe).await.unwrap_err().is_conflict());
  assert_eq!(count(&pool, "favorites").await, 1);

  app.subscribe(alice, bob, None).await.unwrap();
  assert!(app.subscribe(alice, bob, None).await.unwrap_err().is_conflict());
  assert_eq!(count(&pool, "follows").await, 1);
}

#[sqlx::test(migrations = false)]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_replace_recipe_swaps_the_whole_ingredient_set(pool: PgPool) {
  let app = foodgram(&pool).await;
  let alice = user(&app, "alice").await;
  let flour = ingredient(&app, "мука", "г").await;
  let eggs = ingredient(&app, "яйцо", "шт").await;
  let milk = ingredient(&app, "молоко", "мл").await;

  let recipe = app
    .create_recipe(alice, draft("Блины", &[(flour, 200), (eggs, 2)]))
    .await
    .unwrap()
    .id;
  let updated = app
    .update_recipe(alice, recipe, draft("Блины", &[(milk, 500), (eggs, 3)]))
    .await
    .unwrap();

  let rows: Vec<(Uuid, i32)> = updated.ingredients.iter().map(|row| (row.id, row.amount)).collect();
  assert_eq!(rows, vec![(milk, 500), (eggs, 3)]);
  assert_eq!(count(&pool, "recipe_ingredients").await, 2);

  let reread = app.recipe(None, recipe).await.unwrap();
  assert_eq!(reread.ingredients, updated.ingredients);
}

#[sqlx::test(migrations = false)]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn test_delete_user_removes_follow_edges_both_ways(pool: PgPool) {
  let app = foodgram(&pool).await;
  let alice = user(&app, "alice").await;
  let bob = user(&app, "bob").await;
  let carol = user(&app, "carol").await;

  app.subscribe(alice, bob, None).await.unwrap();
  app.subscribe(bob, alice, None).await.unwrap();
  app.subscribe(carol, bob, None).await.unwrap();
  app.subscribe(alice, carol, None).await.unwrap();

  app.delete_user(bob).await.unwrap();

  assert_eq!(count(&pool, "follows").await, 1, "only alice -> carol survives");
  let page = app.subscriptions(alice, Default::default(), None).await.unwrap();
  assert_eq!(page.count, 1);
  assert_eq!(page.results[0].author.id, carol);
  assert!(app.subscriptions(carol, Default::default(), None).await.unwrap().results.is_empty());
  assert!(app.delete_user(bob).await.unwrap_err().is_not_found());
}
