// core/examples/shopping_list.rs

use foodgram::{
  Foodgram, FoodgramError, IngredientAmount, MemoryStore, NewIngredient, NewUser, RecipeDraft, Store, UserRole,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

async fn ingredient(app: &Foodgram, name: &str, unit: &str) -> Result<Uuid, FoodgramError> {
  let created = app
    .create_ingredient(NewIngredient {
      name: name.to_string(),
      measurement_unit: unit.to_string(),
    })
    .await?;
  Ok(created.id)
}

fn draft(name: &str, ingredients: &[(Uuid, i64)]) -> RecipeDraft {
  RecipeDraft {
    ingredients: ingredients
      .iter()
      .map(|(id, amount)| IngredientAmount { id: *id, amount: *amount })
      .collect(),
    tags: Vec::new(),
    image: None,
    name: name.to_string(),
    text: "Mix and cook.".to_string(),
    cooking_time: 30,
  }
}

#[tokio::main]
async fn main() -> Result<(), FoodgramError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Shopping List Example ---");

  let app = Foodgram::new(Arc::new(MemoryStore::new()) as Arc<dyn Store>);
  let cook = app
    .register_user(NewUser {
      email: "cook@example.com".to_string(),
      username: "cook".to_string(),
      first_name: "Home".to_string(),
      last_name: "Cook".to_string(),
      role: UserRole::User,
    })
    .await?;

  let flour = ingredient(&app, "мука", "г").await?;
  let eggs = ingredient(&app, "яйцо", "шт").await?;

  let pancakes = app
    .create_recipe(cook.id, draft("Блины", &[(flour, 200), (eggs, 2)]))
    .await?;
  let bread = app.create_recipe(cook.id, draft("Хлеб", &[(flour, 300)])).await?;

  app.add_to_cart(cook.id, pancakes.id).await?;
  app.add_to_cart(cook.id, bread.id).await?;

  // A second add of the same recipe is rejected, not double-counted.
  match app.add_to_cart(cook.id, bread.id).await {
    Err(FoodgramError::Conflict(msg)) => info!("Duplicate cart entry rejected: {}", msg),
    other => info!("Unexpected result for duplicate cart entry: {:?}", other),
  }

  print!("{}", app.shopping_list_text(cook.id).await?);
  Ok(())
}
