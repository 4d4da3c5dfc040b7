// tests/common/mod.rs
#![allow(dead_code)] // Not every test file uses every fixture

use foodgram::{
  Foodgram, IngredientAmount, MemoryStore, NewIngredient, NewTag, NewUser, RecipeDraft, Store, UserCard, UserRole,
};
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

// --- Common Fixture ---
pub struct Fixture {
  pub app: Foodgram,
  pub store: Arc<MemoryStore>,
  pub alice: Uuid,
  pub bob: Uuid,
  pub carol: Uuid,
  pub flour: Uuid,
  pub eggs: Uuid,
  pub milk: Uuid,
  pub breakfast: Uuid,
  pub dinner: Uuid,
}

impl Fixture {
  pub async fn new() -> Self {
    setup_tracing();
    let store = Arc::new(MemoryStore::new());
    let app = Foodgram::new(store.clone() as Arc<dyn Store>);

    let alice = register(&app, "alice").await.id;
    let bob = register(&app, "bob").await.id;
    let carol = register(&app, "carol").await.id;

    let flour = ingredient(&app, "мука", "г").await;
    let eggs = ingredient(&app, "яйцо", "шт").await;
    let milk = ingredient(&app, "молоко", "мл").await;

    let breakfast = tag(&app, "Завтрак", "#E26C2D", "breakfast").await;
    let dinner = tag(&app, "Ужин", "#49B64E", "dinner").await;

    Self {
      app,
      store,
      alice,
      bob,
      carol,
      flour,
      eggs,
      milk,
      breakfast,
      dinner,
    }
  }

  /// Creates a recipe for `author` with the given (ingredient, amount) rows.
  pub async fn recipe(&self, author: Uuid, name: &str, ingredients: &[(Uuid, i64)]) -> Uuid {
    self
      .app
      .create_recipe(author, draft(name, ingredients, &[self.breakfast]))
      .await
      .expect("fixture recipe should be valid")
      .id
  }
}

pub fn draft(name: &str, ingredients: &[(Uuid, i64)], tags: &[Uuid]) -> RecipeDraft {
  RecipeDraft {
    ingredients: ingredients
      .iter()
      .map(|(id, amount)| IngredientAmount { id: *id, amount: *amount })
      .collect(),
    tags: tags.to_vec(),
    image: None,
    name: name.to_string(),
    text: format!("How to cook {}.", name),
    cooking_time: 15,
  }
}

pub async fn register(app: &Foodgram, username: &str) -> UserCard {
  register_as(app, username, UserRole::User).await
}

pub async fn register_as(app: &Foodgram, username: &str, role: UserRole) -> UserCard {
  app
    .register_user(NewUser {
      email: format!("{}@example.com", username),
      username: username.to_string(),
      first_name: username.to_uppercase(),
      last_name: "Tester".to_string(),
      role,
    })
    .await
    .expect("fixture user should register")
}

async fn ingredient(app: &Foodgram, name: &str, unit: &str) -> Uuid {
  app
    .create_ingredient(NewIngredient {
      name: name.to_string(),
      measurement_unit: unit.to_string(),
    })
    .await
    .expect("fixture ingredient should be valid")
    .id
}

async fn tag(app: &Foodgram, name: &str, color: &str, slug: &str) -> Uuid {
  app
    .create_tag(NewTag {
      name: name.to_string(),
      color: color.to_string(),
      slug: slug.to_string(),
    })
    .await
    .expect("fixture tag should be valid")
    .id
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
