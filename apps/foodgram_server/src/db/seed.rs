// apps/foodgram_server/src/db/seed.rs

use anyhow::Context;
use foodgram::{Foodgram, FoodgramError, NewIngredient, NewTag};
use tracing::{info, instrument};

const DEMO_TAGS: &[(&str, &str, &str)] = &[
  ("Завтрак", "#E26C2D", "breakfast"),
  ("Обед", "#49B64E", "lunch"),
  ("Ужин", "#8775D2", "dinner"),
];

const DEMO_INGREDIENTS: &[(&str, &str)] = &[
  ("мука", "г"),
  ("молоко", "мл"),
  ("яйцо", "шт"),
  ("сахар", "г"),
  ("соль", "по вкусу"),
  ("сливочное масло", "г"),
  ("картофель", "г"),
  ("лук репчатый", "шт"),
];

/// Inserts demo tags and ingredients. Tags already present (by slug) are
/// skipped; ingredients are only inserted into an empty catalog.
#[instrument(name = "db::seed", skip(foodgram))]
pub async fn seed_db(foodgram: &Foodgram) -> anyhow::Result<()> {
  let mut tags_added = 0;
  for (name, color, slug) in DEMO_TAGS {
    let tag = NewTag {
      name: name.to_string(),
      color: color.to_string(),
      slug: slug.to_string(),
    };
    match foodgram.create_tag(tag).await {
      Ok(_) => tags_added += 1,
      Err(FoodgramError::Conflict(_)) => {}
      Err(e) => return Err(e).with_context(|| format!("Failed to seed tag '{}'", slug)),
    }
  }

  let mut ingredients_added = 0;
  if foodgram.ingredients(None).await?.is_empty() {
    for (name, unit) in DEMO_INGREDIENTS {
      let ingredient = NewIngredient {
        name: name.to_string(),
        measurement_unit: unit.to_string(),
      };
      foodgram
        .create_ingredient(ingredient)
        .await
        .with_context(|| format!("Failed to seed ingredient '{}'", name))?;
      ingredients_added += 1;
    }
  }

  info!(tags_added, ingredients_added, "Database seeded.");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use foodgram::{MemoryStore, Store};
  use std::sync::Arc;

  #[tokio::test]
  async fn seeding_twice_adds_nothing_the_second_time() {
    let foodgram = Foodgram::new(Arc::new(MemoryStore::new()) as Arc<dyn Store>);
    seed_db(&foodgram).await.unwrap();
    seed_db(&foodgram).await.unwrap();

    assert_eq!(foodgram.tags().await.unwrap().len(), DEMO_TAGS.len());
    assert_eq!(foodgram.ingredients(None).await.unwrap().len(), DEMO_INGREDIENTS.len());
  }
}
