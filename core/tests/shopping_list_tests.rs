// tests/shopping_list_tests.rs
mod common;

use common::*;
use foodgram::shopping_list::{aggregate, render};
use foodgram::{CartLine, RecipeDraft};
use uuid::Uuid;

fn line(name: &str, unit: &str, amount: i32) -> CartLine {
  CartLine {
    recipe_id: Uuid::new_v4(),
    name: name.to_string(),
    measurement_unit: unit.to_string(),
    amount,
  }
}

#[tokio::test]
async fn test_cart_totals_flour_and_eggs_across_two_recipes() {
  let fx = Fixture::new().await;
  let pancakes = fx.recipe(fx.alice, "Блины", &[(fx.flour, 200), (fx.eggs, 2)]).await;
  let bread = fx.recipe(fx.alice, "Хлеб", &[(fx.flour, 300)]).await;

  fx.app.add_to_cart(fx.bob, pancakes).await.unwrap();
  fx.app.add_to_cart(fx.bob, bread).await.unwrap();

  let items = fx.app.shopping_list(fx.bob).await.unwrap();
  let tuples: Vec<_> = items.iter().map(|item| item.as_tuple()).collect();
  assert_eq!(tuples, vec![("яйцо", "шт", 2), ("мука", "г", 500)]);

  let text = fx.app.shopping_list_text(fx.bob).await.unwrap();
  assert_eq!(text, "яйцо (шт) — 2\nмука (г) — 500\n");
}

#[tokio::test]
async fn test_empty_cart_yields_empty_list() {
  let fx = Fixture::new().await;
  fx.recipe(fx.alice, "Омлет", &[(fx.eggs, 3)]).await;

  assert!(fx.app.shopping_list(fx.bob).await.unwrap().is_empty());
  assert_eq!(fx.app.shopping_list_text(fx.bob).await.unwrap(), "");
}

#[tokio::test]
async fn test_totals_match_sum_of_rows_in_cart_only() {
  let fx = Fixture::new().await;
  let recipes = [
    fx.recipe(fx.alice, "Оладьи", &[(fx.flour, 150), (fx.milk, 250), (fx.eggs, 1)]).await,
    fx.recipe(fx.alice, "Сырники", &[(fx.flour, 60), (fx.eggs, 2)]).await,
    fx.recipe(fx.bob, "Какао", &[(fx.milk, 300)]).await,
    fx.recipe(fx.bob, "Кекс", &[(fx.flour, 400), (fx.eggs, 4), (fx.milk, 100)]).await,
  ];

  // Carol's cart holds the first three; Bob's cart holds the last one.
  for id in &recipes[..3] {
    fx.app.add_to_cart(fx.carol, *id).await.unwrap();
  }
  fx.app.add_to_cart(fx.bob, recipes[3]).await.unwrap();

  let items = fx.app.shopping_list(fx.carol).await.unwrap();
  let total = |name: &str| {
    items
      .iter()
      .find(|item| item.name == name)
      .map(|item| item.total_amount)
      .unwrap_or(0)
  };
  assert_eq!(total("мука"), 150 + 60);
  assert_eq!(total("молоко"), 250 + 300);
  assert_eq!(total("яйцо"), 1 + 2);
  assert_eq!(items.len(), 3);
}

#[tokio::test]
async fn test_removed_and_updated_recipes_are_reflected() {
  let fx = Fixture::new().await;
  let pancakes = fx.recipe(fx.alice, "Блины", &[(fx.flour, 200), (fx.eggs, 2)]).await;
  let omelette = fx.recipe(fx.alice, "Омлет", &[(fx.eggs, 3)]).await;
  fx.app.add_to_cart(fx.bob, pancakes).await.unwrap();
  fx.app.add_to_cart(fx.bob, omelette).await.unwrap();

  fx.app.remove_from_cart(fx.bob, omelette).await.unwrap();
  let update = RecipeDraft {
    cooking_time: 20,
    ..draft("Блины", &[(fx.flour, 250)], &[fx.breakfast])
  };
  fx.app.update_recipe(fx.alice, pancakes, update).await.unwrap();

  let items = fx.app.shopping_list(fx.bob).await.unwrap();
  let tuples: Vec<_> = items.iter().map(|item| item.as_tuple()).collect();
  assert_eq!(tuples, vec![("мука", "г", 250)]);
}

#[test]
fn test_aggregate_groups_by_name_and_unit() {
  let items = aggregate(vec![
    line("сахар", "г", 100),
    line("сахар", "ст. л.", 2),
    line("сахар", "г", 50),
    line("ваниль", "г", 1),
  ]);
  let tuples: Vec<_> = items.iter().map(|item| item.as_tuple()).collect();
  assert_eq!(
    tuples,
    vec![("сахар", "ст. л.", 2), ("сахар", "г", 150), ("ваниль", "г", 1)]
  );
}

#[test]
fn test_aggregate_sums_beyond_i32() {
  let items = aggregate(vec![line("вода", "мл", i32::MAX), line("вода", "мл", i32::MAX)]);
  assert_eq!(items[0].total_amount, 2 * i64::from(i32::MAX));
}

#[test]
fn test_render_empty_is_empty() {
  assert_eq!(render(&[]), "");
}
