// tests/relation_tests.rs
mod common;

use common::*;
use foodgram::{FoodgramError, PageRequest, RecipeMark, RecipeQuery};
use uuid::Uuid;

#[tokio::test]
async fn test_adding_to_cart_twice_conflicts_and_keeps_set_size() {
  let fx = Fixture::new().await;
  let recipe = fx.recipe(fx.alice, "Блины", &[(fx.flour, 200)]).await;

  let short = fx.app.add_to_cart(fx.bob, recipe).await.unwrap();
  assert_eq!(short.id, recipe);
  assert_eq!(short.name, "Блины");
  assert_eq!(fx.store.mark_count(RecipeMark::ShoppingCart), 1);

  let second = fx.app.add_to_cart(fx.bob, recipe).await;
  assert!(matches!(second, Err(FoodgramError::Conflict(_))), "got {:?}", second);
  assert_eq!(fx.store.mark_count(RecipeMark::ShoppingCart), 1);
}

#[tokio::test]
async fn test_favorite_and_cart_are_independent_sets() {
  let fx = Fixture::new().await;
  let recipe = fx.recipe(fx.alice, "Блины", &[(fx.flour, 200)]).await;

  fx.app.add_favorite(fx.bob, recipe).await.unwrap();
  fx.app.add_to_cart(fx.bob, recipe).await.unwrap();
  assert!(fx.app.add_favorite(fx.bob, recipe).await.unwrap_err().is_conflict());

  let view = fx.app.recipe(Some(fx.bob), recipe).await.unwrap();
  assert!(view.is_favorited);
  assert!(view.is_in_shopping_cart);

  let other = fx.app.recipe(Some(fx.carol), recipe).await.unwrap();
  assert!(!other.is_favorited);
  assert!(!other.is_in_shopping_cart);
}

#[tokio::test]
async fn test_removing_absent_favorite_is_not_found() {
  let fx = Fixture::new().await;
  let recipe = fx.recipe(fx.alice, "Блины", &[(fx.flour, 200)]).await;

  let err = fx.app.remove_favorite(fx.bob, recipe).await.unwrap_err();
  assert!(err.is_not_found(), "got {:?}", err);

  fx.app.add_favorite(fx.bob, recipe).await.unwrap();
  fx.app.remove_favorite(fx.bob, recipe).await.unwrap();
  assert!(fx.app.remove_favorite(fx.bob, recipe).await.unwrap_err().is_not_found());
  assert_eq!(fx.store.mark_count(RecipeMark::Favorite), 0);
}

#[tokio::test]
async fn test_marks_on_missing_recipe_are_not_found() {
  let fx = Fixture::new().await;
  let ghost = Uuid::new_v4();

  assert!(fx.app.add_to_cart(fx.bob, ghost).await.unwrap_err().is_not_found());
  assert!(fx.app.remove_from_cart(fx.bob, ghost).await.unwrap_err().is_not_found());
  assert!(fx.app.add_favorite(fx.bob, ghost).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_deleting_recipe_clears_carts_and_favorites() {
  let fx = Fixture::new().await;
  let recipe = fx.recipe(fx.alice, "Блины", &[(fx.flour, 200)]).await;
  fx.app.add_to_cart(fx.bob, recipe).await.unwrap();
  fx.app.add_favorite(fx.carol, recipe).await.unwrap();

  fx.app.delete_recipe(fx.alice, recipe).await.unwrap();

  assert_eq!(fx.store.mark_count(RecipeMark::ShoppingCart), 0);
  assert_eq!(fx.store.mark_count(RecipeMark::Favorite), 0);
  assert!(fx.app.shopping_list(fx.bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_self_follow_is_always_a_validation_error() {
  let fx = Fixture::new().await;

  let err = fx.app.subscribe(fx.alice, fx.alice, None).await.unwrap_err();
  assert!(err.is_validation(), "got {:?}", err);

  // Still a validation error after other follow activity.
  fx.app.subscribe(fx.alice, fx.bob, None).await.unwrap();
  fx.app.subscribe(fx.bob, fx.alice, None).await.unwrap();
  let err = fx.app.subscribe(fx.alice, fx.alice, None).await.unwrap_err();
  match err {
    FoodgramError::Validation(errors) => assert!(errors.contains_field("author")),
    other => panic!("Expected a validation error, got {:?}", other),
  }
  assert_eq!(fx.store.follow_count(), 2);
}

#[tokio::test]
async fn test_self_follow_is_rejected_before_existence_checks() {
  let fx = Fixture::new().await;
  let ghost = Uuid::new_v4();

  let err = fx.app.subscribe(ghost, ghost, None).await.unwrap_err();
  assert!(err.is_validation(), "got {:?}", err);
  assert!(fx.app.subscribe(ghost, fx.alice, None).await.unwrap_err().is_not_found());
  assert_eq!(fx.store.follow_count(), 0);
}

#[tokio::test]
async fn test_follow_twice_conflicts_and_unfollow_absent_is_not_found() {
  let fx = Fixture::new().await;

  let subscription = fx.app.subscribe(fx.bob, fx.alice, None).await.unwrap();
  assert_eq!(subscription.author.id, fx.alice);
  assert!(subscription.author.is_subscribed);

  assert!(fx.app.subscribe(fx.bob, fx.alice, None).await.unwrap_err().is_conflict());
  assert_eq!(fx.store.follow_count(), 1);

  fx.app.unsubscribe(fx.bob, fx.alice).await.unwrap();
  assert!(fx.app.unsubscribe(fx.bob, fx.alice).await.unwrap_err().is_not_found());
  assert!(fx.app.subscribe(fx.bob, Uuid::new_v4(), None).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_subscriptions_embed_limited_recipes() {
  let fx = Fixture::new().await;
  fx.recipe(fx.alice, "Первый", &[(fx.flour, 1)]).await;
  fx.recipe(fx.alice, "Второй", &[(fx.flour, 2)]).await;
  let newest = fx.recipe(fx.alice, "Третий", &[(fx.flour, 3)]).await;
  fx.recipe(fx.carol, "Чужой", &[(fx.eggs, 1)]).await;

  fx.app.subscribe(fx.bob, fx.alice, None).await.unwrap();
  fx.app.subscribe(fx.bob, fx.carol, None).await.unwrap();

  let page = fx.app.subscriptions(fx.bob, PageRequest::default(), Some(2)).await.unwrap();
  assert_eq!(page.count, 2);
  let alice = page.results.iter().find(|s| s.author.id == fx.alice).unwrap();
  assert_eq!(alice.recipes_count, 3);
  assert_eq!(alice.recipes.len(), 2);
  assert_eq!(alice.recipes[0].id, newest);

  let unlimited = fx.app.subscriptions(fx.bob, PageRequest::default(), None).await.unwrap();
  let alice = unlimited.results.iter().find(|s| s.author.id == fx.alice).unwrap();
  assert_eq!(alice.recipes.len(), 3);

  let none = fx.app.subscriptions(fx.bob, PageRequest::default(), Some(0)).await.unwrap();
  assert!(none.results.iter().all(|s| s.recipes.is_empty()));
}

#[tokio::test]
async fn test_deleting_user_removes_follow_edges_both_ways() {
  let fx = Fixture::new().await;
  let recipe = fx.recipe(fx.alice, "Блины", &[(fx.flour, 200)]).await;
  fx.app.subscribe(fx.alice, fx.bob, None).await.unwrap();
  fx.app.subscribe(fx.carol, fx.alice, None).await.unwrap();
  fx.app.subscribe(fx.carol, fx.bob, None).await.unwrap();
  fx.app.add_to_cart(fx.carol, recipe).await.unwrap();

  fx.app.delete_user(fx.alice).await.unwrap();

  assert_eq!(fx.store.follow_count(), 1);
  assert_eq!(fx.store.mark_count(RecipeMark::ShoppingCart), 0);
  let listing = fx
    .app
    .recipes(None, &RecipeQuery::default(), PageRequest::default())
    .await
    .unwrap();
  assert_eq!(listing.count, 0);
  assert!(fx.app.delete_user(fx.alice).await.unwrap_err().is_not_found());
}
