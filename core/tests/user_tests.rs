// tests/user_tests.rs
mod common;

use common::*;
use foodgram::{FoodgramError, NewUser, PageRequest, UserRole};

fn new_user(email: &str, username: &str) -> NewUser {
  NewUser {
    email: email.to_string(),
    username: username.to_string(),
    first_name: "Иван".to_string(),
    last_name: "Петров".to_string(),
    role: UserRole::User,
  }
}

#[tokio::test]
async fn test_reserved_and_malformed_usernames_are_rejected() {
  let fx = Fixture::new().await;
  for username in ["me", "ME", "with space", ""] {
    let err = fx.app.register_user(new_user("x@example.com", username)).await.unwrap_err();
    match err {
      FoodgramError::Validation(errors) => assert!(errors.contains_field("username"), "username {:?}", username),
      other => panic!("Expected validation error for {:?}, got {:?}", username, other),
    }
  }
}

#[tokio::test]
async fn test_duplicate_email_or_username_conflicts() {
  let fx = Fixture::new().await;
  let err = fx.app.register_user(new_user("ALICE@example.com", "alice2")).await.unwrap_err();
  assert!(err.is_conflict(), "emails compare case-insensitively, got {:?}", err);

  let err = fx.app.register_user(new_user("new@example.com", "alice")).await.unwrap_err();
  assert!(err.is_conflict());
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
  let fx = Fixture::new().await;
  let err = fx.app.register_user(new_user("not-an-email", "dave")).await.unwrap_err();
  assert!(err.is_validation());
}

#[tokio::test]
async fn test_user_cards_report_subscription_state() {
  let fx = Fixture::new().await;
  fx.app.subscribe(fx.bob, fx.alice, None).await.unwrap();

  assert!(fx.app.user_card(Some(fx.bob), fx.alice).await.unwrap().is_subscribed);
  assert!(!fx.app.user_card(Some(fx.carol), fx.alice).await.unwrap().is_subscribed);
  assert!(!fx.app.user_card(None, fx.alice).await.unwrap().is_subscribed);

  let page = fx.app.users(Some(fx.bob), PageRequest::default()).await.unwrap();
  assert_eq!(page.count, 3);
  assert_eq!(page.results[0].id, fx.alice, "join order");
  assert!(page.results[0].is_subscribed);
}
