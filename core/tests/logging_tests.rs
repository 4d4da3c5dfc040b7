// tests/logging_tests.rs
mod common;

use common::*;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

/// Records the level of every event it sees.
#[derive(Clone, Default)]
struct LevelRecorder(Arc<Mutex<Vec<Level>>>);

impl<S: Subscriber> Layer<S> for LevelRecorder {
  fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
    self.0.lock().push(*event.metadata().level());
  }
}

#[tokio::test]
async fn test_rejected_requests_log_at_warn_not_error() {
  let recorder = LevelRecorder::default();
  let _guard = tracing::subscriber::set_default(Registry::default().with(recorder.clone()));

  let fx = Fixture::new().await;
  let id = fx.recipe(fx.alice, "Блины", &[(fx.flour, 200)]).await;
  recorder.0.lock().clear();

  assert!(fx.app.subscribe(fx.alice, fx.alice, None).await.unwrap_err().is_validation());
  assert!(fx.app.delete_recipe(fx.bob, id).await.unwrap_err().is_forbidden());
  assert!(fx.app.add_favorite(fx.bob, uuid::Uuid::new_v4()).await.unwrap_err().is_not_found());
  fx.app.add_favorite(fx.bob, id).await.unwrap();
  assert!(fx.app.add_favorite(fx.bob, id).await.unwrap_err().is_conflict());

  let levels = recorder.0.lock().clone();
  assert!(levels.contains(&Level::WARN), "got {:?}", levels);
  assert!(!levels.contains(&Level::ERROR), "got {:?}", levels);
}
