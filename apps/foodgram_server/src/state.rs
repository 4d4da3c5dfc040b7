// apps/foodgram_server/src/state.rs
use crate::config::AppConfig;
use foodgram::Foodgram;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub foodgram: Foodgram,
  pub config: Arc<AppConfig>, // Share loaded config
}
