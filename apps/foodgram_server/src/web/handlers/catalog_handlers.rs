// apps/foodgram_server/src/web/handlers/catalog_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize, Debug)]
pub struct IngredientSearchQuery {
  pub name: Option<String>,
}

#[instrument(name = "handler::list_tags", skip(app_state))]
pub async fn list_tags_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let tags = app_state.foodgram.tags().await?;
  Ok(HttpResponse::Ok().json(tags))
}

#[instrument(name = "handler::get_tag", skip(app_state, path), fields(tag_id = %path.as_ref()))]
pub async fn get_tag_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let tag = app_state.foodgram.tag(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(tag))
}

#[instrument(name = "handler::list_ingredients", skip(app_state, query_params), fields(name = ?query_params.name))]
pub async fn list_ingredients_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<IngredientSearchQuery>,
) -> Result<HttpResponse, AppError> {
  let ingredients = app_state
    .foodgram
    .ingredients(query_params.name.as_deref())
    .await?;
  info!("Found {} ingredients.", ingredients.len());
  Ok(HttpResponse::Ok().json(ingredients))
}

#[instrument(name = "handler::get_ingredient", skip(app_state, path), fields(ingredient_id = %path.as_ref()))]
pub async fn get_ingredient_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let ingredient = app_state.foodgram.ingredient(path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(ingredient))
}
