// apps/foodgram_server/src/web/handlers/recipe_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use foodgram::RecipeDraft;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{viewer, AuthenticatedUser};
use crate::web::params::{Paginated, QueryParams};

#[instrument(name = "handler::list_recipes", skip(app_state, req, auth_user))]
pub async fn list_recipes_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  auth_user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
  let params = QueryParams::from_request(&req)?;
  let query = params.recipe_query()?;
  let page = params.page_request(app_state.config.page_size)?;

  let recipes = app_state.foodgram.recipes(viewer(&auth_user), &query, page).await?;
  info!(count = recipes.count, "Listed recipes.");
  Ok(HttpResponse::Ok().json(Paginated::new(recipes, &app_state.config.app_base_url, &req)))
}

#[instrument(name = "handler::create_recipe", skip(app_state, payload, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn create_recipe_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<RecipeDraft>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let recipe = app_state
    .foodgram
    .create_recipe(auth_user.user_id, payload.into_inner())
    .await?;
  info!(recipe_id = %recipe.id, "Recipe created.");
  Ok(HttpResponse::Created().json(recipe))
}

#[instrument(name = "handler::get_recipe", skip(app_state, path, auth_user), fields(recipe_id = %path.as_ref()))]
pub async fn get_recipe_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
  let recipe = app_state
    .foodgram
    .recipe(viewer(&auth_user), path.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(recipe))
}

/// Serves both PUT and PATCH; either replaces the whole recipe.
#[instrument(
  name = "handler::update_recipe",
  skip(app_state, path, payload, auth_user),
  fields(recipe_id = %path.as_ref(), user_id = %auth_user.user_id)
)]
pub async fn update_recipe_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<RecipeDraft>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let recipe = app_state
    .foodgram
    .update_recipe(auth_user.user_id, path.into_inner(), payload.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(recipe))
}

#[instrument(
  name = "handler::delete_recipe",
  skip(app_state, path, auth_user),
  fields(recipe_id = %path.as_ref(), user_id = %auth_user.user_id)
)]
pub async fn delete_recipe_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state
    .foodgram
    .delete_recipe(auth_user.user_id, path.into_inner())
    .await?;
  Ok(HttpResponse::NoContent().finish())
}
