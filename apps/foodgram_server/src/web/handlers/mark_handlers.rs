// apps/foodgram_server/src/web/handlers/mark_handlers.rs

//! Favorites, the shopping cart and the shopping-list download.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use foodgram::RecipeMark;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

async fn add_mark(
  app_state: &AppState,
  mark: RecipeMark,
  user: AuthenticatedUser,
  recipe_id: Uuid,
) -> Result<HttpResponse, AppError> {
  let recipe = app_state.foodgram.add_mark(mark, user.user_id, recipe_id).await?;
  Ok(HttpResponse::Created().json(recipe))
}

async fn remove_mark(
  app_state: &AppState,
  mark: RecipeMark,
  user: AuthenticatedUser,
  recipe_id: Uuid,
) -> Result<HttpResponse, AppError> {
  app_state.foodgram.remove_mark(mark, user.user_id, recipe_id).await?;
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::add_favorite", skip(app_state, path, auth_user), fields(recipe_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn add_favorite_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  add_mark(&app_state, RecipeMark::Favorite, auth_user, path.into_inner()).await
}

#[instrument(name = "handler::remove_favorite", skip(app_state, path, auth_user), fields(recipe_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn remove_favorite_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  remove_mark(&app_state, RecipeMark::Favorite, auth_user, path.into_inner()).await
}

#[instrument(name = "handler::add_to_cart", skip(app_state, path, auth_user), fields(recipe_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  add_mark(&app_state, RecipeMark::ShoppingCart, auth_user, path.into_inner()).await
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, path, auth_user), fields(recipe_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  remove_mark(&app_state, RecipeMark::ShoppingCart, auth_user, path.into_inner()).await
}

#[instrument(name = "handler::download_shopping_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn download_shopping_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let text = app_state.foodgram.shopping_list_text(auth_user.user_id).await?;
  info!(bytes = text.len(), "Shopping list rendered.");

  Ok(
    HttpResponse::Ok()
      .content_type("text/plain; charset=utf-8")
      .insert_header(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(SHOPPING_LIST_FILENAME.to_string())],
      })
      .body(text),
  )
}
