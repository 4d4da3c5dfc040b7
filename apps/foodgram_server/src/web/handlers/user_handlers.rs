// apps/foodgram_server/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use foodgram::NewUser;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::{viewer, AuthenticatedUser};
use crate::web::params::{Paginated, QueryParams};

#[instrument(name = "handler::register_user", skip(app_state, payload), fields(username = %payload.username))]
pub async fn register_user_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<NewUser>,
) -> Result<HttpResponse, AppError> {
  let user = app_state.foodgram.register_user(payload.into_inner()).await?;
  info!(user_id = %user.id, "User registered.");
  Ok(HttpResponse::Created().json(user))
}

#[instrument(name = "handler::list_users", skip(app_state, req, auth_user))]
pub async fn list_users_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  auth_user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
  let page = QueryParams::from_request(&req)?.page_request(app_state.config.page_size)?;
  let users = app_state.foodgram.users(viewer(&auth_user), page).await?;
  Ok(HttpResponse::Ok().json(Paginated::new(users, &app_state.config.app_base_url, &req)))
}

#[instrument(name = "handler::get_user", skip(app_state, path, auth_user), fields(user_id = %path.as_ref()))]
pub async fn get_user_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
  let user = app_state
    .foodgram
    .user_card(viewer(&auth_user), path.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(user))
}

#[instrument(name = "handler::me", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user = app_state
    .foodgram
    .user_card(Some(auth_user.user_id), auth_user.user_id)
    .await?;
  Ok(HttpResponse::Ok().json(user))
}

#[instrument(name = "handler::delete_me", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn delete_me_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state.foodgram.delete_user(auth_user.user_id).await?;
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::subscribe", skip(app_state, path, req, auth_user), fields(author_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn subscribe_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req: HttpRequest,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let recipes_limit = QueryParams::from_request(&req)?.recipes_limit()?;
  let subscription = app_state
    .foodgram
    .subscribe(auth_user.user_id, path.into_inner(), recipes_limit)
    .await?;
  Ok(HttpResponse::Created().json(subscription))
}

#[instrument(name = "handler::unsubscribe", skip(app_state, path, auth_user), fields(author_id = %path.as_ref(), user_id = %auth_user.user_id))]
pub async fn unsubscribe_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  app_state
    .foodgram
    .unsubscribe(auth_user.user_id, path.into_inner())
    .await?;
  Ok(HttpResponse::NoContent().finish())
}

#[instrument(name = "handler::subscriptions", skip(app_state, req, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn subscriptions_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let params = QueryParams::from_request(&req)?;
  let page = params.page_request(app_state.config.page_size)?;
  let subscriptions = app_state
    .foodgram
    .subscriptions(auth_user.user_id, page, params.recipes_limit()?)
    .await?;
  Ok(HttpResponse::Ok().json(Paginated::new(
    subscriptions,
    &app_state.config.app_base_url,
    &req,
  )))
}
