// apps/foodgram_server/src/web/routes.rs

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::handlers::{catalog_handlers, mark_handlers, recipe_handlers, user_handlers};

async fn health_check_handler(app_state: web::Data<AppState>) -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({
    "status": "ok",
    "storage": format!("{:?}", app_state.config.storage_backend).to_lowercase(),
  }))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::BadRequest(format!("Invalid JSON body: {}", err)).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .service(
      web::scope("/api")
        .route("/health", web::get().to(health_check_handler))
        .service(
          web::scope("/tags")
            .route("", web::get().to(catalog_handlers::list_tags_handler))
            .route("/{tag_id}", web::get().to(catalog_handlers::get_tag_handler)),
        )
        .service(
          web::scope("/ingredients")
            .route("", web::get().to(catalog_handlers::list_ingredients_handler))
            .route("/{ingredient_id}", web::get().to(catalog_handlers::get_ingredient_handler)),
        )
        // Literal segments are registered before `/{recipe_id}`.
        .service(
          web::scope("/recipes")
            .route("", web::get().to(recipe_handlers::list_recipes_handler))
            .route("", web::post().to(recipe_handlers::create_recipe_handler))
            .route(
              "/download_shopping_cart",
              web::get().to(mark_handlers::download_shopping_cart_handler),
            )
            .route("/{recipe_id}", web::get().to(recipe_handlers::get_recipe_handler))
            .route("/{recipe_id}", web::put().to(recipe_handlers::update_recipe_handler))
            .route("/{recipe_id}", web::patch().to(recipe_handlers::update_recipe_handler))
            .route("/{recipe_id}", web::delete().to(recipe_handlers::delete_recipe_handler))
            .route("/{recipe_id}/favorite", web::post().to(mark_handlers::add_favorite_handler))
            .route(
              "/{recipe_id}/favorite",
              web::delete().to(mark_handlers::remove_favorite_handler),
            )
            .route(
              "/{recipe_id}/shopping_cart",
              web::post().to(mark_handlers::add_to_cart_handler),
            )
            .route(
              "/{recipe_id}/shopping_cart",
              web::delete().to(mark_handlers::remove_from_cart_handler),
            ),
        )
        .service(
          web::scope("/users")
            .route("", web::get().to(user_handlers::list_users_handler))
            .route("", web::post().to(user_handlers::register_user_handler))
            .route("/me", web::get().to(user_handlers::me_handler))
            .route("/me", web::delete().to(user_handlers::delete_me_handler))
            .route("/subscriptions", web::get().to(user_handlers::subscriptions_handler))
            .route("/{user_id}", web::get().to(user_handlers::get_user_handler))
            .route("/{user_id}/subscribe", web::post().to(user_handlers::subscribe_handler))
            .route("/{user_id}/subscribe", web::delete().to(user_handlers::unsubscribe_handler)),
        ),
    );
}
