// apps/foodgram_server/src/web/handlers/mod.rs

pub mod catalog_handlers;
pub mod mark_handlers;
pub mod recipe_handlers;
pub mod user_handlers;
