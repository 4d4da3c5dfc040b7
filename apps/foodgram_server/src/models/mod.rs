// apps/foodgram_server/src/models/mod.rs

//! Row types read by `PgStore`, one per table shape it selects.
//! Each converts into the matching `foodgram` domain type.

pub mod catalog;
pub mod recipe;
pub mod user;

pub use catalog::{IngredientRow, TagRow};
pub use recipe::{CartLineRow, RecipeIngredientRow, RecipeRow, RecipeTagRow};
pub use user::UserRow;
