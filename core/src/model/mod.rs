// core/src/model/mod.rs

//! Entities and their JSON representations.

pub mod catalog;
pub mod recipe;
pub mod user;

pub use catalog::{Ingredient, NewIngredient, NewTag, Tag};
pub use recipe::{
  IngredientAmount, Recipe, RecipeDraft, RecipeFilter, RecipeIngredient, RecipeMark, RecipeShort, RecipeView,
};
pub use user::{NewUser, Subscription, User, UserCard, UserRole};
