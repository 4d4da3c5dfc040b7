// src/lib.rs

//! Foodgram: the domain core of a recipe-sharing backend.
//!
//! Users publish recipes built from tagged ingredients with quantities. Other
//! users favorite recipes, put them in a shopping cart and follow authors.
//! This crate holds:
//!  - Entities and their JSON representations (`model`).
//!  - Field validation that reports every problem at once (`validation`).
//!  - Shopping-list aggregation over a user's cart (`shopping_list`).
//!  - The `Store` persistence trait and an in-memory implementation.
//!  - `Foodgram`, the service that implements every operation on a `Store`.

pub mod error;
pub mod memory;
pub mod model;
pub mod pagination;
pub mod service;
pub mod shopping_list;
pub mod store;
pub mod validation;

// --- Re-exports for the Public API ---

pub use crate::error::{FoodgramError, FoodgramResult, ValidationErrors};
pub use crate::memory::MemoryStore;
pub use crate::model::{
  Ingredient, IngredientAmount, NewIngredient, NewTag, NewUser, Recipe, RecipeDraft, RecipeFilter, RecipeIngredient,
  RecipeMark, RecipeShort, RecipeView, Subscription, Tag, User, UserCard, UserRole,
};
pub use crate::pagination::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use crate::service::{Foodgram, RecipeQuery};
pub use crate::shopping_list::{CartLine, ShoppingListItem};
pub use crate::store::Store;
pub use crate::validation::CheckedRecipe;
