// core/src/validation.rs

//! Field validation for incoming payloads.
//!
//! Every check appends to a [`ValidationErrors`] instead of returning early, so
//! one response lists every problem in the submission.

use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{FoodgramResult, ValidationErrors};
use crate::model::{NewIngredient, NewTag, NewUser, RecipeDraft};

pub const NAME_MAX_LEN: usize = 200;
pub const UNIT_MAX_LEN: usize = 50;
pub const USER_FIELD_MAX_LEN: usize = 150;
pub const EMAIL_MAX_LEN: usize = 254;
pub const MIN_AMOUNT: i64 = 1;
pub const MIN_COOKING_TIME: i64 = 1;
/// Cooking time is stored as a positive small integer.
pub const MAX_COOKING_TIME: i64 = i16::MAX as i64;

/// A recipe payload that passed validation, ready to be written by a store.
///
/// Tag ids are de-duplicated in submission order; ingredient ids are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedRecipe {
  pub name: String,
  pub text: String,
  pub image: Option<String>,
  pub cooking_time: i32,
  pub ingredients: Vec<(Uuid, i32)>,
  pub tags: Vec<Uuid>,
}

impl CheckedRecipe {
  /// Runs the field checks on `draft`, adding to `errors` (which may already
  /// hold problems found elsewhere, e.g. unknown ids).
  pub fn validate(draft: RecipeDraft, mut errors: ValidationErrors) -> FoodgramResult<Self> {
    check_recipe_fields(&draft, &mut errors);
    errors.into_result()?;

    let mut seen_tags = HashSet::new();
    let tags = draft.tags.into_iter().filter(|id| seen_tags.insert(*id)).collect();
    let ingredients = draft
      .ingredients
      .iter()
      .map(|item| (item.id, narrow(item.amount)))
      .collect();

    Ok(Self {
      name: draft.name.trim().to_string(),
      text: draft.text,
      image: draft.image.filter(|image| !image.trim().is_empty()),
      cooking_time: narrow(draft.cooking_time),
      ingredients,
      tags,
    })
  }
}

// Only called on values already range-checked.
fn narrow(value: i64) -> i32 {
  i32::try_from(value).unwrap_or(i32::MAX)
}

pub fn check_recipe_fields(draft: &RecipeDraft, errors: &mut ValidationErrors) {
  check_required_text("name", &draft.name, NAME_MAX_LEN, errors);
  if draft.text.trim().is_empty() {
    errors.add("text", "This field may not be blank.");
  }

  if draft.cooking_time < MIN_COOKING_TIME {
    errors.add("cooking_time", "Cooking time must be greater than 0.");
  } else if draft.cooking_time > MAX_COOKING_TIME {
    errors.add(
      "cooking_time",
      format!("Cooking time must not exceed {} minutes.", MAX_COOKING_TIME),
    );
  }

  let mut seen = HashSet::new();
  for item in &draft.ingredients {
    if !seen.insert(item.id) {
      errors.add("ingredients", format!("Ingredient {} is listed more than once.", item.id));
    }
    if item.amount < MIN_AMOUNT {
      errors.add(
        "ingredients",
        format!("Amount for ingredient {} must be at least {}.", item.id, MIN_AMOUNT),
      );
    } else if item.amount > i64::from(i32::MAX) {
      errors.add("ingredients", format!("Amount for ingredient {} is too large.", item.id));
    }
  }
}

pub fn validate_new_user(user: &NewUser) -> FoodgramResult<()> {
  let mut errors = ValidationErrors::new();

  let email = user.email.trim();
  if email.is_empty() {
    errors.add("email", "This field may not be blank.");
  } else if email.len() > EMAIL_MAX_LEN || !looks_like_email(email) {
    errors.add("email", "Enter a valid email address.");
  }

  check_required_text("username", &user.username, USER_FIELD_MAX_LEN, &mut errors);
  if user.username.eq_ignore_ascii_case("me") {
    errors.add("username", "The username \"me\" is reserved.");
  }
  if !user
    .username
    .chars()
    .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
  {
    errors.add(
      "username",
      "Username may contain only letters, digits and @/./+/-/_ characters.",
    );
  }

  check_required_text("first_name", &user.first_name, USER_FIELD_MAX_LEN, &mut errors);
  check_required_text("last_name", &user.last_name, USER_FIELD_MAX_LEN, &mut errors);

  errors.into_result()
}

pub fn validate_new_tag(tag: &NewTag) -> FoodgramResult<()> {
  let mut errors = ValidationErrors::new();
  check_required_text("name", &tag.name, NAME_MAX_LEN, &mut errors);

  let color = tag.color.as_bytes();
  if color.len() != 7 || color[0] != b'#' || !color[1..].iter().all(u8::is_ascii_hexdigit) {
    errors.add("color", "Color must be a hex code like #1A2B3C.");
  }

  if tag.slug.is_empty()
    || !tag
      .slug
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
  {
    errors.add("slug", "Slug may contain only latin letters, digits, hyphens and underscores.");
  }
  errors.into_result()
}

pub fn validate_new_ingredient(ingredient: &NewIngredient) -> FoodgramResult<()> {
  let mut errors = ValidationErrors::new();
  check_required_text("name", &ingredient.name, NAME_MAX_LEN, &mut errors);
  check_required_text("measurement_unit", &ingredient.measurement_unit, UNIT_MAX_LEN, &mut errors);
  errors.into_result()
}

fn check_required_text(field: &str, value: &str, max_len: usize, errors: &mut ValidationErrors) {
  if value.trim().is_empty() {
    errors.add(field, "This field may not be blank.");
  } else if value.chars().count() > max_len {
    errors.add(field, format!("Ensure this field has no more than {} characters.", max_len));
  }
}

fn looks_like_email(value: &str) -> bool {
  match value.split_once('@') {
    Some((local, domain)) => {
      !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    }
    None => false,
  }
}
