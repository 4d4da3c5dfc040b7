// apps/foodgram_server/src/web/params.rs

//! Query-string access for list endpoints. `tags` may repeat, which rules out
//! deserializing straight into a struct.

use actix_web::{web, HttpRequest};
use foodgram::{FoodgramError, FoodgramResult, PageRequest, RecipeQuery};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Default)]
pub struct QueryParams {
  pairs: Vec<(String, String)>,
}

impl QueryParams {
  pub fn from_request(req: &HttpRequest) -> Result<Self, AppError> {
    Self::parse(req.query_string())
  }

  pub fn parse(query: &str) -> Result<Self, AppError> {
    let pairs = web::Query::<Vec<(String, String)>>::from_query(query)
      .map_err(|e| AppError::BadRequest(format!("Malformed query string: {}", e)))?
      .into_inner();
    Ok(Self { pairs })
  }

  pub fn first(&self, key: &str) -> Option<&str> {
    self
      .pairs
      .iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str())
  }

  pub fn all(&self, key: &str) -> Vec<String> {
    self
      .pairs
      .iter()
      .filter(|(k, v)| k == key && !v.is_empty())
      .map(|(_, v)| v.clone())
      .collect()
  }

  /// "1" and "true" turn a flag on; anything else, or absence, leaves it off.
  pub fn flag(&self, key: &str) -> bool {
    matches!(self.first(key), Some("1") | Some("true") | Some("True"))
  }

  pub fn integer(&self, key: &str) -> FoodgramResult<Option<i64>> {
    match self.first(key) {
      None | Some("") => Ok(None),
      Some(raw) => raw
        .trim()
        .parse::<i64>()
        .map(Some)
        .map_err(|_| FoodgramError::validation(key, "A valid integer is required.")),
    }
  }

  pub fn uuid(&self, key: &str) -> FoodgramResult<Option<Uuid>> {
    match self.first(key) {
      None | Some("") => Ok(None),
      Some(raw) => Uuid::parse_str(raw.trim())
        .map(Some)
        .map_err(|_| FoodgramError::validation(key, "A valid UUID is required.")),
    }
  }

  pub fn page_request(&self, default_limit: u32) -> FoodgramResult<PageRequest> {
    PageRequest::new(self.integer("page")?, self.integer("limit")?, default_limit)
  }

  /// `recipes_limit` for subscription cards. Negative values are rejected.
  pub fn recipes_limit(&self) -> FoodgramResult<Option<u32>> {
    match self.integer("recipes_limit")? {
      None => Ok(None),
      Some(limit) => u32::try_from(limit)
        .map(Some)
        .map_err(|_| FoodgramError::validation("recipes_limit", "Ensure this value is greater than or equal to 0.")),
    }
  }

  pub fn recipe_query(&self) -> FoodgramResult<RecipeQuery> {
    Ok(RecipeQuery {
      tags: self.all("tags"),
      author: self.uuid("author")?,
      is_favorited: self.flag("is_favorited"),
      is_in_shopping_cart: self.flag("is_in_shopping_cart"),
    })
  }
}

/// Paginated response body with absolute `next` and `previous` links.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
  pub count: u64,
  pub next: Option<String>,
  pub previous: Option<String>,
  pub results: Vec<T>,
}

impl<T> Paginated<T> {
  pub fn new(page: foodgram::Page<T>, base_url: &str, req: &HttpRequest) -> Self {
    let link = |number: u32| page_link(base_url, req.path(), req.query_string(), number);
    Self {
      next: page.has_next().then(|| link(page.page + 1)),
      previous: page.has_previous().then(|| link(page.page - 1)),
      count: page.count,
      results: page.results,
    }
  }
}

/// Rebuilds the request URL with `page` set to `number`, keeping every other
/// query parameter in its original order.
pub fn page_link(base_url: &str, path: &str, query: &str, number: u32) -> String {
  let mut parts: Vec<String> = query
    .split('&')
    .filter(|part| !part.is_empty() && *part != "page" && !part.starts_with("page="))
    .map(str::to_string)
    .collect();
  parts.push(format!("page={}", number));
  format!("{}{}?{}", base_url, path, parts.join("&"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn repeated_tags_are_all_kept() {
    let params = QueryParams::parse("tags=breakfast&tags=dinner&is_favorited=1").unwrap();
    let query = params.recipe_query().unwrap();
    assert_eq!(query.tags, vec!["breakfast".to_string(), "dinner".to_string()]);
    assert!(query.is_favorited);
    assert!(!query.is_in_shopping_cart);
  }

  #[test]
  fn bad_author_is_a_field_error() {
    let params = QueryParams::parse("author=not-a-uuid").unwrap();
    let err = params.recipe_query().unwrap_err();
    assert!(matches!(err, FoodgramError::Validation(ref errors) if errors.contains_field("author")));
  }

  #[test]
  fn page_and_limit_must_be_numbers() {
    let params = QueryParams::parse("page=two").unwrap();
    assert!(params.page_request(6).unwrap_err().is_validation());

    let params = QueryParams::parse("page=0").unwrap();
    assert!(params.page_request(6).unwrap_err().is_validation());

    let params = QueryParams::parse("limit=500").unwrap();
    assert_eq!(params.page_request(6).unwrap().limit(), foodgram::MAX_PAGE_SIZE);
  }

  #[test]
  fn negative_recipes_limit_is_rejected() {
    let params = QueryParams::parse("recipes_limit=-1").unwrap();
    assert!(params.recipes_limit().unwrap_err().is_validation());
    let params = QueryParams::parse("recipes_limit=0").unwrap();
    assert_eq!(params.recipes_limit().unwrap(), Some(0));
  }

  #[test]
  fn page_link_replaces_only_the_page() {
    assert_eq!(
      page_link("http://testserver", "/api/recipes", "tags=dinner&page=2&limit=3", 3),
      "http://testserver/api/recipes?tags=dinner&limit=3&page=3"
    );
    assert_eq!(
      page_link("http://testserver", "/api/users", "", 2),
      "http://testserver/api/users?page=2"
    );
  }
}
