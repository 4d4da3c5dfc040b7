// core/src/pagination.rs

use serde::Serialize;

use crate::error::{FoodgramError, FoodgramResult};

pub const DEFAULT_PAGE_SIZE: u32 = 6;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page request. Construct through [`PageRequest::new`] so the
/// bounds hold everywhere a store sees one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  page: u32,
  limit: u32,
}

impl PageRequest {
  pub fn new(page: Option<i64>, limit: Option<i64>, default_limit: u32) -> FoodgramResult<Self> {
    let page = page.unwrap_or(1);
    if page < 1 {
      return Err(FoodgramError::validation("page", "Page number must be at least 1."));
    }
    let limit = limit.unwrap_or_else(|| i64::from(default_limit));
    if limit < 1 {
      return Err(FoodgramError::validation("limit", "Page size must be at least 1."));
    }

    Ok(Self {
      page: u32::try_from(page).unwrap_or(u32::MAX),
      limit: limit.min(i64::from(MAX_PAGE_SIZE)) as u32,
    })
  }

  pub fn first(limit: u32) -> Self {
    Self {
      page: 1,
      limit: limit.max(1),
    }
  }

  /// Everything on one page. Used for embedded lists with no caller limit.
  pub fn everything() -> Self {
    Self { page: 1, limit: u32::MAX }
  }

  pub fn page(&self) -> u32 {
    self.page
  }

  pub fn limit(&self) -> u32 {
    self.limit
  }

  pub fn offset(&self) -> u64 {
    u64::from(self.page - 1) * u64::from(self.limit)
  }

  /// NotFound when a page past the first starts beyond the last item. The
  /// first page always exists, even for an empty listing.
  pub fn ensure_within(&self, count: u64) -> FoodgramResult<()> {
    if self.page > 1 && self.offset() >= count {
      return Err(FoodgramError::NotFound("Invalid page.".to_string()));
    }
    Ok(())
  }

  /// Slices an already ordered collection, returning the page and the total.
  pub fn slice<T>(&self, items: Vec<T>) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let page = items
      .into_iter()
      .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
      .take(self.limit as usize)
      .collect();
    (page, total)
  }
}

impl Default for PageRequest {
  fn default() -> Self {
    Self::first(DEFAULT_PAGE_SIZE)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
  pub count: u64,
  pub page: u32,
  pub limit: u32,
  pub results: Vec<T>,
}

impl<T> Page<T> {
  pub fn new(request: PageRequest, results: Vec<T>, count: u64) -> Self {
    Self {
      count,
      page: request.page(),
      limit: request.limit(),
      results,
    }
  }

  pub fn has_next(&self) -> bool {
    u64::from(self.page) * u64::from(self.limit) < self.count
  }

  pub fn has_previous(&self) -> bool {
    self.page > 1
  }

  pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
    Page {
      count: self.count,
      page: self.page,
      limit: self.limit,
      results: self.results.into_iter().map(f).collect(),
    }
  }
}
