// core/src/shopping_list.rs

//! Shopping-list aggregation.
//!
//! A user's cart is a set of recipes. The shopping list is the sum of every
//! ingredient quantity across those recipes, grouped by (ingredient name,
//! measurement unit) and ordered like ingredients are: name descending.

use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// One association row reachable from a user's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
  pub recipe_id: Uuid,
  pub name: String,
  pub measurement_unit: String,
  pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListItem {
  pub name: String,
  pub measurement_unit: String,
  pub total_amount: i64,
}

impl ShoppingListItem {
  pub fn as_tuple(&self) -> (&str, &str, i64) {
    (&self.name, &self.measurement_unit, self.total_amount)
  }
}

/// Groups `lines` by (name, unit) and sums their amounts.
///
/// Output is ordered by name descending, then unit descending. An empty input
/// yields an empty list.
pub fn aggregate<I>(lines: I) -> Vec<ShoppingListItem>
where
  I: IntoIterator<Item = CartLine>,
{
  let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
  for line in lines {
    *totals.entry((line.name, line.measurement_unit)).or_insert(0) += i64::from(line.amount);
  }

  totals
    .into_iter()
    .rev()
    .map(|((name, measurement_unit), total_amount)| ShoppingListItem {
      name,
      measurement_unit,
      total_amount,
    })
    .collect()
}

/// Plain-text rendering, one `"{name} ({unit}) — {total}"` line per item.
pub fn render(items: &[ShoppingListItem]) -> String {
  let mut out = String::new();
  for item in items {
    out.push_str(&format!(
      "{} ({}) — {}\n",
      item.name, item.measurement_unit, item.total_amount
    ));
  }
  out
}
