//! Domain types for the expense dataset: categories, expenses, budgets, and
//! the snapshot value shared by persistence, import, and export.

pub mod budget;
pub mod category;
pub mod expense;

pub use budget::Budget;
pub use category::{default_categories, Category, CategoryInput};
pub use expense::{Expense, ExpenseInput, ExpensePatch};

use serde::{Deserialize, Serialize};

/// A full copy of the dataset. Field names mirror the persisted JSON keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub category_budgets: Vec<Budget>,
    #[serde(default)]
    pub overall_budget: f64,
}

/// Parses a user-supplied amount string. Malformed, non-finite, or negative
/// input coerces to zero so NaN never reaches aggregation.
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) => sanitize_amount(value),
        Err(_) => 0.0,
    }
}

/// Clamps an already-numeric amount to the non-negative finite range.
pub fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        0.0
    }
}
