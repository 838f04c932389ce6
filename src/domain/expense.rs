//! Expense records and their construction/patch contracts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::id::IdGen;

/// A single spending record. `date` is user-chosen and may lie in the past or
/// future; `created_at` is set once at construction and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub category_id: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new expense; id and `created_at` are assigned
/// by the constructor.
#[derive(Debug, Clone)]
pub struct ExpenseInput {
    pub amount: f64,
    pub description: String,
    pub category_id: String,
    pub date: DateTime<Utc>,
}

/// Partial update for an existing expense. Absent fields keep their value;
/// id and `created_at` cannot be patched.
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl Expense {
    pub fn create(input: ExpenseInput, ids: &mut dyn IdGen, clock: &dyn Clock) -> Self {
        Self {
            id: ids.next_id(),
            amount: super::sanitize_amount(input.amount),
            description: input.description,
            category_id: input.category_id,
            date: input.date,
            created_at: clock.now(),
        }
    }

    /// Merges the patch into this expense, preserving id and `created_at`.
    pub fn apply(&mut self, patch: ExpensePatch) {
        if let Some(amount) = patch.amount {
            self.amount = super::sanitize_amount(amount);
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}
