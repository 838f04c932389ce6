//! Persistence collaborator for the dataset store.

pub mod json_backend;

use crate::domain::Snapshot;
use crate::errors::Result;

/// Abstraction over persistence backends capable of storing the dataset.
///
/// `load` applies defaults for anything missing (seeded categories, zero
/// budgets, no expenses), so a fresh backend yields a usable snapshot.
pub trait StorageBackend: Send {
    fn load(&self) -> Result<Snapshot>;
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

pub use json_backend::JsonStorage;

/// Detects dangling references within a snapshot. Loading does not reject
/// them (the storage layer is trusted), but callers can surface these.
pub fn snapshot_warnings(snapshot: &Snapshot) -> Vec<String> {
    let category_ids: std::collections::HashSet<&str> = snapshot
        .categories
        .iter()
        .map(|category| category.id.as_str())
        .collect();
    let mut warnings = Vec::new();
    for expense in &snapshot.expenses {
        if !category_ids.contains(expense.category_id.as_str()) {
            warnings.push(format!(
                "expense {} references unknown category {}",
                expense.id, expense.category_id
            ));
        }
    }
    for budget in &snapshot.category_budgets {
        if !category_ids.contains(budget.category_id.as_str()) {
            warnings.push(format!(
                "budget entry references unknown category {}",
                budget.category_id
            ));
        }
    }
    warnings
}
