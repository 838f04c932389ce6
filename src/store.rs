//! The dataset store: single owner of the expense, category, and budget
//! collections.
//!
//! All mutations flow through the store so referential invariants hold at
//! every point an aggregation query can observe. Persistence is best-effort:
//! a failed save is logged and never rolls back the in-memory mutation.

use chrono::{DateTime, Utc};

use crate::analytics::{self, CategoryTotal, ExpenseQuery, MonthlyEntry, TrendPoint};
use crate::budget_report::{self, BudgetReport};
use crate::clock::{Clock, SystemClock};
use crate::domain::{
    default_categories, sanitize_amount, Budget, Category, CategoryInput, Expense, ExpenseInput,
    ExpensePatch, Snapshot,
};
use crate::errors::{ExpenseError, Result};
use crate::export::ExportPayload;
use crate::id::{IdGen, UuidIds};
use crate::storage::{snapshot_warnings, StorageBackend};

/// Callback fired after every successful mutation, receiving the post-mutation
/// dataset. Replaces the original UI's reactive state subscriptions.
pub type Listener = Box<dyn FnMut(&Snapshot) + Send>;

/// Owns the authoritative dataset and serializes every mutation against it.
pub struct ExpenseStore {
    expenses: Vec<Expense>,
    categories: Vec<Category>,
    category_budgets: Vec<Budget>,
    overall_budget: f64,
    ids: Box<dyn IdGen>,
    clock: Box<dyn Clock>,
    backend: Option<Box<dyn StorageBackend>>,
    listeners: Vec<(usize, Listener)>,
    next_listener_id: usize,
}

impl ExpenseStore {
    /// A store seeded with the default categories, random ids, the system
    /// clock, and no persistence.
    pub fn new() -> Self {
        Self::with_parts(Box::new(UuidIds), Box::new(SystemClock), None)
    }

    /// A store that loads its initial state from `backend` and saves back
    /// after every mutation. A failed load degrades to the seeded defaults.
    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        Self::with_parts(Box::new(UuidIds), Box::new(SystemClock), Some(backend))
    }

    /// Full injection point for id generation, time, and persistence.
    pub fn with_parts(
        ids: Box<dyn IdGen>,
        clock: Box<dyn Clock>,
        backend: Option<Box<dyn StorageBackend>>,
    ) -> Self {
        let initial = match backend.as_ref().map(|b| b.load()) {
            Some(Ok(snapshot)) => {
                for warning in snapshot_warnings(&snapshot) {
                    tracing::warn!("loaded dataset has a dangling reference: {warning}");
                }
                snapshot
            }
            Some(Err(err)) => {
                tracing::warn!("failed to load persisted dataset, starting fresh: {err}");
                Snapshot {
                    categories: default_categories(),
                    ..Snapshot::default()
                }
            }
            None => Snapshot {
                categories: default_categories(),
                ..Snapshot::default()
            },
        };
        Self {
            expenses: initial.expenses,
            categories: initial.categories,
            category_budgets: initial.category_budgets,
            overall_budget: initial.overall_budget,
            ids,
            clock,
            backend,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_budgets(&self) -> &[Budget] {
        &self.category_budgets
    }

    pub fn overall_budget(&self) -> f64 {
        self.overall_budget
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn expense(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    /// A full copy of the current dataset.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            expenses: self.expenses.clone(),
            categories: self.categories.clone(),
            category_budgets: self.category_budgets.clone(),
            overall_budget: self.overall_budget,
        }
    }

    /// Constructs and prepends a new expense, returning its id. Rejects an
    /// unknown category with `InvalidReference` before touching state.
    pub fn add_expense(&mut self, input: ExpenseInput) -> Result<String> {
        if self.category(&input.category_id).is_none() {
            return Err(ExpenseError::InvalidReference(input.category_id));
        }
        let expense = Expense::create(input, self.ids.as_mut(), self.clock.as_ref());
        let id = expense.id.clone();
        self.expenses.insert(0, expense);
        self.after_mutation();
        Ok(id)
    }

    /// Merges `patch` into the expense with `id`, preserving its identity
    /// fields. A patch that retargets an unknown category is rejected whole.
    pub fn update_expense(&mut self, id: &str, patch: ExpensePatch) -> Result<()> {
        if let Some(category_id) = patch.category_id.as_deref() {
            if self.category(category_id).is_none() {
                return Err(ExpenseError::InvalidReference(category_id.to_string()));
            }
        }
        let expense = self
            .expenses
            .iter_mut()
            .find(|expense| expense.id == id)
            .ok_or_else(|| ExpenseError::NotFound(format!("expense {id}")))?;
        expense.apply(patch);
        self.after_mutation();
        Ok(())
    }

    pub fn delete_expense(&mut self, id: &str) -> Result<()> {
        let index = self
            .expenses
            .iter()
            .position(|expense| expense.id == id)
            .ok_or_else(|| ExpenseError::NotFound(format!("expense {id}")))?;
        self.expenses.remove(index);
        self.after_mutation();
        Ok(())
    }

    /// Adds a category with a fresh id. Never fails.
    pub fn add_category(&mut self, input: CategoryInput) -> String {
        let category = Category::create(input, self.ids.as_mut());
        let id = category.id.clone();
        self.categories.push(category);
        self.after_mutation();
        id
    }

    /// Removes a category nothing references, along with any budget entry
    /// keyed to it. A category still referenced by an expense stays put.
    pub fn delete_category(&mut self, id: &str) -> Result<()> {
        if self.category(id).is_none() {
            return Err(ExpenseError::NotFound(format!("category {id}")));
        }
        if self.expenses.iter().any(|expense| expense.category_id == id) {
            return Err(ExpenseError::CategoryInUse(id.to_string()));
        }
        self.categories.retain(|category| category.id != id);
        self.category_budgets.retain(|budget| budget.category_id != id);
        self.after_mutation();
        Ok(())
    }

    /// Atomically replaces the overall budget and the whole category budget
    /// set. Entries without a positive finite amount are dropped; the first
    /// entry wins when a category appears twice.
    pub fn replace_budgets(&mut self, overall: f64, budgets: Vec<Budget>) {
        self.overall_budget = sanitize_amount(overall);
        self.category_budgets = normalize_budgets(budgets);
        self.after_mutation();
    }

    /// Wholesale state replacement. Validates the incoming snapshot first and
    /// leaves current state untouched when it is rejected.
    pub fn import_snapshot(&mut self, snapshot: Snapshot) -> Result<()> {
        for expense in &snapshot.expenses {
            if !snapshot
                .categories
                .iter()
                .any(|category| category.id == expense.category_id)
            {
                return Err(ExpenseError::InvalidImport(format!(
                    "expense {} references unknown category {}",
                    expense.id, expense.category_id
                )));
            }
        }
        self.expenses = snapshot.expenses;
        self.categories = snapshot.categories;
        self.category_budgets = normalize_budgets(snapshot.category_budgets);
        self.overall_budget = sanitize_amount(snapshot.overall_budget);
        self.after_mutation();
        Ok(())
    }

    /// An immutable copy of the dataset stamped with the current time.
    pub fn export_snapshot(&self) -> ExportPayload {
        ExportPayload::from_snapshot(self.snapshot(), self.clock.now())
    }

    /// Registers a mutation listener and returns its handle.
    pub fn subscribe(&mut self, listener: Listener) -> usize {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: usize) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    // Derived views, recomputed from current state on every call.

    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        analytics::category_totals(&self.expenses, &self.categories)
    }

    pub fn monthly_series(&self) -> Vec<MonthlyEntry> {
        analytics::monthly_series(&self.expenses, &self.categories, self.clock.now())
    }

    pub fn monthly_series_at(&self, now: DateTime<Utc>) -> Vec<MonthlyEntry> {
        analytics::monthly_series(&self.expenses, &self.categories, now)
    }

    pub fn cumulative_trend(&self) -> Vec<TrendPoint> {
        analytics::cumulative_trend(&self.expenses)
    }

    pub fn top_category(&self) -> Option<CategoryTotal> {
        analytics::top_category(&self.expenses, &self.categories)
    }

    pub fn budget_report(&self) -> BudgetReport {
        budget_report::evaluate(
            &self.expenses,
            &self.categories,
            self.overall_budget,
            &self.category_budgets,
        )
    }

    pub fn list_expenses(&self, query: &ExpenseQuery) -> Vec<&Expense> {
        analytics::filter_expenses(&self.expenses, query)
    }

    fn after_mutation(&mut self) {
        let snapshot = self.snapshot();
        if let Some(backend) = &self.backend {
            if let Err(err) = backend.save(&snapshot) {
                tracing::warn!("failed to persist dataset after mutation: {err}");
            }
        }
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}

impl Default for ExpenseStore {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_budgets(budgets: Vec<Budget>) -> Vec<Budget> {
    let mut seen: Vec<String> = Vec::new();
    budgets
        .into_iter()
        .filter(|budget| budget.amount.is_finite() && budget.amount > 0.0)
        .filter(|budget| {
            if seen.iter().any(|id| *id == budget.category_id) {
                false
            } else {
                seen.push(budget.category_id.clone());
                true
            }
        })
        .collect()
}
