//! Pure aggregation queries over a dataset snapshot.
//!
//! Every function here is a deterministic function of its inputs: identical
//! snapshots yield identical output, and nothing is cached between calls.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{Category, Expense};

/// Number of calendar months covered by the monthly series, current month
/// included.
pub const MONTHLY_WINDOW: usize = 6;

/// Aggregated spend for one category, carrying the display tokens so
/// consumers can render the slice without a second lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub total: f64,
}

/// Per-category amount inside a single month of the series. Zero amounts are
/// kept so every month lists every category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAmount {
    pub category_id: String,
    pub name: String,
    pub total: f64,
}

/// One calendar month of the trailing series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEntry {
    /// First day of the month.
    pub month: NaiveDate,
    /// Display label, e.g. `"Jan 2024"`.
    pub label: String,
    /// Total of all expenses dated within the month, inclusive bounds.
    pub total: f64,
    pub by_category: Vec<CategoryAmount>,
}

/// One point of the cumulative spending curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    /// Display label, e.g. `"Jan 05"`.
    pub label: String,
    pub running_total: f64,
}

fn sums_by_category<'a, I>(expenses: I) -> HashMap<&'a str, f64>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for expense in expenses {
        *sums.entry(expense.category_id.as_str()).or_insert(0.0) += expense.amount;
    }
    sums
}

/// Sums expenses per category, dropping categories without positive spend.
/// Sorted descending by total; ties keep category input order.
pub fn category_totals(expenses: &[Expense], categories: &[Category]) -> Vec<CategoryTotal> {
    let sums = sums_by_category(expenses);
    let mut totals: Vec<CategoryTotal> = categories
        .iter()
        .map(|category| CategoryTotal {
            category_id: category.id.clone(),
            name: category.name.clone(),
            color: category.color.clone(),
            icon: category.icon.clone(),
            total: sums.get(category.id.as_str()).copied().unwrap_or(0.0),
        })
        .filter(|entry| entry.total > 0.0)
        .collect();
    // Vec::sort_by is stable, so equal totals retain category input order.
    totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    totals
}

fn in_month(expense: &Expense, month: NaiveDate) -> bool {
    let date = expense.date.date_naive();
    date.year() == month.year() && date.month() == month.month()
}

/// Builds the trailing six-month series ending with the month containing
/// `now`, in chronological order. Months without expenses still appear with
/// all amounts at zero.
pub fn monthly_series(
    expenses: &[Expense],
    categories: &[Category],
    now: DateTime<Utc>,
) -> Vec<MonthlyEntry> {
    let today = now.date_naive();
    let current_month = today.with_day(1).unwrap_or(today);

    (0..MONTHLY_WINDOW)
        .rev()
        .map(|offset| {
            let month = current_month
                .checked_sub_months(Months::new(offset as u32))
                .unwrap_or(current_month);
            let in_window: Vec<&Expense> =
                expenses.iter().filter(|e| in_month(e, month)).collect();
            let total = in_window.iter().map(|e| e.amount).sum();
            let sums = sums_by_category(in_window.iter().copied());
            let by_category = categories
                .iter()
                .map(|category| CategoryAmount {
                    category_id: category.id.clone(),
                    name: category.name.clone(),
                    total: sums.get(category.id.as_str()).copied().unwrap_or(0.0),
                })
                .collect();
            MonthlyEntry {
                month,
                label: month.format("%b %Y").to_string(),
                total,
                by_category,
            }
        })
        .collect()
}

/// Sorts expenses by date ascending (stable, so ties keep collection order)
/// and emits one point per expense carrying the prefix sum of amounts.
pub fn cumulative_trend(expenses: &[Expense]) -> Vec<TrendPoint> {
    let mut ordered: Vec<&Expense> = expenses.iter().collect();
    ordered.sort_by_key(|expense| expense.date);

    let mut running_total = 0.0;
    ordered
        .into_iter()
        .map(|expense| {
            running_total += expense.amount;
            TrendPoint {
                date: expense.date,
                label: expense.date.format("%b %d").to_string(),
                running_total,
            }
        })
        .collect()
}

/// The category with the highest positive spend, or `None` when no category
/// has spend. Ties resolve to the category appearing first in input order.
pub fn top_category(expenses: &[Expense], categories: &[Category]) -> Option<CategoryTotal> {
    category_totals(expenses, categories).into_iter().next()
}

/// Sortable fields of the expense list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Description,
}

/// List sort direction; the list view defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Search/sort parameters for the expense list view.
#[derive(Debug, Clone, Default)]
pub struct ExpenseQuery {
    /// Case-insensitive substring match on the description.
    pub search: Option<String>,
    /// Restrict to one category.
    pub category_id: Option<String>,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

/// Filters and sorts expenses for display without copying the records.
pub fn filter_expenses<'a>(expenses: &'a [Expense], query: &ExpenseQuery) -> Vec<&'a Expense> {
    let needle = query.search.as_deref().map(str::to_lowercase);
    let mut matches: Vec<&Expense> = expenses
        .iter()
        .filter(|expense| {
            needle
                .as_deref()
                .map_or(true, |term| expense.description.to_lowercase().contains(term))
        })
        .filter(|expense| {
            query
                .category_id
                .as_deref()
                .map_or(true, |id| expense.category_id == id)
        })
        .collect();

    matches.sort_by(|a, b| {
        let ordering = match query.sort_field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a
                .amount
                .partial_cmp(&b.amount)
                .unwrap_or(std::cmp::Ordering::Equal),
            SortField::Description => a.description.cmp(&b.description),
        };
        match query.sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    matches
}
