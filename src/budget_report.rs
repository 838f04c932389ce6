//! Budget utilization and threshold alerting.
//!
//! The same classification applies at overall and per-category granularity:
//! a zero or unset budget means "no limit configured" and never alerts.

use serde::{Deserialize, Serialize};

use crate::domain::{Budget, Category, Expense};

/// Threshold classification for a utilization percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertLevel {
    Normal,
    Warning,
    Exceeded,
}

impl AlertLevel {
    /// `Exceeded` at 100% and above, `Warning` from 80% up to (excluding)
    /// 100%, `Normal` below.
    pub fn from_utilization(percent: f64) -> Self {
        if percent >= 100.0 {
            AlertLevel::Exceeded
        } else if percent >= 80.0 {
            AlertLevel::Warning
        } else {
            AlertLevel::Normal
        }
    }
}

/// Spend measured against one budget figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    pub budget: f64,
    pub spent: f64,
    /// Unclamped utilization percentage; exceeds 100 to show overage.
    pub percent_used: f64,
    /// Progress-bar value, clamped to 100.
    pub progress: f64,
    pub level: AlertLevel,
    /// Amount above the budget when exceeded, otherwise 0.
    pub overage: f64,
}

impl BudgetUsage {
    pub fn from_parts(budget: f64, spent: f64) -> Self {
        let percent_used = if budget > 0.0 {
            (spent / budget) * 100.0
        } else {
            0.0
        };
        let level = AlertLevel::from_utilization(percent_used);
        let overage = if level == AlertLevel::Exceeded {
            spent - budget
        } else {
            0.0
        };
        Self {
            budget,
            spent,
            percent_used,
            progress: percent_used.min(100.0),
            level,
            overage,
        }
    }
}

/// Utilization for one category that has a configured budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUsage {
    pub category_id: String,
    pub name: String,
    pub usage: BudgetUsage,
}

/// Overall and per-category utilization for the current dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetReport {
    pub overall: BudgetUsage,
    pub categories: Vec<CategoryUsage>,
}

fn spent_in(expenses: &[Expense], category_id: &str) -> f64 {
    expenses
        .iter()
        .filter(|expense| expense.category_id == category_id)
        .map(|expense| expense.amount)
        .sum()
}

/// Evaluates every configured budget against the snapshot. Categories without
/// a positive budget entry are excluded from the report and from alerting.
pub fn evaluate(
    expenses: &[Expense],
    categories: &[Category],
    overall_budget: f64,
    category_budgets: &[Budget],
) -> BudgetReport {
    let total_spent: f64 = expenses.iter().map(|expense| expense.amount).sum();
    let per_category = categories
        .iter()
        .filter_map(|category| {
            let entry = category_budgets
                .iter()
                .find(|budget| budget.category_id == category.id)?;
            if entry.amount <= 0.0 {
                return None;
            }
            Some(CategoryUsage {
                category_id: category.id.clone(),
                name: category.name.clone(),
                usage: BudgetUsage::from_parts(entry.amount, spent_in(expenses, &category.id)),
            })
        })
        .collect();

    BudgetReport {
        overall: BudgetUsage::from_parts(overall_budget, total_spent),
        categories: per_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_categories;
    use chrono::{TimeZone, Utc};

    fn expense(amount: f64, category_id: &str, y: i32, m: u32, d: u32) -> Expense {
        let date = Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        Expense {
            id: format!("{category_id}-{amount}"),
            amount,
            description: "test".into(),
            category_id: category_id.into(),
            date,
            created_at: date,
        }
    }

    #[test]
    fn alert_level_boundaries() {
        assert_eq!(AlertLevel::from_utilization(79.999), AlertLevel::Normal);
        assert_eq!(AlertLevel::from_utilization(80.0), AlertLevel::Warning);
        assert_eq!(AlertLevel::from_utilization(99.999), AlertLevel::Warning);
        assert_eq!(AlertLevel::from_utilization(100.0), AlertLevel::Exceeded);
        assert_eq!(AlertLevel::from_utilization(0.0), AlertLevel::Normal);
        assert_eq!(AlertLevel::from_utilization(150.0), AlertLevel::Exceeded);
    }

    #[test]
    fn exceeded_overall_budget_reports_overage() {
        let categories = default_categories();
        let expenses = vec![
            expense(100.0, "food", 2024, 1, 5),
            expense(50.0, "food", 2024, 2, 10),
        ];
        let report = evaluate(&expenses, &categories, 100.0, &[]);
        assert_eq!(report.overall.percent_used, 150.0);
        assert_eq!(report.overall.level, AlertLevel::Exceeded);
        assert_eq!(report.overall.overage, 50.0);
        assert_eq!(report.overall.progress, 100.0);
    }

    #[test]
    fn zero_budget_means_no_limit() {
        let categories = default_categories();
        let report = evaluate(&[], &categories, 0.0, &[]);
        assert_eq!(report.overall.percent_used, 0.0);
        assert_eq!(report.overall.level, AlertLevel::Normal);
        assert_eq!(report.overall.overage, 0.0);

        // Spend without a budget still never divides by zero.
        let spent = vec![expense(25.0, "food", 2024, 1, 5)];
        let report = evaluate(&spent, &categories, 0.0, &[]);
        assert_eq!(report.overall.percent_used, 0.0);
        assert_eq!(report.overall.level, AlertLevel::Normal);
    }

    #[test]
    fn category_usage_covers_only_budgeted_categories() {
        let categories = default_categories();
        let expenses = vec![
            expense(80.0, "food", 2024, 1, 5),
            expense(10.0, "transport", 2024, 1, 6),
        ];
        let budgets = vec![Budget::new("food", 100.0)];
        let report = evaluate(&expenses, &categories, 0.0, &budgets);
        assert_eq!(report.categories.len(), 1);
        let food = &report.categories[0];
        assert_eq!(food.category_id, "food");
        assert_eq!(food.usage.percent_used, 80.0);
        assert_eq!(food.usage.level, AlertLevel::Warning);
        assert_eq!(food.usage.overage, 0.0);
    }

    #[test]
    fn unclamped_percent_and_clamped_progress_diverge_past_limit() {
        let usage = BudgetUsage::from_parts(40.0, 60.0);
        assert_eq!(usage.percent_used, 150.0);
        assert_eq!(usage.progress, 100.0);
        assert_eq!(usage.overage, 20.0);
    }
}
