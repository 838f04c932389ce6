//! File export and import: the JSON interchange payload and the CSV report.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Budget, Category, Expense, Snapshot};
use crate::errors::{ExpenseError, Result};

/// The JSON interchange shape. `expenses` and `categories` are mandatory on
/// import; budgets default to empty/zero when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub expenses: Vec<Expense>,
    pub categories: Vec<Category>,
    #[serde(default)]
    pub category_budgets: Vec<Budget>,
    #[serde(default)]
    pub overall_budget: f64,
    #[serde(default)]
    pub export_date: Option<DateTime<Utc>>,
}

impl ExportPayload {
    pub fn from_snapshot(snapshot: Snapshot, export_date: DateTime<Utc>) -> Self {
        Self {
            expenses: snapshot.expenses,
            categories: snapshot.categories,
            category_budgets: snapshot.category_budgets,
            overall_budget: snapshot.overall_budget,
            export_date: Some(export_date),
        }
    }

    pub fn into_snapshot(self) -> Snapshot {
        Snapshot {
            expenses: self.expenses,
            categories: self.categories,
            category_budgets: self.category_budgets,
            overall_budget: self.overall_budget,
        }
    }
}

/// Pretty-prints the payload for download.
pub fn to_json(payload: &ExportPayload) -> Result<String> {
    Ok(serde_json::to_string_pretty(payload)?)
}

/// Parses an import payload. Anything that does not match the export shape
/// (missing or non-sequence `expenses`/`categories`, malformed records) is an
/// `InvalidImport`.
pub fn from_json(data: &str) -> Result<ExportPayload> {
    serde_json::from_str(data).map_err(|err| ExpenseError::InvalidImport(err.to_string()))
}

/// Renders the expense table as CSV with a `Date,Description,Category,Amount`
/// header. Category ids resolve to names, falling back to `"Unknown"` for
/// records whose category no longer exists.
pub fn to_csv(expenses: &[Expense], categories: &[Category]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Date", "Description", "Category", "Amount"])?;
    for expense in expenses {
        let category = categories
            .iter()
            .find(|category| category.id == expense.category_id)
            .map(|category| category.name.as_str())
            .unwrap_or("Unknown");
        writer.write_record([
            expense.date.date_naive().format("%Y-%m-%d").to_string(),
            expense.description.clone(),
            category.to_string(),
            format!("{:.2}", expense.amount),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| ExpenseError::Storage(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ExpenseError::Storage(err.to_string()))
}

/// Download file name for an export, e.g. `expenses-2024-03-01.json`.
pub fn export_file_name(date: NaiveDate, extension: &str) -> String {
    format!("expenses-{}.{}", date.format("%Y-%m-%d"), extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_categories;
    use chrono::TimeZone;

    fn expense(id: &str, amount: f64, category_id: &str, description: &str) -> Expense {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        Expense {
            id: id.into(),
            amount,
            description: description.into(),
            category_id: category_id.into(),
            date,
            created_at: date,
        }
    }

    fn payload() -> ExportPayload {
        ExportPayload {
            expenses: vec![expense("a", 12.5, "food", "Groceries")],
            categories: default_categories(),
            category_budgets: vec![Budget::new("food", 200.0)],
            overall_budget: 500.0,
            export_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn json_round_trip_preserves_the_payload() {
        let original = payload();
        let json = to_json(&original).unwrap();
        assert!(json.contains("\"exportDate\""));
        assert!(json.contains("\"overallBudget\""));
        let parsed = from_json(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn import_rejects_missing_or_malformed_collections() {
        let missing_categories = r#"{"expenses": []}"#;
        assert!(matches!(
            from_json(missing_categories),
            Err(ExpenseError::InvalidImport(_))
        ));

        let not_a_sequence = r#"{"expenses": {}, "categories": []}"#;
        assert!(matches!(
            from_json(not_a_sequence),
            Err(ExpenseError::InvalidImport(_))
        ));
    }

    #[test]
    fn import_defaults_budgets_when_absent() {
        let minimal = r#"{"expenses": [], "categories": []}"#;
        let parsed = from_json(minimal).unwrap();
        assert!(parsed.category_budgets.is_empty());
        assert_eq!(parsed.overall_budget, 0.0);
        assert!(parsed.export_date.is_none());
    }

    #[test]
    fn csv_lists_one_row_per_expense() {
        let categories = default_categories();
        let expenses = vec![
            expense("a", 12.5, "food", "Groceries"),
            expense("b", 30.0, "ghost", "Orphaned"),
        ];
        let csv = to_csv(&expenses, &categories).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Date,Description,Category,Amount"));
        assert_eq!(lines.next(), Some("2024-01-05,Groceries,Food & Dining,12.50"));
        assert_eq!(lines.next(), Some("2024-01-05,Orphaned,Unknown,30.00"));
    }

    #[test]
    fn csv_quotes_embedded_commas() {
        let categories = default_categories();
        let expenses = vec![expense("a", 5.0, "food", "Coffee, beans, filters")];
        let csv = to_csv(&expenses, &categories).unwrap();
        assert!(csv.contains("\"Coffee, beans, filters\""));
    }

    #[test]
    fn file_name_embeds_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(export_file_name(date, "json"), "expenses-2024-03-01.json");
        assert_eq!(export_file_name(date, "csv"), "expenses-2024-03-01.csv");
    }
}
