//! File-backed storage mapping each persisted key to one JSON document under
//! an application data directory.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::domain::{default_categories, sanitize_amount, Budget, Category, Expense, Snapshot};
use crate::errors::{ExpenseError, Result};
use crate::storage::StorageBackend;

const EXPENSES_FILE: &str = "expenses.json";
const CATEGORIES_FILE: &str = "categories.json";
const OVERALL_BUDGET_FILE: &str = "overallBudget.json";
const CATEGORY_BUDGETS_FILE: &str = "categoryBudgets.json";

const HOME_ENV: &str = "EXPENZA_HOME";
const DEFAULT_DIR_NAME: &str = ".expenza_core";

/// Returns the application data directory, defaulting to `~/.expenza_core`.
fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Writes a document atomically by staging to a temporary file.
fn write_atomic(path: &Path, data: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Stores the dataset as four independent documents, one per persisted key.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    fn read_key(&self, file: &str) -> Result<Option<String>> {
        let path = self.root.join(file);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write_key(&self, file: &str, data: &str) -> Result<()> {
        write_atomic(&self.root.join(file), data)
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Snapshot> {
        let expenses: Vec<Expense> = match self.read_key(EXPENSES_FILE)? {
            Some(data) => serde_json::from_str(&data)?,
            None => Vec::new(),
        };
        let categories: Vec<Category> = match self.read_key(CATEGORIES_FILE)? {
            Some(data) => serde_json::from_str(&data)?,
            None => default_categories(),
        };
        let overall_budget = match self.read_key(OVERALL_BUDGET_FILE)? {
            Some(data) => sanitize_amount(data.trim().parse::<f64>().map_err(|err| {
                ExpenseError::Storage(format!("invalid overall budget value: {err}"))
            })?),
            None => 0.0,
        };
        let category_budgets: Vec<Budget> = match self.read_key(CATEGORY_BUDGETS_FILE)? {
            Some(data) => serde_json::from_str(&data)?,
            None => Vec::new(),
        };
        Ok(Snapshot {
            expenses,
            categories,
            category_budgets,
            overall_budget,
        })
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.write_key(EXPENSES_FILE, &serde_json::to_string(&snapshot.expenses)?)?;
        self.write_key(CATEGORIES_FILE, &serde_json::to_string(&snapshot.categories)?)?;
        self.write_key(
            OVERALL_BUDGET_FILE,
            &serde_json::to_string(&snapshot.overall_budget)?,
        )?;
        self.write_key(
            CATEGORY_BUDGETS_FILE,
            &serde_json::to_string(&snapshot.category_budgets)?,
        )?;
        Ok(())
    }
}
