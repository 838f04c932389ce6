use expenza_core::{
    clock::FixedClock,
    domain::{default_categories, Budget, ExpenseInput, Snapshot},
    id::SequentialIds,
    storage::{JsonStorage, StorageBackend},
    store::ExpenseStore,
    ExpenseError,
};
use chrono::{TimeZone, Utc};
use std::fs;
use tempfile::tempdir;

fn fixed_store(backend: Option<Box<dyn StorageBackend>>) -> ExpenseStore {
    ExpenseStore::with_parts(
        Box::new(SequentialIds::new("id")),
        Box::new(FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())),
        backend,
    )
}

fn lunch() -> ExpenseInput {
    ExpenseInput {
        amount: 18.5,
        description: "Lunch".into(),
        category_id: "food".into(),
        date: Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap(),
    }
}

#[test]
fn fresh_backend_yields_seeded_defaults() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();

    let snapshot = storage.load().expect("load from empty directory");
    assert!(snapshot.expenses.is_empty());
    assert_eq!(snapshot.categories, default_categories());
    assert_eq!(snapshot.overall_budget, 0.0);
    assert!(snapshot.category_budgets.is_empty());
}

#[test]
fn save_writes_one_document_per_key() {
    let temp = tempdir().unwrap();
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();

    let mut store = fixed_store(Some(Box::new(storage)));
    store.add_expense(lunch()).unwrap();
    store.replace_budgets(400.0, vec![Budget::new("food", 150.0)]);

    for file in [
        "expenses.json",
        "categories.json",
        "overallBudget.json",
        "categoryBudgets.json",
    ] {
        assert!(temp.path().join(file).exists(), "missing {file}");
    }

    let budget = fs::read_to_string(temp.path().join("overallBudget.json")).unwrap();
    assert_eq!(budget.trim(), "400.0");
    let expenses = fs::read_to_string(temp.path().join("expenses.json")).unwrap();
    assert!(expenses.contains("\"categoryId\":\"food\""));
}

#[test]
fn store_round_trips_through_the_backend() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_path_buf();

    let mut store = fixed_store(Some(Box::new(JsonStorage::new(Some(root.clone())).unwrap())));
    store.add_expense(lunch()).unwrap();
    store.replace_budgets(400.0, vec![Budget::new("food", 150.0)]);
    let before = store.snapshot();

    let reloaded = fixed_store(Some(Box::new(JsonStorage::new(Some(root)).unwrap())));
    assert_eq!(reloaded.snapshot(), before);
}

#[test]
fn corrupt_document_fails_load_and_store_degrades_to_defaults() {
    let temp = tempdir().unwrap();
    let root = temp.path().to_path_buf();
    fs::write(root.join("expenses.json"), "not json").unwrap();

    let storage = JsonStorage::new(Some(root.clone())).unwrap();
    assert!(matches!(storage.load(), Err(ExpenseError::Storage(_))));

    let store = fixed_store(Some(Box::new(JsonStorage::new(Some(root)).unwrap())));
    assert!(store.expenses().is_empty());
    assert_eq!(store.categories(), default_categories().as_slice());
}

struct FailingBackend;

impl StorageBackend for FailingBackend {
    fn load(&self) -> expenza_core::Result<Snapshot> {
        Ok(Snapshot {
            categories: default_categories(),
            ..Snapshot::default()
        })
    }

    fn save(&self, _snapshot: &Snapshot) -> expenza_core::Result<()> {
        Err(ExpenseError::Storage("disk full".into()))
    }
}

#[test]
fn failed_save_never_rolls_back_the_mutation() {
    let mut store = fixed_store(Some(Box::new(FailingBackend)));
    let id = store.add_expense(lunch()).expect("mutation succeeds");
    assert_eq!(store.expenses().len(), 1);
    assert_eq!(store.expenses()[0].id, id);
}
