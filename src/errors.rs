use thiserror::Error;

/// Unified error type for store mutations, import parsing, and persistence.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Category in use: {0}")]
    CategoryInUse(String),
    #[error("Invalid import: {0}")]
    InvalidImport(String),
    #[error("Persistence error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, ExpenseError>;

impl From<std::io::Error> for ExpenseError {
    fn from(err: std::io::Error) -> Self {
        ExpenseError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ExpenseError {
    fn from(err: serde_json::Error) -> Self {
        ExpenseError::Storage(err.to_string())
    }
}

impl From<csv::Error> for ExpenseError {
    fn from(err: csv::Error) -> Self {
        ExpenseError::Storage(err.to_string())
    }
}
