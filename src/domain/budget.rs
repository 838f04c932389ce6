//! Budget entries keyed by category.

use serde::{Deserialize, Serialize};

/// A spending limit for one category. At most one entry per category exists
/// in the configured set; a stored entry always carries a positive amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub category_id: String,
    pub amount: f64,
}

impl Budget {
    pub fn new(category_id: impl Into<String>, amount: f64) -> Self {
        Self {
            category_id: category_id.into(),
            amount,
        }
    }
}
