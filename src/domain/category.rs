//! Spending categories and the seeded default set.

use serde::{Deserialize, Serialize};

use crate::id::IdGen;

/// Categorises expenses for aggregation and budgeting. `color` and `icon`
/// are display tokens carried through the aggregates for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
}

/// Caller-supplied fields for a new category; the store assigns the id.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl Category {
    pub fn create(input: CategoryInput, ids: &mut dyn IdGen) -> Self {
        Self {
            id: ids.next_id(),
            name: input.name,
            color: input.color,
            icon: input.icon,
        }
    }
}

/// The eight categories seeded into a fresh dataset.
pub fn default_categories() -> Vec<Category> {
    [
        ("food", "Food & Dining", "#ef4444", "\u{1f354}"),
        ("transport", "Transportation", "#3b82f6", "\u{1f697}"),
        ("shopping", "Shopping", "#ec4899", "\u{1f6cd}\u{fe0f}"),
        ("entertainment", "Entertainment", "#8b5cf6", "\u{1f3ac}"),
        ("bills", "Bills & Utilities", "#f59e0b", "\u{1f4c4}"),
        ("healthcare", "Healthcare", "#10b981", "\u{2695}\u{fe0f}"),
        ("education", "Education", "#06b6d4", "\u{1f4da}"),
        ("other", "Other", "#6b7280", "\u{1f4bc}"),
    ]
    .into_iter()
    .map(|(id, name, color, icon)| Category {
        id: id.into(),
        name: name.into(),
        color: color.into(),
        icon: icon.into(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialIds;

    #[test]
    fn create_assigns_fresh_id() {
        let mut ids = SequentialIds::new("cat");
        let category = Category::create(
            CategoryInput {
                name: "Pets".into(),
                color: "#22c55e".into(),
                icon: "\u{1f436}".into(),
            },
            &mut ids,
        );
        assert_eq!(category.id, "cat-1");
        assert_eq!(category.name, "Pets");
    }

    #[test]
    fn default_set_has_eight_unique_ids() {
        let defaults = default_categories();
        assert_eq!(defaults.len(), 8);
        let mut ids: Vec<_> = defaults.iter().map(|c| c.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(defaults[0].id, "food");
        assert_eq!(defaults[7].name, "Other");
    }
}
