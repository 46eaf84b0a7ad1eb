//! Item domain model.
//!
//! # Responsibility
//! - Define the single persisted record shown in the list view.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `id` values are never reused, even after the row is deleted.

use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
///
/// Strictly increasing over the lifetime of one database file.
pub type ItemId = i64;

/// One user-entered text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Raw user input. Empty text is allowed.
    pub text: String,
}

impl Item {
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Item;

    #[test]
    fn serializes_with_flat_id_and_text_fields() {
        let item = Item::new(7, "buy milk");
        let json = serde_json::to_value(&item).expect("item should serialize");
        assert_eq!(json, serde_json::json!({ "id": 7, "text": "buy milk" }));
    }
}
