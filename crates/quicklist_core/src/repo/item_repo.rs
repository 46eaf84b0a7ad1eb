//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide typed CRUD over the `items` table.
//! - Keep SQL text inside the persistence boundary.
//!
//! # Invariants
//! - Every write runs as one committed transaction on the shared `Store`.
//! - A NULL `text` column reads back as empty text; one odd row never
//!   fails the whole list.

use crate::db::{Store, StoreResult};
use crate::model::item::{Item, ItemId};
use log::warn;
use rusqlite::{params, Row};

const ITEM_SELECT_SQL: &str = "SELECT id, text FROM items";

pub type RepoResult<T> = StoreResult<T>;

/// Data access interface for items.
pub trait ItemRepository {
    /// Inserts a row and returns its store-assigned id.
    fn create_item(&self, text: &str) -> RepoResult<ItemId>;
    /// Replaces the text of `id`. Returns rows affected (0 when absent).
    fn update_item(&self, id: ItemId, text: &str) -> RepoResult<usize>;
    /// Removes `id`. Returns rows affected (0 when absent).
    fn delete_item(&self, id: ItemId) -> RepoResult<usize>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// Full-table scan in store-native order.
    fn list_items(&self) -> RepoResult<Vec<Item>>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'store> {
    store: &'store Store,
}

impl<'store> SqliteItemRepository<'store> {
    pub fn new(store: &'store Store) -> Self {
        Self { store }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, text: &str) -> RepoResult<ItemId> {
        self.store.with_transaction(|tx| {
            tx.execute("INSERT INTO items (text) VALUES (?1);", [text])?;
            Ok(tx.last_insert_rowid())
        })
    }

    fn update_item(&self, id: ItemId, text: &str) -> RepoResult<usize> {
        self.store
            .execute("UPDATE items SET text = ?1 WHERE id = ?2;", params![text, id])
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<usize> {
        self.store.execute("DELETE FROM items WHERE id = ?1;", [id])
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut found = self.store.query(
            &format!("{ITEM_SELECT_SQL} WHERE id = ?1;"),
            [id],
            parse_item_row,
        )?;
        Ok(found.pop())
    }

    fn list_items(&self) -> RepoResult<Vec<Item>> {
        self.store.query(&format!("{ITEM_SELECT_SQL};"), [], parse_item_row)
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id: ItemId = row.get("id")?;
    let text = match row.get::<_, Option<String>>("text")? {
        Some(text) => text,
        None => {
            warn!("event=item_read module=repo status=ok item_id={id} text=null");
            String::new()
        }
    };
    Ok(Item { id, text })
}
