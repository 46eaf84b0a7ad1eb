//! Item use-case service.
//!
//! # Responsibility
//! - Expose create/update/delete/list for the list view.
//! - Re-read the full list after every successful mutation.
//! - Fire the creation notification without waiting on it.
//!
//! # Invariants
//! - The refresh read is issued only after the mutation has committed.
//! - A failed mutation returns `PersistenceError` with no refresh and no
//!   notification.
//! - Update/delete of a missing id is a silent success.
//! - Gateway outcomes never change the result of a service call.

use crate::model::item::{Item, ItemId};
use crate::notify::NotificationGateway;
use crate::repo::item_repo::{ItemRepository, RepoResult};
use log::{debug, error, info};

/// Use-case service over an item repository and a notification gateway.
pub struct ItemService<R: ItemRepository, G: NotificationGateway> {
    repo: R,
    gateway: G,
}

impl<R: ItemRepository, G: NotificationGateway> ItemService<R, G> {
    pub fn new(repo: R, gateway: G) -> Self {
        Self { repo, gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Inserts `text` and returns the refreshed list.
    ///
    /// # Side effects
    /// - On success, hands `text` to `NotificationGateway::notify_created`.
    pub fn create(&self, text: &str) -> RepoResult<Vec<Item>> {
        let id = self
            .repo
            .create_item(text)
            .inspect_err(|err| log_failure("item_create", None, err))?;
        info!(
            "event=item_create module=service status=ok item_id={id} text_len={}",
            text.len()
        );

        self.gateway.notify_created(text);
        self.refresh()
    }

    /// Replaces the text of `id` and returns the refreshed list.
    pub fn update(&self, id: ItemId, text: &str) -> RepoResult<Vec<Item>> {
        let rows = self
            .repo
            .update_item(id, text)
            .inspect_err(|err| log_failure("item_update", Some(id), err))?;
        if rows == 0 {
            debug!("event=item_update module=service status=ok item_id={id} rows=0");
        } else {
            info!(
                "event=item_update module=service status=ok item_id={id} rows={rows} text_len={}",
                text.len()
            );
        }

        self.refresh()
    }

    /// Removes `id` and returns the refreshed list.
    pub fn delete(&self, id: ItemId) -> RepoResult<Vec<Item>> {
        let rows = self
            .repo
            .delete_item(id)
            .inspect_err(|err| log_failure("item_delete", Some(id), err))?;
        if rows == 0 {
            debug!("event=item_delete module=service status=ok item_id={id} rows=0");
        } else {
            info!("event=item_delete module=service status=ok item_id={id} rows={rows}");
        }

        self.refresh()
    }

    /// Add-or-update entry point for a single input field.
    ///
    /// Updates `selected` when set, otherwise creates a new item.
    pub fn save(&self, selected: Option<ItemId>, text: &str) -> RepoResult<Vec<Item>> {
        match selected {
            Some(id) => self.update(id, text),
            None => self.create(text),
        }
    }

    /// Returns every stored item in store-native order.
    pub fn list(&self) -> RepoResult<Vec<Item>> {
        self.repo.list_items()
    }

    fn refresh(&self) -> RepoResult<Vec<Item>> {
        self.repo
            .list_items()
            .inspect_err(|err| log_failure("item_refresh", None, err))
    }
}

fn log_failure(event: &str, id: Option<ItemId>, err: &dyn std::error::Error) {
    match id {
        Some(id) => error!(
            "event={event} module=service status=error item_id={id} error={err}"
        ),
        None => error!("event={event} module=service status=error error={err}"),
    }
}
