//! Core data layer for QuickList.
//! Owns the item store, the list refresh contract and push-on-create.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use db::{PersistenceError, SchemaError, Store};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{Item, ItemId};
pub use notify::{
    DeviceToken, HostPushPlatform, NoopNotificationGateway, NotificationError,
    NotificationGateway, PermissionStatus, PushPlatform, RelayConfig, RelayNotificationGateway,
};
pub use repo::item_repo::{ItemRepository, RepoResult, SqliteItemRepository};
pub use service::item_service::ItemService;

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
