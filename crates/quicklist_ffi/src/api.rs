//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list/save/delete and device registration to Dart via FRB.
//! - Hold the process-wide store handle and notification gateway.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - The store is opened once per process and reused by every call.
//! - The gateway is installed only after a successful registration, so
//!   creates before that never attempt delivery.

use log::warn;
use once_cell::sync::OnceCell;
use quicklist_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CoreConfig, HostPushPlatform, Item, ItemService, NoopNotificationGateway, NotificationGateway,
    PermissionStatus, RelayConfig, RelayNotificationGateway, RepoResult, SqliteItemRepository,
    Store,
};
use std::path::PathBuf;
use std::sync::Arc;

static SESSION: OnceCell<Session> = OnceCell::new();

struct Session {
    db_path: PathBuf,
    store: Store,
    relay: RelayConfig,
    gateway: OnceCell<Arc<dyn NotificationGateway>>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One list row as rendered by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: i64,
    pub text: String,
}

/// Response envelope for every item call.
///
/// # FFI contract
/// - `ok == true`: `items` is the full refreshed list to render.
/// - `ok == false`: `items` is empty and carries no list state; hosts keep
///   rendering their previous list and show `message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemsResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Refreshed list on success; not a list snapshot on failure.
    pub items: Vec<ItemView>,
    /// Human-readable message for diagnostics.
    pub message: String,
}

impl ItemsResponse {
    fn from_result(operation: &str, result: Result<Vec<Item>, String>) -> Self {
        match result {
            Ok(items) => Self {
                ok: true,
                message: format!("{} item(s).", items.len()),
                items: items.into_iter().map(to_item_view).collect(),
            },
            Err(err) => Self {
                ok: false,
                items: Vec::new(),
                message: format!("{operation} failed: {err}"),
            },
        }
    }
}

/// Opens the item store and returns the current list.
///
/// `db_path` overrides `QUICKLIST_DB_PATH` and the temp-dir default.
///
/// # FFI contract
/// - Sync call; creates the database file and table on first use.
/// - Repeating with the same path (or `None`) returns the current list.
/// - A different path after initialization is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn items_init(db_path: Option<String>) -> ItemsResponse {
    let requested = db_path
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from);

    let result = open_session(requested.clone()).and_then(|session| {
        if let Some(path) = requested {
            if path != session.db_path {
                return Err(format!(
                    "store already open at `{}`; refusing to switch to `{}`",
                    session.db_path.display(),
                    path.display()
                ));
            }
        }
        with_item_service(|service| service.list())
    });
    ItemsResponse::from_result("items_init", result)
}

/// Returns every stored item.
#[flutter_rust_bridge::frb(sync)]
pub fn items_list() -> ItemsResponse {
    ItemsResponse::from_result("items_list", with_item_service(|service| service.list()))
}

/// Add-or-update from the single input field.
///
/// # FFI contract
/// - `selected_id = None` creates an item and may post a push notification.
/// - `selected_id = Some(id)` updates that item; a missing id is not an error.
/// - Returns the refreshed list.
#[flutter_rust_bridge::frb(sync)]
pub fn items_save(selected_id: Option<i64>, text: String) -> ItemsResponse {
    ItemsResponse::from_result(
        "items_save",
        with_item_service(|service| service.save(selected_id, &text)),
    )
}

/// Deletes one item; a missing id is not an error.
#[flutter_rust_bridge::frb(sync)]
pub fn items_delete(id: i64) -> ItemsResponse {
    ItemsResponse::from_result("items_delete", with_item_service(|service| service.delete(id)))
}

/// Registers this installation for push delivery.
///
/// The Dart side performs the device check, permission prompt and token
/// request, then passes the facts here.
///
/// # FFI contract
/// - Returns the session token, or `None` on simulators, denied permission,
///   missing token or store failure.
/// - After the first success, later calls return the cached token.
#[flutter_rust_bridge::frb(sync)]
pub fn register_device(
    is_physical_device: bool,
    permission: String,
    push_token: Option<String>,
) -> Option<String> {
    let session = match open_session(None) {
        Ok(session) => session,
        Err(err) => {
            warn!("event=device_register module=ffi status=error error={err}");
            return None;
        }
    };
    if let Some(gateway) = session.gateway.get() {
        return gateway.device_token().map(|token| token.as_str().to_string());
    }

    let platform = HostPushPlatform {
        is_physical_device,
        permission: PermissionStatus::parse(&permission),
        push_token,
    };
    let gateway = match RelayNotificationGateway::new(platform, session.relay.clone()) {
        Ok(gateway) => gateway,
        Err(err) => {
            warn!("event=device_register module=ffi status=error error={err}");
            return None;
        }
    };
    let token = gateway.register_device()?;
    let gateway: Arc<dyn NotificationGateway> = Arc::new(gateway);
    // A concurrent caller may have installed its gateway first; keep that one.
    let installed = session.gateway.get_or_init(|| gateway);
    installed
        .device_token()
        .or(Some(token))
        .map(|token| token.as_str().to_string())
}

/// Returns the registered push token, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn device_token() -> Option<String> {
    SESSION
        .get()
        .and_then(|session| session.gateway.get())
        .and_then(|gateway| gateway.device_token())
        .map(|token| token.as_str().to_string())
}

fn open_session(requested: Option<PathBuf>) -> Result<&'static Session, String> {
    SESSION.get_or_try_init(|| {
        let config = CoreConfig::from_env();
        let db_path = requested.unwrap_or(config.db_path);
        let store = Store::open(&db_path).map_err(|err| err.to_string())?;
        Ok(Session {
            db_path,
            store,
            relay: config.relay,
            gateway: OnceCell::new(),
        })
    })
}

fn with_item_service<T>(
    f: impl FnOnce(
        &ItemService<SqliteItemRepository<'_>, Arc<dyn NotificationGateway>>,
    ) -> RepoResult<T>,
) -> Result<T, String> {
    let session = open_session(None)?;
    let gateway: Arc<dyn NotificationGateway> = match session.gateway.get() {
        Some(gateway) => Arc::clone(gateway),
        None => Arc::new(NoopNotificationGateway),
    };
    let service = ItemService::new(SqliteItemRepository::new(&session.store), gateway);
    f(&service).map_err(|err| err.to_string())
}

fn to_item_view(item: Item) -> ItemView {
    ItemView {
        id: item.id,
        text: item.text,
    }
}
