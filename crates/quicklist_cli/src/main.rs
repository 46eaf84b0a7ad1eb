//! Terminal driver for the QuickList core.
//!
//! # Responsibility
//! - Run list/add/edit/delete against a store file from the shell.
//! - Optionally post the creation notification with a known push token and
//!   wait for its outcome before exiting.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quicklist_core::{
    CoreConfig, DeviceToken, HostPushPlatform, Item, ItemService, NotificationError,
    NotificationGateway, PermissionStatus, RelayNotificationGateway, SqliteItemRepository, Store,
};
use std::path::PathBuf;
use std::sync::Mutex;
use std::thread::JoinHandle;

#[derive(Parser, Debug)]
#[command(name = "quicklist", version, about = "Manage the local QuickList item store")]
struct Cli {
    /// Store file (defaults to QUICKLIST_DB_PATH or the temp dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    log_dir: Option<String>,

    /// Push token to notify after `add`
    #[arg(long, global = true, env = "QUICKLIST_PUSH_TOKEN")]
    push_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check core linkage
    Ping,
    /// Print every item
    List,
    /// Create an item
    Add { text: String },
    /// Replace the text of an item
    Edit { id: i64, text: String },
    /// Remove an item
    Delete { id: i64 },
}

/// Relay gateway that keeps worker handles so the process can wait for them.
struct AwaitingGateway {
    relay: Option<RelayNotificationGateway<HostPushPlatform>>,
    pending: Mutex<Vec<JoinHandle<Result<(), NotificationError>>>>,
}

impl AwaitingGateway {
    fn finish(&self) {
        let handles = std::mem::take(
            &mut *self
                .pending
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        );
        for handle in handles {
            match handle.join() {
                Ok(Ok(())) => eprintln!("notification sent"),
                Ok(Err(err)) => eprintln!("notification not sent: {err}"),
                Err(_) => eprintln!("notification worker panicked"),
            }
        }
    }
}

impl NotificationGateway for AwaitingGateway {
    fn register_device(&self) -> Option<DeviceToken> {
        self.relay.as_ref()?.register_device()
    }

    fn notify_created(&self, body: &str) {
        let Some(handle) = self.relay.as_ref().and_then(|relay| relay.dispatch(body)) else {
            return;
        };
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(handle);
    }

    fn device_token(&self) -> Option<DeviceToken> {
        self.relay.as_ref()?.device_token()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        quicklist_core::init_logging(quicklist_core::default_log_level(), log_dir)
            .map_err(anyhow::Error::msg)
            .context("failed to initialize logging")?;
    }

    if let Command::Ping = cli.command {
        println!("quicklist_core ping={}", quicklist_core::ping());
        println!("quicklist_core version={}", quicklist_core::core_version());
        return Ok(());
    }

    let config = CoreConfig::from_env();
    let db_path = cli.db.clone().unwrap_or(config.db_path.clone());
    let store = Store::open(&db_path)
        .with_context(|| format!("failed to open store at {}", db_path.display()))?;

    let relay = match cli.push_token {
        Some(token) => {
            let platform = HostPushPlatform {
                is_physical_device: true,
                permission: PermissionStatus::Granted,
                push_token: Some(token),
            };
            Some(
                RelayNotificationGateway::new(platform, config.relay)
                    .context("failed to build relay client")?,
            )
        }
        None => None,
    };
    let gateway = AwaitingGateway {
        relay,
        pending: Mutex::new(Vec::new()),
    };
    if gateway.relay.is_some() && gateway.register_device().is_none() {
        eprintln!("push token rejected; notifications disabled");
    }

    let service = ItemService::new(SqliteItemRepository::new(&store), gateway);
    let items = match cli.command {
        Command::Ping | Command::List => service.list(),
        Command::Add { text } => service.create(&text),
        Command::Edit { id, text } => service.update(id, &text),
        Command::Delete { id } => service.delete(id),
    }
    .context("item operation failed")?;

    print_items(&items);
    service.gateway().finish();
    Ok(())
}

fn print_items(items: &[Item]) {
    if items.is_empty() {
        println!("(no items)");
        return;
    }
    for item in items {
        println!("{:>6}  {}", item.id, item.text);
    }
}
