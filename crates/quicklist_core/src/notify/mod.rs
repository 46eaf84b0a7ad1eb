//! Push notification gateway.
//!
//! # Responsibility
//! - Register this installation with the push relay once per session.
//! - Deliver a best-effort notification when an item is created.
//!
//! # Invariants
//! - The device token is populated at most once and only cleared by restart.
//! - Gateway failures are logged and swallowed; they never reach CRUD callers.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod platform;
mod relay;

pub use platform::{HostPushPlatform, PermissionStatus, PushPlatform};
pub use relay::{
    PushData, PushMessage, RelayConfig, RelayNotificationGateway, DEFAULT_RELAY_ENDPOINT,
};

/// Opaque per-installation push token issued by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceToken(String);

impl DeviceToken {
    /// Wraps a raw token. Blank values are rejected.
    pub fn new(raw: impl Into<String>) -> Result<Self, NotificationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NotificationError::TokenUnavailable(
                "platform returned an empty push token".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Registration or delivery failure. Always recovered inside the gateway.
#[derive(Debug)]
pub enum NotificationError {
    /// The HTTP request never produced a response.
    Transport(reqwest::Error),
    /// The relay answered with a non-success status.
    Rejected(u16),
    /// The platform could not issue a push token.
    TokenUnavailable(String),
    /// The background delivery thread could not be started.
    Worker(std::io::Error),
}

impl Display for NotificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "relay request failed: {err}"),
            Self::Rejected(status) => write!(f, "relay rejected notification with status {status}"),
            Self::TokenUnavailable(reason) => write!(f, "push token unavailable: {reason}"),
            Self::Worker(err) => write!(f, "failed to start delivery worker: {err}"),
        }
    }
}

impl Error for NotificationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Worker(err) => Some(err),
            Self::Rejected(_) | Self::TokenUnavailable(_) => None,
        }
    }
}

impl From<reqwest::Error> for NotificationError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// Capability set the item service depends on for push side effects.
pub trait NotificationGateway: Send + Sync {
    /// Obtains (or returns the cached) device token.
    ///
    /// Returns `None` on simulators, denied permission, or token failure.
    fn register_device(&self) -> Option<DeviceToken>;

    /// Announces a newly created item. Returns immediately.
    ///
    /// No-op when no device token is registered.
    fn notify_created(&self, body: &str);

    /// Current session token, if registration succeeded.
    fn device_token(&self) -> Option<DeviceToken>;
}

impl<T: NotificationGateway + ?Sized> NotificationGateway for Arc<T> {
    fn register_device(&self) -> Option<DeviceToken> {
        (**self).register_device()
    }

    fn notify_created(&self, body: &str) {
        (**self).notify_created(body)
    }

    fn device_token(&self) -> Option<DeviceToken> {
        (**self).device_token()
    }
}

/// Gateway that never registers and never sends.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotificationGateway;

impl NotificationGateway for NoopNotificationGateway {
    fn register_device(&self) -> Option<DeviceToken> {
        None
    }

    fn notify_created(&self, _body: &str) {}

    fn device_token(&self) -> Option<DeviceToken> {
        None
    }
}
