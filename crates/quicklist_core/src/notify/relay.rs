//! HTTP relay gateway implementation.
//!
//! # Responsibility
//! - Run the device registration flow against a `PushPlatform`.
//! - POST one JSON message envelope per created item to the relay.
//!
//! # Invariants
//! - Delivery runs on a detached worker thread; callers never wait on it.
//! - Only the transport outcome and status code are observed; the response
//!   body is discarded.
//! - Item text is never logged, only its length.

use super::platform::{PermissionStatus, PushPlatform};
use super::{DeviceToken, NotificationError, NotificationGateway};
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Public Expo push endpoint.
pub const DEFAULT_RELAY_ENDPOINT: &str = "https://exp.host/--/api/v2/push/send";
const DEFAULT_TITLE: &str = "New item added";
const DEFAULT_SOUND: &str = "default";
const DEFAULT_DATA: &str = "goes here";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const WORKER_THREAD_NAME: &str = "quicklist-relay";

/// Relay addressing and message constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub endpoint: String,
    pub title: String,
    pub sound: String,
    /// Value sent as `data.someData`.
    pub data: String,
    pub timeout: Duration,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_RELAY_ENDPOINT.to_string(),
            title: DEFAULT_TITLE.to_string(),
            sound: DEFAULT_SOUND.to_string(),
            data: DEFAULT_DATA.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// JSON envelope accepted by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub sound: String,
    pub title: String,
    pub body: String,
    pub data: PushData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushData {
    #[serde(rename = "someData")]
    pub some_data: String,
}

/// Production gateway: platform-backed registration, HTTP relay delivery.
pub struct RelayNotificationGateway<P: PushPlatform> {
    platform: P,
    config: RelayConfig,
    client: Client,
    token: OnceCell<DeviceToken>,
}

impl<P: PushPlatform> RelayNotificationGateway<P> {
    /// Builds the gateway and its HTTP client.
    ///
    /// # Errors
    /// - Returns `Transport` when the HTTP client cannot be constructed.
    pub fn new(platform: P, config: RelayConfig) -> Result<Self, NotificationError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            platform,
            config,
            client,
            token: OnceCell::new(),
        })
    }

    /// Builds the envelope for `body` addressed to `token`.
    pub fn message_for(&self, token: &DeviceToken, body: &str) -> PushMessage {
        PushMessage {
            to: token.as_str().to_string(),
            sound: self.config.sound.clone(),
            title: self.config.title.clone(),
            body: body.to_string(),
            data: PushData {
                some_data: self.config.data.clone(),
            },
        }
    }

    /// Sends one message and waits for the relay's answer.
    pub fn deliver(&self, token: &DeviceToken, body: &str) -> Result<(), NotificationError> {
        post_message(&self.client, &self.config.endpoint, &self.message_for(token, body))
    }

    /// Starts background delivery for `body`.
    ///
    /// Returns `None` when no token is registered or the worker could not be
    /// started. The handle may be dropped to detach the worker.
    pub fn dispatch(&self, body: &str) -> Option<JoinHandle<Result<(), NotificationError>>> {
        let Some(token) = self.token.get() else {
            debug!("event=notify_created module=notify status=skip reason=no_device_token");
            return None;
        };

        let client = self.client.clone();
        let endpoint = self.config.endpoint.clone();
        let message = self.message_for(token, body);
        let body_len = body.len();

        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || {
                let result = post_message(&client, &endpoint, &message);
                match &result {
                    Ok(()) => info!(
                        "event=notify_created module=notify status=ok body_len={body_len}"
                    ),
                    Err(err) => warn!(
                        "event=notify_created module=notify status=error body_len={body_len} error={err}"
                    ),
                }
                result
            });

        match spawned {
            Ok(handle) => Some(handle),
            Err(err) => {
                let err = NotificationError::Worker(err);
                warn!("event=notify_created module=notify status=error error={err}");
                None
            }
        }
    }
}

impl<P: PushPlatform> NotificationGateway for RelayNotificationGateway<P> {
    fn register_device(&self) -> Option<DeviceToken> {
        if let Some(token) = self.token.get() {
            return Some(token.clone());
        }

        if !self.platform.is_physical_device() {
            info!("event=device_register module=notify status=skip reason=not_physical_device");
            return None;
        }

        let mut permission = self.platform.permission_status();
        if permission != PermissionStatus::Granted {
            permission = self.platform.request_permission();
        }
        if permission != PermissionStatus::Granted {
            info!(
                "event=device_register module=notify status=skip reason=permission_denied permission={}",
                permission.as_str()
            );
            return None;
        }

        match self.platform.issue_push_token().and_then(DeviceToken::new) {
            Ok(issued) => {
                let token = self.token.get_or_init(|| issued).clone();
                info!("event=device_register module=notify status=ok");
                Some(token)
            }
            Err(err) => {
                warn!("event=device_register module=notify status=error error={err}");
                None
            }
        }
    }

    fn notify_created(&self, body: &str) {
        // Detached: completion and failure are only visible in the logs.
        let _ = self.dispatch(body);
    }

    fn device_token(&self) -> Option<DeviceToken> {
        self.token.get().cloned()
    }
}

fn post_message(
    client: &Client,
    endpoint: &str,
    message: &PushMessage,
) -> Result<(), NotificationError> {
    let response = client
        .post(endpoint)
        .header(ACCEPT, "application/json")
        .header(CONTENT_TYPE, "application/json")
        .json(message)
        .send()?;

    let status = response.status();
    if !status.is_success() {
        return Err(NotificationError::Rejected(status.as_u16()));
    }
    Ok(())
}
