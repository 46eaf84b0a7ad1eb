//! Device capability surface consumed by the relay gateway.

/// Notification permission state reported by the host OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user has not been asked yet.
    Undetermined,
}

impl PermissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Undetermined => "undetermined",
        }
    }

    /// Parses the host's status string. Unknown values count as undetermined.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "granted" => Self::Granted,
            "denied" => Self::Denied,
            _ => Self::Undetermined,
        }
    }
}

/// Device check, permission prompt and token issuance, treated as one unit.
pub trait PushPlatform: Send + Sync {
    /// `false` on simulators/emulators that cannot receive pushes.
    fn is_physical_device(&self) -> bool;
    fn permission_status(&self) -> PermissionStatus;
    /// Prompts the user when the OS allows it and returns the resulting status.
    fn request_permission(&self) -> PermissionStatus;
    /// Asks the platform registration service and relay for a push token.
    fn issue_push_token(&self) -> Result<String, super::NotificationError>;
}

/// Platform built from facts the host UI already collected.
///
/// Used where device and permission APIs live outside Rust (Flutter host,
/// CLI), so the prompt has already happened by the time Rust is asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPushPlatform {
    pub is_physical_device: bool,
    pub permission: PermissionStatus,
    pub push_token: Option<String>,
}

impl PushPlatform for HostPushPlatform {
    fn is_physical_device(&self) -> bool {
        self.is_physical_device
    }

    fn permission_status(&self) -> PermissionStatus {
        self.permission
    }

    fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    fn issue_push_token(&self) -> Result<String, super::NotificationError> {
        self.push_token.clone().ok_or_else(|| {
            super::NotificationError::TokenUnavailable("host supplied no push token".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::PermissionStatus;

    #[test]
    fn parse_is_case_insensitive_and_defaults_to_undetermined() {
        assert_eq!(PermissionStatus::parse(" Granted "), PermissionStatus::Granted);
        assert_eq!(PermissionStatus::parse("DENIED"), PermissionStatus::Denied);
        assert_eq!(
            PermissionStatus::parse("provisional"),
            PermissionStatus::Undetermined
        );
        assert_eq!(PermissionStatus::Granted.as_str(), "granted");
    }
}
