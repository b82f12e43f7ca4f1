//! Admin client configuration

use std::fmt;
use std::time::Duration;

/// Default per-request timeout for admin calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Access key pair used to sign admin requests
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Access key ID sent in the `Authorization` header
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret used as the HMAC key
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Configuration for [`AdminClient`](crate::AdminClient)
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Gateway base URL (e.g., "http://rgw.local:8080")
    pub endpoint: String,
    /// Admin credentials
    pub credentials: Credentials,
    /// Transport timeout applied to every request
    pub timeout: Duration,
}

impl AdminConfig {
    /// Create a config with the default timeout
    pub fn new(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            credentials: Credentials::new(access_key_id, secret_access_key),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the transport timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let config = AdminConfig::new("http://localhost:8080", "AKIA123", "topsecret");
        let rendered = format!("{config:?}");
        assert!(rendered.contains("AKIA123"));
        assert!(!rendered.contains("topsecret"));
    }

    #[test]
    fn test_with_timeout() {
        let config = AdminConfig::new("http://localhost:8080", "a", "b")
            .with_timeout(Duration::from_millis(250));
        assert_eq!(config.timeout, Duration::from_millis(250));
    }
}
