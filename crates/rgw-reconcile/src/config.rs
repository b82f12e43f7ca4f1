//! Provider configuration
//!
//! The provider block is checked once when the provider is wired up. Every
//! missing field is reported together so a broken configuration fails
//! before the first admin call.

use rgw_admin::{AdminConfig, AdminError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Environment variable consulted when no access key ID is configured
pub const ACCESS_KEY_ID_ENV: &str = "ACCESS_KEY_ID";
/// Environment variable consulted when no secret access key is configured
pub const SECRET_ACCESS_KEY_ENV: &str = "SECRET_ACCESS_KEY";

/// Default admin call timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Errors raised while wiring up the provider
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing provider configuration: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    #[error("invalid provider configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Client(#[from] AdminError),
}

/// Provider block as supplied by the collaborator
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Admin endpoint URL (e.g., "http://rgw.local:8080")
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Per-request timeout in milliseconds ([`DEFAULT_TIMEOUT_MS`] when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

fn present(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.is_empty())
}

impl ProviderConfig {
    /// Create a fully specified provider block
    pub fn new(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            access_key_id: Some(access_key_id.into()),
            secret_access_key: Some(secret_access_key.into()),
            timeout_ms: None,
        }
    }

    /// Effective per-request timeout in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    /// Fill missing credentials from the process environment
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_fallback(|name| std::env::var(name).ok())
    }

    /// Fill missing credentials using `lookup` for environment variables
    #[must_use]
    pub fn with_env_fallback<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if present(self.access_key_id.as_ref()).is_none() {
            self.access_key_id = lookup(ACCESS_KEY_ID_ENV).or(self.access_key_id);
        }
        if present(self.secret_access_key.as_ref()).is_none() {
            self.secret_access_key = lookup(SECRET_ACCESS_KEY_ENV).or(self.secret_access_key);
        }
        self
    }

    /// Apply the fields set in `other` on top of this block
    #[must_use]
    pub fn overlay(mut self, other: Self) -> Self {
        if other.endpoint.is_some() {
            self.endpoint = other.endpoint;
        }
        if other.access_key_id.is_some() {
            self.access_key_id = other.access_key_id;
        }
        if other.secret_access_key.is_some() {
            self.secret_access_key = other.secret_access_key;
        }
        if other.timeout_ms.is_some() {
            self.timeout_ms = other.timeout_ms;
        }
        self
    }

    /// Check the block and build the admin client configuration
    pub fn validate(&self) -> Result<AdminConfig, ConfigError> {
        let endpoint = present(self.endpoint.as_ref());
        let access_key_id = present(self.access_key_id.as_ref());
        let secret_access_key = present(self.secret_access_key.as_ref());

        let mut missing = Vec::new();
        if endpoint.is_none() {
            missing.push("endpoint");
        }
        if access_key_id.is_none() {
            missing.push("access_key_id");
        }
        if secret_access_key.is_none() {
            missing.push("secret_access_key");
        }

        match (endpoint, access_key_id, secret_access_key) {
            (Some(endpoint), Some(access_key_id), Some(secret_access_key)) => {
                let timeout_ms = self.timeout_ms();
                if timeout_ms == 0 {
                    return Err(ConfigError::Invalid(
                        "timeout_ms must be greater than zero".to_string(),
                    ));
                }
                Ok(AdminConfig::new(endpoint, access_key_id, secret_access_key)
                    .with_timeout(Duration::from_millis(timeout_ms)))
            }
            _ => Err(ConfigError::Missing(missing)),
        }
    }
}
