//! Provider wiring
//!
//! One admin client is built per provider and shared by every reconciler it
//! hands out.

use rgw_admin::{AdminApi, AdminClient};
use std::sync::Arc;
use tracing::info;

use crate::buckets::Buckets;
use crate::config::{ConfigError, ProviderConfig};
use crate::key::Keys;
use crate::subuser::Subusers;
use crate::user::Users;

/// Provider type name; resource type names are prefixed with it
pub const PROVIDER_TYPE_NAME: &str = "radosgw";

/// Entry point handing out reconcilers bound to one gateway
#[derive(Clone)]
pub struct Provider {
    version: String,
    client: Arc<dyn AdminApi>,
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl Provider {
    /// Validate the provider block and build the HTTP admin client
    pub fn configure(version: impl Into<String>, config: &ProviderConfig) -> Result<Self, ConfigError> {
        let admin = config.validate()?;
        let endpoint = admin.endpoint.clone();
        let client = AdminClient::new(admin)?;

        let version = version.into();
        info!(%endpoint, %version, "radosgw provider configured");
        Ok(Self::with_client(version, Arc::new(client)))
    }

    /// Use an existing admin API implementation
    pub fn with_client(version: impl Into<String>, client: Arc<dyn AdminApi>) -> Self {
        Self {
            version: version.into(),
            client,
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Shared admin API handle
    pub fn client(&self) -> &Arc<dyn AdminApi> {
        &self.client
    }

    pub fn users(&self) -> Users {
        Users::new(Arc::clone(&self.client))
    }

    pub fn subusers(&self) -> Subusers {
        Subusers::new(Arc::clone(&self.client))
    }

    pub fn keys(&self) -> Keys {
        Keys::new(Arc::clone(&self.client))
    }

    pub fn buckets(&self) -> Buckets {
        Buckets::new(Arc::clone(&self.client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{DataSource, Resource};
    use rgw_admin::MemoryAdmin;

    #[test]
    fn test_configure_fails_at_wiring_time() {
        let config = ProviderConfig {
            endpoint: Some("http://rgw.local".to_string()),
            ..Default::default()
        }
        .with_env_fallback(|_| None);
        assert!(matches!(
            Provider::configure("test", &config),
            Err(ConfigError::Missing(_))
        ));

        let config = ProviderConfig::new("ftp://rgw.local", "AK", "SK");
        assert!(matches!(
            Provider::configure("test", &config),
            Err(ConfigError::Client(_))
        ));
    }

    #[test]
    fn test_configure() {
        let config = ProviderConfig::new("http://rgw.local:8080", "AK", "SK");
        let provider = Provider::configure("1.0.0", &config).unwrap();
        assert_eq!(provider.version(), "1.0.0");
    }

    #[test]
    fn test_type_names() {
        let provider = Provider::with_client("test", Arc::new(MemoryAdmin::new()));
        assert_eq!(provider.users().type_name(), "radosgw_user");
        assert_eq!(provider.subusers().type_name(), "radosgw_subuser");
        assert_eq!(provider.keys().type_name(), "radosgw_key");
        assert_eq!(provider.buckets().type_name(), "radosgw_buckets");
    }
}
