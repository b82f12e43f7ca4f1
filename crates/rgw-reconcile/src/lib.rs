//! Radosgw Identity Reconciliation
//!
//! This crate provides:
//! - Provider configuration and wiring
//! - User, subuser and key reconcilers behind the [`Resource`] trait
//! - A buckets data source
//!
//! Each operation either returns a normalized observed record or one
//! [`ReconcileError`]. [`ReconcileError::NotFound`] from a read means the
//! entity is gone from the gateway.
//!
//! # Example
//!
//! ```rust,ignore
//! use rgw_reconcile::{Provider, ProviderConfig, Resource, SubuserState};
//! use rgw_admin::{AccessLevel, CallContext};
//!
//! let config = ProviderConfig::new("http://rgw.local:8080", "AK", "SK");
//! let provider = Provider::configure(env!("CARGO_PKG_VERSION"), &config)?;
//!
//! let desired = SubuserState::new("demo", "backup", AccessLevel::ReadWrite);
//! let observed = provider.subusers().create(&CallContext::new(), &desired).await?;
//! ```

pub mod buckets;
pub mod config;
pub mod error;
pub mod key;
pub mod provider;
pub mod resource;
pub mod state;
pub mod subuser;
pub mod user;

pub use buckets::Buckets;
pub use config::{ConfigError, ProviderConfig};
pub use error::{ReconcileError, Result};
pub use key::{Keys, select_new_key};
pub use provider::{PROVIDER_TYPE_NAME, Provider};
pub use resource::{DataSource, Resource};
pub use state::{BucketEntry, BucketsState, KeyEntry, KeyState, SubuserState, UserState};
pub use subuser::Subusers;
pub use user::Users;

#[cfg(test)]
mod tests {
    use super::*;
    use rgw_admin::{AccessLevel, CallContext, MemoryAdmin};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_identity_lifecycle() {
        let provider = Provider::with_client("test", Arc::new(MemoryAdmin::new()));
        let ctx = CallContext::new();

        let user = UserState::new("demo", "Demo");
        assert_eq!(provider.users().create(&ctx, &user).await.unwrap(), user);

        let subuser = SubuserState::new("demo", "backup", AccessLevel::ReadWrite);
        provider.subusers().create(&ctx, &subuser).await.unwrap();
        let observed = provider.subusers().read(&ctx, &subuser).await.unwrap();
        assert_eq!(observed, subuser);

        let key = provider
            .keys()
            .create(&ctx, &KeyState::generated("demo", Some("backup".into())))
            .await
            .unwrap();
        assert_eq!(key.owner(), "demo:backup");

        let user = provider.users().read(&ctx, &user).await.unwrap();
        assert_eq!(user.keys.len(), 1);
        assert_eq!(user.keys[0].user, "demo:backup");

        provider.keys().delete(&ctx, &key).await.unwrap();
        provider.subusers().delete(&ctx, &subuser).await.unwrap();
        provider.users().delete(&ctx, &user).await.unwrap();

        let err = provider.users().read(&ctx, &user).await.unwrap_err();
        assert!(err.to_string().contains("NoSuchUser"));
    }

    #[tokio::test]
    async fn test_canceled_context_is_surfaced() {
        let provider = Provider::with_client("test", Arc::new(MemoryAdmin::new()));
        let ctx = CallContext::new();
        ctx.cancellation_token().cancel();

        let err = provider
            .users()
            .create(&ctx, &UserState::new("demo", "Demo"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.admin_error(),
            Some(rgw_admin::AdminError::Canceled)
        ));
    }
}
