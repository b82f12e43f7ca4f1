//! Radosgw Admin API Client
//!
//! This crate provides:
//! - Legacy AWS signature (HMAC-SHA1) request signing
//! - A typed client for the user, subuser, key and bucket admin endpoints
//! - Access level mapping between request and reply vocabularies
//! - Composite `user:subuser` identifier helpers
//!
//! # Features
//!
//! - `memory`: In-memory [`AdminApi`] implementation for tests
//!
//! # Example
//!
//! ```rust,ignore
//! use rgw_admin::{AdminApi, AdminClient, AdminConfig, CallContext};
//! use std::time::Duration;
//!
//! let client = AdminClient::new(AdminConfig::new("http://rgw.local:8080", "AK", "SK"))?;
//! let ctx = CallContext::new().with_timeout(Duration::from_secs(10));
//! let user = client.get_user(&ctx, "demo").await?;
//! ```

pub mod access;
pub mod api;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod ident;
pub mod signer;
pub mod types;

#[cfg(feature = "memory")]
pub mod memory;

pub use access::{AccessLevel, UnknownAccessLevel, normalize_access};
pub use api::AdminApi;
pub use client::AdminClient;
pub use config::{AdminConfig, Credentials, DEFAULT_TIMEOUT};
pub use context::CallContext;
pub use error::{AdminError, Result};
pub use types::{
    BucketStat, ClusterInfo, KeySpec, KeyType, Subuser, SubuserSpec, User, UserKey, UserSpec,
};

#[cfg(feature = "memory")]
pub use memory::MemoryAdmin;
