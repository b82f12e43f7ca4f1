//! Admin API trait
//!
//! [`AdminApi`] is the seam between the reconcilers and the gateway. The
//! HTTP implementation is [`AdminClient`](crate::AdminClient); the `memory`
//! feature adds an in-process implementation.

use async_trait::async_trait;

use crate::context::CallContext;
use crate::error::Result;
use crate::types::{BucketStat, ClusterInfo, KeySpec, SubuserSpec, User, UserKey, UserSpec};

/// Operations of the radosgw admin API needed for identity management
#[async_trait]
pub trait AdminApi: Send + Sync {
    // ==================== Cluster Operations ====================

    /// Fetch cluster info; fails unless the cluster ID is non-empty
    async fn info(&self, ctx: &CallContext) -> Result<ClusterInfo>;

    /// List all buckets with their owners
    async fn list_buckets(&self, ctx: &CallContext) -> Result<Vec<BucketStat>>;

    // ==================== User Operations ====================

    /// Get a user including subusers and keys
    async fn get_user(&self, ctx: &CallContext, uid: &str) -> Result<User>;

    /// List all user IDs
    async fn list_users(&self, ctx: &CallContext) -> Result<Vec<String>>;

    /// Create a user
    async fn create_user(&self, ctx: &CallContext, spec: &UserSpec) -> Result<User>;

    /// Modify a user's mutable attributes
    async fn modify_user(&self, ctx: &CallContext, spec: &UserSpec) -> Result<User>;

    /// Remove a user (bucket data is kept)
    async fn remove_user(&self, ctx: &CallContext, uid: &str) -> Result<()>;

    // ==================== Subuser Operations ====================

    /// Create a subuser under `uid`
    async fn create_subuser(
        &self,
        ctx: &CallContext,
        uid: &str,
        spec: &SubuserSpec,
    ) -> Result<()>;

    /// Change a subuser's access level
    async fn modify_subuser(
        &self,
        ctx: &CallContext,
        uid: &str,
        spec: &SubuserSpec,
    ) -> Result<()>;

    /// Remove a subuser by local name
    async fn remove_subuser(&self, ctx: &CallContext, uid: &str, name: &str) -> Result<()>;

    // ==================== Key Operations ====================

    /// Create a key; returns the owner's complete key set afterwards
    async fn create_key(&self, ctx: &CallContext, spec: &KeySpec) -> Result<Vec<UserKey>>;

    /// Remove a key identified by owner and access key
    async fn remove_key(&self, ctx: &CallContext, spec: &KeySpec) -> Result<()>;
}
