//! Collaborator-facing reconciler interface

use async_trait::async_trait;
use rgw_admin::CallContext;

use crate::error::Result;

/// A managed entity type
///
/// `create` and `update` take the desired record; `read` and `delete` take
/// the previously observed one. A [`NotFound`](crate::ReconcileError::NotFound)
/// from `read` means the entity is gone and should be dropped from state.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Record type exchanged with the collaborator
    type State: Send + Sync;

    /// Resource type name
    fn type_name(&self) -> &'static str;

    async fn create(&self, ctx: &CallContext, desired: &Self::State) -> Result<Self::State>;

    async fn read(&self, ctx: &CallContext, current: &Self::State) -> Result<Self::State>;

    async fn update(&self, ctx: &CallContext, desired: &Self::State) -> Result<Self::State>;

    async fn delete(&self, ctx: &CallContext, current: &Self::State) -> Result<()>;

    /// Build an observed record from an external identifier
    async fn import(&self, ctx: &CallContext, id: &str) -> Result<Self::State>;
}

/// A read-only data source
#[async_trait]
pub trait DataSource: Send + Sync {
    type State: Send + Sync;

    fn type_name(&self) -> &'static str;

    async fn read(&self, ctx: &CallContext) -> Result<Self::State>;
}
