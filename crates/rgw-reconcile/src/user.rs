//! User reconciler
//!
//! The gateway is authoritative for the user ID and display name, so every
//! mutation copies both back from the response.

use async_trait::async_trait;
use rgw_admin::{AdminApi, CallContext, User, UserSpec};
use std::sync::Arc;
use tracing::info;

use crate::error::{ReconcileError, Result};
use crate::resource::Resource;
use crate::state::{KeyEntry, UserState};

const KIND: &str = "user";

/// Reconciler for top-level gateway users
#[derive(Clone)]
pub struct Users {
    client: Arc<dyn AdminApi>,
}

impl Users {
    pub fn new(client: Arc<dyn AdminApi>) -> Self {
        Self { client }
    }

    fn spec(desired: &UserState) -> UserSpec {
        UserSpec::new(&desired.user_id, &desired.display_name)
    }
}

fn observed(user: &User) -> UserState {
    UserState::new(&user.id, &user.display_name)
}

#[async_trait]
impl Resource for Users {
    type State = UserState;

    fn type_name(&self) -> &'static str {
        "radosgw_user"
    }

    async fn create(&self, ctx: &CallContext, desired: &UserState) -> Result<UserState> {
        let user = self
            .client
            .create_user(ctx, &Self::spec(desired))
            .await
            .map_err(|e| ReconcileError::api("create", KIND, &desired.user_id, e))?;

        info!(user_id = %user.id, "created user");
        Ok(observed(&user))
    }

    async fn read(&self, ctx: &CallContext, current: &UserState) -> Result<UserState> {
        let user = self
            .client
            .get_user(ctx, &current.user_id)
            .await
            .map_err(|e| ReconcileError::api("read", KIND, &current.user_id, e))?;

        Ok(UserState {
            keys: user.keys.iter().map(KeyEntry::from).collect(),
            ..observed(&user)
        })
    }

    async fn update(&self, ctx: &CallContext, desired: &UserState) -> Result<UserState> {
        let user = self
            .client
            .modify_user(ctx, &Self::spec(desired))
            .await
            .map_err(|e| ReconcileError::api("update", KIND, &desired.user_id, e))?;

        info!(user_id = %user.id, "updated user");
        Ok(observed(&user))
    }

    async fn delete(&self, ctx: &CallContext, current: &UserState) -> Result<()> {
        self.client
            .remove_user(ctx, &current.user_id)
            .await
            .map_err(|e| ReconcileError::api("delete", KIND, &current.user_id, e))?;

        info!(user_id = %current.user_id, "removed user");
        Ok(())
    }

    async fn import(&self, ctx: &CallContext, id: &str) -> Result<UserState> {
        self.read(ctx, &UserState::new(id, "")).await
    }
}
