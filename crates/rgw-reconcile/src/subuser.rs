//! Subuser reconciler
//!
//! Subusers are created without keys; keys are managed separately through
//! [`Keys`](crate::Keys). The gateway reports access levels in its reply
//! vocabulary, which is normalized on every read.

use async_trait::async_trait;
use rgw_admin::ident::{is_valid_local_name, parse_composite, strip_parent};
use rgw_admin::{AccessLevel, AdminApi, CallContext, Subuser, SubuserSpec, User};
use std::sync::Arc;
use tracing::info;

use crate::error::{ReconcileError, Result};
use crate::resource::Resource;
use crate::state::SubuserState;

const KIND: &str = "subuser";

/// Reconciler for subusers scoped under a parent user
#[derive(Clone)]
pub struct Subusers {
    client: Arc<dyn AdminApi>,
}

impl Subusers {
    pub fn new(client: Arc<dyn AdminApi>) -> Self {
        Self { client }
    }

    /// Fetch the parent user, attributing failures to subuser `id`
    async fn parent(
        &self,
        ctx: &CallContext,
        operation: &'static str,
        id: &str,
        uid: &str,
    ) -> Result<User> {
        self.client
            .get_user(ctx, uid)
            .await
            .map_err(|e| ReconcileError::api(operation, KIND, id, e))
    }
}

fn spec(state: &SubuserState, generate_secret: Option<bool>) -> SubuserSpec {
    SubuserSpec {
        name: state.subuser.clone(),
        access: state.access.clone(),
        generate_secret,
    }
}

fn observed(parent: &str, subuser: &Subuser) -> SubuserState {
    SubuserState {
        user_id: parent.to_string(),
        subuser: strip_parent(&subuser.name, parent).to_string(),
        access: AccessLevel::from_reply(&subuser.access),
    }
}

#[async_trait]
impl Resource for Subusers {
    type State = SubuserState;

    fn type_name(&self) -> &'static str {
        "radosgw_subuser"
    }

    async fn create(&self, ctx: &CallContext, desired: &SubuserState) -> Result<SubuserState> {
        if !is_valid_local_name(&desired.subuser) {
            return Err(ReconcileError::invalid_identifier(
                KIND,
                desired.id(),
                "subuser name must be non-empty and must not contain ':'",
            ));
        }

        self.client
            .create_subuser(ctx, &desired.user_id, &spec(desired, Some(false)))
            .await
            .map_err(|e| ReconcileError::api("create", KIND, desired.id(), e))?;

        info!(subuser = %desired.id(), access = %desired.access, "created subuser");
        Ok(desired.clone())
    }

    async fn read(&self, ctx: &CallContext, current: &SubuserState) -> Result<SubuserState> {
        let user = self
            .parent(ctx, "read", &current.id(), &current.user_id)
            .await?;

        user.subusers
            .iter()
            .find(|s| strip_parent(&s.name, &current.user_id) == current.subuser)
            .map(|s| observed(&current.user_id, s))
            .ok_or_else(|| ReconcileError::not_found(KIND, current.id()))
    }

    async fn update(&self, ctx: &CallContext, desired: &SubuserState) -> Result<SubuserState> {
        self.client
            .modify_subuser(ctx, &desired.user_id, &spec(desired, None))
            .await
            .map_err(|e| ReconcileError::api("update", KIND, desired.id(), e))?;

        info!(subuser = %desired.id(), access = %desired.access, "updated subuser");
        Ok(desired.clone())
    }

    async fn delete(&self, ctx: &CallContext, current: &SubuserState) -> Result<()> {
        self.client
            .remove_subuser(ctx, &current.user_id, &current.subuser)
            .await
            .map_err(|e| ReconcileError::api("delete", KIND, current.id(), e))?;

        info!(subuser = %current.id(), "removed subuser");
        Ok(())
    }

    async fn import(&self, ctx: &CallContext, id: &str) -> Result<SubuserState> {
        let (parent, _) = parse_composite(id).ok_or_else(|| {
            ReconcileError::invalid_identifier(KIND, id, "expected <user>:<subuser>")
        })?;

        let user = self.parent(ctx, "import", id, parent).await?;

        // Import matches the fully qualified name as reported by the gateway
        user.subusers
            .iter()
            .find(|s| s.name == id)
            .map(|s| observed(parent, s))
            .ok_or_else(|| ReconcileError::not_found(KIND, id))
    }
}
