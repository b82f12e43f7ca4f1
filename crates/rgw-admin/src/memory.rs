//! In-memory admin API
//!
//! Mirrors the observable behaviour of the gateway closely enough to drive
//! the reconcilers without a cluster: subuser access levels come back in
//! reply form, key creation answers with the owner's whole key set, and
//! missing entities fail with the same status codes and error bodies.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::api::AdminApi;
use crate::context::CallContext;
use crate::error::{AdminError, Result};
use crate::ident::join_owner;
use crate::types::{BucketStat, ClusterInfo, KeySpec, Subuser, SubuserSpec, User, UserKey, UserSpec};

/// In-memory gateway implementing [`AdminApi`]
pub struct MemoryAdmin {
    cluster_id: String,
    /// Users indexed by user ID
    users: RwLock<BTreeMap<String, User>>,
    buckets: RwLock<Vec<BucketStat>>,
}

impl Default for MemoryAdmin {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAdmin {
    /// Create an empty gateway
    pub fn new() -> Self {
        Self::with_cluster_id("memory")
    }

    /// Create an empty gateway reporting the given cluster ID
    pub fn with_cluster_id(cluster_id: impl Into<String>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            users: RwLock::new(BTreeMap::new()),
            buckets: RwLock::new(Vec::new()),
        }
    }

    /// Insert or replace a user record verbatim
    pub fn insert_user(&self, user: User) {
        self.users.write().insert(user.id.clone(), user);
    }

    /// Register a bucket owned by `owner`
    pub fn add_bucket(&self, bucket: impl Into<String>, owner: impl Into<String>) {
        self.buckets.write().push(BucketStat {
            bucket: bucket.into(),
            owner: owner.into(),
        });
    }

    /// Snapshot of a stored user
    pub fn user(&self, uid: &str) -> Option<User> {
        self.users.read().get(uid).cloned()
    }

    fn access_key_in_use(users: &BTreeMap<String, User>, access_key: &str) -> bool {
        users
            .values()
            .flat_map(|u| u.keys.iter())
            .any(|k| k.access_key == access_key)
    }
}

fn error_status(status: u16, code: &str) -> AdminError {
    AdminError::UnexpectedStatus {
        status,
        body: format!(r#"{{"Code":"{code}"}}"#),
    }
}

fn no_such_user() -> AdminError {
    error_status(404, "NoSuchUser")
}

fn no_such_subuser() -> AdminError {
    error_status(404, "NoSuchSubUser")
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

#[async_trait]
impl AdminApi for MemoryAdmin {
    async fn info(&self, ctx: &CallContext) -> Result<ClusterInfo> {
        ctx.check()?;
        if self.cluster_id.is_empty() {
            return Err(AdminError::invalid_response("info.cluster_id is empty"));
        }
        Ok(ClusterInfo {
            cluster_id: self.cluster_id.clone(),
        })
    }

    async fn list_buckets(&self, ctx: &CallContext) -> Result<Vec<BucketStat>> {
        ctx.check()?;
        Ok(self.buckets.read().clone())
    }

    async fn get_user(&self, ctx: &CallContext, uid: &str) -> Result<User> {
        ctx.check()?;
        self.users.read().get(uid).cloned().ok_or_else(no_such_user)
    }

    async fn list_users(&self, ctx: &CallContext) -> Result<Vec<String>> {
        ctx.check()?;
        Ok(self.users.read().keys().cloned().collect())
    }

    async fn create_user(&self, ctx: &CallContext, spec: &UserSpec) -> Result<User> {
        ctx.check()?;
        let mut users = self.users.write();

        // Re-sending a create for an existing ID returns the stored user
        let user = users.entry(spec.id.clone()).or_insert_with(|| User {
            id: spec.id.clone(),
            display_name: spec.display_name.clone(),
            email: spec.email.clone().unwrap_or_default(),
            ..Default::default()
        });
        Ok(user.clone())
    }

    async fn modify_user(&self, ctx: &CallContext, spec: &UserSpec) -> Result<User> {
        ctx.check()?;
        let mut users = self.users.write();
        let user = users.get_mut(&spec.id).ok_or_else(no_such_user)?;

        if !spec.display_name.is_empty() {
            user.display_name = spec.display_name.clone();
        }
        if let Some(email) = &spec.email {
            user.email = email.clone();
        }
        Ok(user.clone())
    }

    async fn remove_user(&self, ctx: &CallContext, uid: &str) -> Result<()> {
        ctx.check()?;
        self.users
            .write()
            .remove(uid)
            .map(|_| ())
            .ok_or_else(no_such_user)
    }

    async fn create_subuser(
        &self,
        ctx: &CallContext,
        uid: &str,
        spec: &SubuserSpec,
    ) -> Result<()> {
        ctx.check()?;
        let mut users = self.users.write();
        let generate_secret = spec.generate_secret == Some(true);
        let generated =
            generate_secret.then(|| (generate_access_key_id(), generate_secret_key()));

        let user = users.get_mut(uid).ok_or_else(no_such_user)?;
        let name = join_owner(uid, Some(spec.name.as_str()));
        if user.subusers.iter().any(|s| s.name == name) {
            return Err(error_status(409, "SubuserExists"));
        }

        user.subusers.push(Subuser {
            name: name.clone(),
            access: spec.access.as_reply_str().to_string(),
        });
        if let Some((access_key, secret_key)) = generated {
            user.keys.push(UserKey {
                user: name,
                access_key,
                secret_key,
            });
        }
        Ok(())
    }

    async fn modify_subuser(
        &self,
        ctx: &CallContext,
        uid: &str,
        spec: &SubuserSpec,
    ) -> Result<()> {
        ctx.check()?;
        let mut users = self.users.write();
        let user = users.get_mut(uid).ok_or_else(no_such_user)?;
        let name = join_owner(uid, Some(spec.name.as_str()));

        let subuser = user
            .subusers
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(no_such_subuser)?;
        subuser.access = spec.access.as_reply_str().to_string();
        Ok(())
    }

    async fn remove_subuser(&self, ctx: &CallContext, uid: &str, name: &str) -> Result<()> {
        ctx.check()?;
        let mut users = self.users.write();
        let user = users.get_mut(uid).ok_or_else(no_such_user)?;
        let name = join_owner(uid, Some(name));

        let before = user.subusers.len();
        user.subusers.retain(|s| s.name != name);
        if user.subusers.len() == before {
            return Err(no_such_subuser());
        }

        // Keys of the subuser are purged with it
        user.keys.retain(|k| k.user != name);
        Ok(())
    }

    async fn create_key(&self, ctx: &CallContext, spec: &KeySpec) -> Result<Vec<UserKey>> {
        ctx.check()?;
        let mut users = self.users.write();
        let owner = join_owner(&spec.uid, non_empty(spec.subuser.as_ref()));

        {
            let user = users.get(&spec.uid).ok_or_else(no_such_user)?;
            if owner != user.id && !user.subusers.iter().any(|s| s.name == owner) {
                return Err(no_such_subuser());
            }
        }

        let given_access = non_empty(spec.access_key.as_ref());
        let given_secret = non_empty(spec.secret_key.as_ref());
        if (given_access.is_none() || given_secret.is_none()) && spec.generate_key != Some(true) {
            return Err(error_status(400, "InvalidArgument"));
        }
        let access_key = given_access.map_or_else(generate_access_key_id, str::to_string);
        let secret_key = given_secret.map_or_else(generate_secret_key, str::to_string);

        {
            let user = users.get(&spec.uid).ok_or_else(no_such_user)?;
            let owned_here = user
                .keys
                .iter()
                .any(|k| k.user == owner && k.access_key == access_key);
            if !owned_here && Self::access_key_in_use(&users, &access_key) {
                return Err(error_status(409, "KeyExists"));
            }
        }

        let user = users.get_mut(&spec.uid).ok_or_else(no_such_user)?;
        match user
            .keys
            .iter_mut()
            .find(|k| k.user == owner && k.access_key == access_key)
        {
            // An existing access key gets its secret replaced in place
            Some(existing) => existing.secret_key = secret_key,
            None => user.keys.push(UserKey {
                user: owner,
                access_key,
                secret_key,
            }),
        }

        Ok(user.keys.clone())
    }

    async fn remove_key(&self, ctx: &CallContext, spec: &KeySpec) -> Result<()> {
        ctx.check()?;
        let mut users = self.users.write();
        let user = users.get_mut(&spec.uid).ok_or_else(no_such_user)?;
        let owner = join_owner(&spec.uid, non_empty(spec.subuser.as_ref()));
        let access_key = spec.access_key.as_deref().unwrap_or_default();

        let before = user.keys.len();
        user.keys
            .retain(|k| k.user != owner || k.access_key != access_key);
        if user.keys.len() == before {
            return Err(error_status(404, "InvalidAccessKeyId"));
        }
        Ok(())
    }
}

/// Generate an access key ID (20 uppercase alphanumeric characters)
fn generate_access_key_id() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();

    (0..20)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Generate a secret access key (40 alphanumeric characters)
fn generate_secret_key() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    (0..40)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}
