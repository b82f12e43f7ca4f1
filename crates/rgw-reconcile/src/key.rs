//! Key reconciler
//!
//! Creating a key answers with the owner's complete key set. The new key is
//! found by diffing that set against the access keys present before the
//! call. Keys are never updated in place; rotation is delete plus create.

use async_trait::async_trait;
use rgw_admin::{AdminApi, CallContext, KeySpec, KeyType, UserKey};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{ReconcileError, Result};
use crate::resource::Resource;
use crate::state::KeyState;

const KIND: &str = "key";

/// Pick the first key whose access key was not present before the create
pub fn select_new_key<'a>(seen: &HashSet<String>, keys: &'a [UserKey]) -> Option<&'a UserKey> {
    keys.iter().find(|key| !seen.contains(&key.access_key))
}

/// Reconciler for S3 key pairs of users and subusers
#[derive(Clone)]
pub struct Keys {
    client: Arc<dyn AdminApi>,
}

impl Keys {
    pub fn new(client: Arc<dyn AdminApi>) -> Self {
        Self { client }
    }

    fn spec(state: &KeyState) -> KeySpec {
        KeySpec {
            uid: state.user.clone(),
            subuser: state.subuser_name().map(str::to_string),
            access_key: state.access_key.clone(),
            secret_key: state.secret_key.clone(),
            key_type: KeyType::S3,
            generate_key: None,
        }
    }
}

#[async_trait]
impl Resource for Keys {
    type State = KeyState;

    fn type_name(&self) -> &'static str {
        "radosgw_key"
    }

    async fn create(&self, ctx: &CallContext, desired: &KeyState) -> Result<KeyState> {
        let owner = desired.owner();
        let user = self
            .client
            .get_user(ctx, &desired.user)
            .await
            .map_err(|e| ReconcileError::api("create", KIND, &owner, e))?;
        let seen: HashSet<String> = user.keys.into_iter().map(|k| k.access_key).collect();

        let mut spec = Self::spec(desired);
        if desired.access_key_value().is_empty() || desired.secret_key_value().is_empty() {
            spec.generate_key = Some(true);
        }

        let keys = self
            .client
            .create_key(ctx, &spec)
            .await
            .map_err(|e| ReconcileError::api("create", KIND, &owner, e))?;

        match select_new_key(&seen, &keys) {
            Some(key) => {
                info!(owner = %key.user, access_key = %key.access_key, "created key");
                Ok(KeyState::from_key(key))
            }
            None => {
                // An existing access key had its secret replaced in place
                warn!(
                    %owner,
                    access_key = desired.access_key_value(),
                    "created key not found among returned keys; keeping declared values"
                );
                Ok(desired.clone())
            }
        }
    }

    async fn read(&self, ctx: &CallContext, current: &KeyState) -> Result<KeyState> {
        let user = self
            .client
            .get_user(ctx, &current.user)
            .await
            .map_err(|e| ReconcileError::api("read", KIND, current.access_key_value(), e))?;

        let owner = current.owner();
        user.keys
            .iter()
            .find(|k| {
                k.user == owner
                    && k.access_key == current.access_key_value()
                    && k.secret_key == current.secret_key_value()
            })
            .map(KeyState::from_key)
            .ok_or_else(|| ReconcileError::not_found(KIND, current.access_key_value()))
    }

    async fn update(&self, _ctx: &CallContext, _desired: &KeyState) -> Result<KeyState> {
        Err(ReconcileError::Unsupported {
            kind: KIND,
            reason: "keys are rotated by deleting and recreating them",
        })
    }

    async fn delete(&self, ctx: &CallContext, current: &KeyState) -> Result<()> {
        let spec = KeySpec {
            secret_key: None,
            ..Self::spec(current)
        };
        self.client
            .remove_key(ctx, &spec)
            .await
            .map_err(|e| ReconcileError::api("delete", KIND, current.access_key_value(), e))?;

        info!(owner = %current.owner(), access_key = current.access_key_value(), "removed key");
        Ok(())
    }

    async fn import(&self, ctx: &CallContext, id: &str) -> Result<KeyState> {
        let uids = self
            .client
            .list_users(ctx)
            .await
            .map_err(|e| ReconcileError::api("import", KIND, id, e))?;

        debug!(users = uids.len(), access_key = id, "scanning users for key");
        for uid in &uids {
            let user = self
                .client
                .get_user(ctx, uid)
                .await
                .map_err(|e| ReconcileError::api("import", KIND, id, e))?;

            if let Some(key) = user.keys.iter().find(|k| k.access_key == id) {
                return Ok(KeyState::from_key(key));
            }
        }

        Err(ReconcileError::not_found(KIND, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgw_admin::{
        AccessLevel, AdminClient, AdminConfig, MemoryAdmin, SubuserSpec, User, UserSpec,
    };
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key(user: &str, access_key: &str, secret_key: &str) -> UserKey {
        UserKey {
            user: user.to_string(),
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    async fn setup() -> (Arc<MemoryAdmin>, Keys) {
        let admin = Arc::new(MemoryAdmin::new());
        let ctx = CallContext::new();
        admin
            .create_user(&ctx, &UserSpec::new("alice", "Alice"))
            .await
            .unwrap();
        admin
            .create_subuser(
                &ctx,
                "alice",
                &SubuserSpec {
                    name: "sub1".into(),
                    access: AccessLevel::Read,
                    generate_secret: Some(false),
                },
            )
            .await
            .unwrap();
        let keys = Keys::new(admin.clone());
        (admin, keys)
    }

    #[test]
    fn test_select_new_key() {
        let seen: HashSet<String> = ["AK1", "AK2"].into_iter().map(String::from).collect();
        let keys = [
            key("alice", "AK1", "SK1"),
            key("alice", "AK2", "SK2"),
            key("alice", "AK3", "SK3"),
        ];

        let selected = select_new_key(&seen, &keys).unwrap();
        assert_eq!(selected.access_key, "AK3");
        assert_eq!(selected.secret_key, "SK3");

        let state = KeyState::from_key(selected);
        assert_eq!(state.user, "alice");
        assert_eq!(state.subuser, None);
    }

    #[test]
    fn test_select_new_key_splits_subuser_owner() {
        let seen: HashSet<String> = ["AK1".to_string()].into();
        let keys = [key("alice", "AK1", "SK1"), key("alice:sub1", "AK3", "SK3")];

        let state = KeyState::from_key(select_new_key(&seen, &keys).unwrap());
        assert_eq!(state.user, "alice");
        assert_eq!(state.subuser.as_deref(), Some("sub1"));
    }

    #[test]
    fn test_select_new_key_none_when_nothing_new() {
        let seen: HashSet<String> = ["AK1".to_string()].into();
        assert!(select_new_key(&seen, &[key("alice", "AK1", "SK9")]).is_none());
    }

    #[tokio::test]
    async fn test_create_generated_key_picks_new_one() {
        let (admin, keys) = setup().await;
        let ctx = CallContext::new();

        let first = keys
            .create(&ctx, &KeyState::generated("alice", None))
            .await
            .unwrap();
        let second = keys
            .create(&ctx, &KeyState::generated("alice", None))
            .await
            .unwrap();

        assert_ne!(first.access_key, second.access_key);
        assert_eq!(admin.user("alice").unwrap().keys.len(), 2);
        assert_eq!(keys.read(&ctx, &second).await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_create_for_subuser() {
        let (_, keys) = setup().await;
        let ctx = CallContext::new();

        let created = keys
            .create(&ctx, &KeyState::generated("alice", Some("sub1".into())))
            .await
            .unwrap();
        assert_eq!(created.user, "alice");
        assert_eq!(created.subuser.as_deref(), Some("sub1"));
        assert_eq!(created.secret_key_value().len(), 40);

        assert_eq!(keys.read(&ctx, &created).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_create_with_supplied_keys() {
        let (_, keys) = setup().await;
        let desired = KeyState {
            user: "alice".into(),
            subuser: None,
            access_key: Some("BYOACCESS".into()),
            secret_key: Some("BYOSECRET".into()),
        };

        let created = keys.create(&CallContext::new(), &desired).await.unwrap();
        assert_eq!(created, desired);
    }

    #[tokio::test]
    async fn test_create_with_only_access_key_generates_the_rest() {
        let (_, keys) = setup().await;
        let desired = KeyState {
            user: "alice".into(),
            subuser: None,
            access_key: Some("MYACCESS".into()),
            secret_key: Some(String::new()),
        };

        let created = keys.create(&CallContext::new(), &desired).await.unwrap();
        assert_eq!(created.access_key.as_deref(), Some("MYACCESS"));
        assert_eq!(created.secret_key_value().len(), 40);
    }

    async fn mount_empty_user(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/admin/user"))
            .and(query_param("uid", "demo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_id": "demo",
                "keys": []
            })))
            .mount(server)
            .await;
    }

    fn http_keys(server: &MockServer) -> Keys {
        let client = AdminClient::new(AdminConfig::new(server.uri(), "AK", "SK")).unwrap();
        Keys::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_create_over_http_requests_generation_for_blank_half() {
        let server = MockServer::start().await;
        mount_empty_user(&server).await;
        Mock::given(method("PUT"))
            .and(path("/admin/user"))
            .and(query_param("key", ""))
            .and(query_param("uid", "demo"))
            .and(query_param("subuser", "sub1"))
            .and(query_param("access-key", "MYACCESS"))
            .and(query_param("generate-key", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"user": "demo:sub1", "access_key": "MYACCESS", "secret_key": "GENERATED"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let desired = KeyState {
            user: "demo".into(),
            subuser: Some("sub1".into()),
            access_key: Some("MYACCESS".into()),
            secret_key: None,
        };
        let created = http_keys(&server)
            .create(&CallContext::new(), &desired)
            .await
            .unwrap();

        assert_eq!(created.subuser.as_deref(), Some("sub1"));
        assert_eq!(created.secret_key.as_deref(), Some("GENERATED"));
    }

    #[tokio::test]
    async fn test_create_over_http_sends_supplied_keys_without_generation() {
        let server = MockServer::start().await;
        mount_empty_user(&server).await;
        Mock::given(method("PUT"))
            .and(path("/admin/user"))
            .and(query_param("key", ""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"user": "demo", "access_key": "BYOACCESS", "secret_key": "BYOSECRET"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let desired = KeyState {
            user: "demo".into(),
            subuser: None,
            access_key: Some("BYOACCESS".into()),
            secret_key: Some("BYOSECRET".into()),
        };
        let created = http_keys(&server)
            .create(&CallContext::new(), &desired)
            .await
            .unwrap();
        assert_eq!(created, desired);

        let requests = server.received_requests().await.unwrap();
        let create = requests.iter().find(|r| r.method.as_str() == "PUT").unwrap();
        let params: Vec<(String, String)> = create
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(params.contains(&("access-key".into(), "BYOACCESS".into())));
        assert!(params.contains(&("secret-key".into(), "BYOSECRET".into())));
        assert!(params.iter().all(|(name, _)| name != "generate-key"));
    }

    #[tokio::test]
    async fn test_regenerated_key_keeps_declared_values() {
        let (admin, keys) = setup().await;
        let ctx = CallContext::new();
        admin.insert_user(User {
            keys: vec![key("alice", "AK1", "SK1")],
            ..admin.user("alice").unwrap()
        });

        let desired = KeyState {
            user: "alice".into(),
            subuser: None,
            access_key: Some("AK1".into()),
            secret_key: Some("SK2".into()),
        };
        let created = keys.create(&ctx, &desired).await.unwrap();
        assert_eq!(created, desired);

        let user = admin.user("alice").unwrap();
        assert_eq!(user.keys.len(), 1);
        assert_eq!(user.keys[0].secret_key, "SK2");
    }

    #[tokio::test]
    async fn test_read_requires_exact_match() {
        let (_, keys) = setup().await;
        let ctx = CallContext::new();
        let created = keys
            .create(&ctx, &KeyState::generated("alice", None))
            .await
            .unwrap();

        let wrong_secret = KeyState {
            secret_key: Some("nope".into()),
            ..created.clone()
        };
        assert!(keys.read(&ctx, &wrong_secret).await.unwrap_err().is_not_found());

        let wrong_owner = KeyState {
            subuser: Some("sub1".into()),
            ..created
        };
        assert!(keys.read(&ctx, &wrong_owner).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_import_scans_all_users() {
        let (admin, keys) = setup().await;
        let ctx = CallContext::new();
        admin.insert_user(User {
            id: "bob".into(),
            display_name: "Bob".into(),
            keys: vec![key("bob", "BOBKEY", "BOBSECRET")],
            ..Default::default()
        });
        let created = keys
            .create(&ctx, &KeyState::generated("alice", Some("sub1".into())))
            .await
            .unwrap();

        let imported = keys.import(&ctx, "BOBKEY").await.unwrap();
        assert_eq!(imported.user, "bob");
        assert_eq!(imported.secret_key.as_deref(), Some("BOBSECRET"));

        let imported = keys.import(&ctx, created.access_key_value()).await.unwrap();
        assert_eq!(imported, created);

        assert!(keys.import(&ctx, "MISSING").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let (_, keys) = setup().await;
        let ctx = CallContext::new();
        let created = keys
            .create(&ctx, &KeyState::generated("alice", Some("sub1".into())))
            .await
            .unwrap();

        keys.delete(&ctx, &created).await.unwrap();
        assert!(keys.read(&ctx, &created).await.unwrap_err().is_not_found());

        // a second delete surfaces the gateway error
        let err = keys.delete(&ctx, &created).await.unwrap_err();
        assert!(matches!(err, ReconcileError::Api { operation: "delete", .. }));
    }

    #[tokio::test]
    async fn test_update_is_unsupported() {
        let (_, keys) = setup().await;
        let err = keys
            .update(&CallContext::new(), &KeyState::generated("alice", None))
            .await
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Unsupported { kind: "key", .. }));
    }
}
