//! HTTP client for the radosgw admin API
//!
//! Every call is a single signed request. Query parameters select the
//! operation (`format=json` is always sent) and empty parameter values are
//! left out. Non-2xx answers keep their raw body for diagnostics.
//! Reference: https://docs.ceph.com/en/latest/radosgw/adminops/

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::AdminApi;
use crate::config::{AdminConfig, Credentials};
use crate::context::CallContext;
use crate::error::{AdminError, Result};
use crate::signer::sign_request;
use crate::types::{BucketStat, ClusterInfo, KeySpec, SubuserSpec, User, UserKey, UserSpec};

const INFO_PATH: &str = "/admin/info";
const USER_PATH: &str = "/admin/user";
const USER_LIST_PATH: &str = "/admin/metadata/user";
const BUCKET_PATH: &str = "/admin/bucket";

/// Selector for subuser operations on `/admin/user`
const SUBUSER_SELECTOR: &str = "subuser";
/// Selector for key operations on `/admin/user`
const KEY_SELECTOR: &str = "key";

/// Envelope of the `/admin/info` response
#[derive(Debug, Default, Deserialize)]
struct InfoResponse {
    #[serde(default)]
    info: InfoBody,
}

#[derive(Debug, Default, Deserialize)]
struct InfoBody {
    #[serde(default)]
    storage_backends: Vec<StorageBackend>,
    /// Flat form reported by some gateway builds
    #[serde(default)]
    cluster_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct StorageBackend {
    #[serde(default)]
    cluster_id: String,
}

impl InfoBody {
    /// First non-empty cluster ID, preferring the storage backends
    fn cluster_id(self) -> Option<String> {
        self.storage_backends
            .into_iter()
            .map(|backend| backend.cluster_id)
            .chain(std::iter::once(self.cluster_id))
            .find(|id| !id.is_empty())
    }
}

/// Signed admin API client
///
/// Holds only immutable configuration and a pooled HTTP client, so clones
/// can be shared freely between concurrent reconciler calls.
#[derive(Debug, Clone)]
pub struct AdminClient {
    endpoint: Url,
    credentials: Credentials,
    http: reqwest::Client,
}

impl AdminClient {
    /// Create a client after validating the configuration
    pub fn new(config: AdminConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            AdminError::InvalidConfig(format!("invalid endpoint {:?}: {e}", config.endpoint))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AdminError::InvalidConfig(format!(
                "endpoint must be http or https, got {:?}",
                endpoint.scheme()
            )));
        }

        let access_key_id = config.credentials.access_key_id();
        if access_key_id.is_empty() || !access_key_id.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(AdminError::InvalidConfig(
                "access key id must be a non-empty printable string".to_string(),
            ));
        }
        if config.credentials.secret_access_key().is_empty() {
            return Err(AdminError::InvalidConfig(
                "secret access key must not be empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AdminError::InvalidConfig(e.to_string()))?;

        debug!(
            endpoint = %endpoint,
            access_key_id = %access_key_id,
            "creating radosgw admin client"
        );

        Ok(Self {
            endpoint,
            credentials: config.credentials,
            http,
        })
    }

    /// Base URL of the gateway
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the URL for an admin path, optional selector and parameters
    fn url(&self, path: &str, selector: Option<&str>, params: &[(&str, &str)]) -> Url {
        let mut url = self.endpoint.clone();
        let base = self.endpoint.path().trim_end_matches('/');
        url.set_path(&format!("{base}{path}"));

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            if let Some(selector) = selector {
                query.append_key_only(selector);
            }
            query.append_pair("format", "json");
            for (key, value) in params {
                if !value.is_empty() {
                    query.append_pair(key, value);
                }
            }
        }

        url
    }

    /// Send a signed request and return the body of a successful response
    async fn call(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        selector: Option<&str>,
        params: &[(&str, &str)],
    ) -> Result<String> {
        let url = self.url(path, selector, params);
        let mut request = self.http.request(method, url).build()?;
        sign_request(&mut request, &self.credentials)
            .map_err(|e| AdminError::InvalidConfig(format!("could not sign request: {e}")))?;

        let method = request.method().clone();
        let path = request.url().path().to_string();

        ctx.run(async move {
            let response = self.http.execute(request).await?;
            let status = response.status();
            let body = response.text().await?;

            debug!(%method, %path, status = status.as_u16(), "radosgw admin call");

            if !status.is_success() {
                return Err(AdminError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                });
            }
            Ok(body)
        })
        .await
    }

    /// Send a signed request and decode the JSON body
    async fn call_json<T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        selector: Option<&str>,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let body = self.call(ctx, method, path, selector, params).await?;
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| AdminError::MalformedResponse(e.to_string()))
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "true",
        Some(false) => "false",
        None => "",
    }
}

#[async_trait]
impl AdminApi for AdminClient {
    async fn info(&self, ctx: &CallContext) -> Result<ClusterInfo> {
        let response: InfoResponse = self
            .call_json(ctx, Method::GET, INFO_PATH, None, &[])
            .await?;

        let cluster_id = response.info.cluster_id().ok_or_else(|| {
            AdminError::invalid_response("info.storage_backends has no cluster_id")
        })?;
        Ok(ClusterInfo { cluster_id })
    }

    async fn list_buckets(&self, ctx: &CallContext) -> Result<Vec<BucketStat>> {
        self.call_json(ctx, Method::GET, BUCKET_PATH, None, &[("stats", "true")])
            .await
    }

    async fn get_user(&self, ctx: &CallContext, uid: &str) -> Result<User> {
        self.call_json(ctx, Method::GET, USER_PATH, None, &[("uid", uid)])
            .await
    }

    async fn list_users(&self, ctx: &CallContext) -> Result<Vec<String>> {
        self.call_json(ctx, Method::GET, USER_LIST_PATH, None, &[])
            .await
    }

    async fn create_user(&self, ctx: &CallContext, spec: &UserSpec) -> Result<User> {
        let params = [
            ("uid", spec.id.as_str()),
            ("display-name", spec.display_name.as_str()),
            ("email", spec.email.as_deref().unwrap_or_default()),
        ];
        self.call_json(ctx, Method::PUT, USER_PATH, None, &params)
            .await
    }

    async fn modify_user(&self, ctx: &CallContext, spec: &UserSpec) -> Result<User> {
        let params = [
            ("uid", spec.id.as_str()),
            ("display-name", spec.display_name.as_str()),
            ("email", spec.email.as_deref().unwrap_or_default()),
        ];
        self.call_json(ctx, Method::POST, USER_PATH, None, &params)
            .await
    }

    async fn remove_user(&self, ctx: &CallContext, uid: &str) -> Result<()> {
        self.call(ctx, Method::DELETE, USER_PATH, None, &[("uid", uid)])
            .await
            .map(|_| ())
    }

    async fn create_subuser(
        &self,
        ctx: &CallContext,
        uid: &str,
        spec: &SubuserSpec,
    ) -> Result<()> {
        let params = [
            ("uid", uid),
            ("subuser", spec.name.as_str()),
            ("access", spec.access.as_request_str()),
            ("generate-secret", flag(spec.generate_secret)),
        ];
        // The reply lists the user's subusers; callers have nothing to read from it.
        self.call(ctx, Method::PUT, USER_PATH, Some(SUBUSER_SELECTOR), &params)
            .await
            .map(|_| ())
    }

    async fn modify_subuser(
        &self,
        ctx: &CallContext,
        uid: &str,
        spec: &SubuserSpec,
    ) -> Result<()> {
        let params = [
            ("uid", uid),
            ("subuser", spec.name.as_str()),
            ("access", spec.access.as_request_str()),
            ("generate-secret", flag(spec.generate_secret)),
        ];
        self.call(ctx, Method::POST, USER_PATH, Some(SUBUSER_SELECTOR), &params)
            .await
            .map(|_| ())
    }

    async fn remove_subuser(&self, ctx: &CallContext, uid: &str, name: &str) -> Result<()> {
        let params = [("uid", uid), ("subuser", name)];
        self.call(ctx, Method::DELETE, USER_PATH, Some(SUBUSER_SELECTOR), &params)
            .await
            .map(|_| ())
    }

    async fn create_key(&self, ctx: &CallContext, spec: &KeySpec) -> Result<Vec<UserKey>> {
        let params = [
            ("uid", spec.uid.as_str()),
            ("subuser", spec.subuser.as_deref().unwrap_or_default()),
            ("key-type", spec.key_type.as_str()),
            ("access-key", spec.access_key.as_deref().unwrap_or_default()),
            ("secret-key", spec.secret_key.as_deref().unwrap_or_default()),
            ("generate-key", flag(spec.generate_key)),
        ];
        self.call_json(ctx, Method::PUT, USER_PATH, Some(KEY_SELECTOR), &params)
            .await
    }

    async fn remove_key(&self, ctx: &CallContext, spec: &KeySpec) -> Result<()> {
        let params = [
            ("uid", spec.uid.as_str()),
            ("subuser", spec.subuser.as_deref().unwrap_or_default()),
            ("key-type", spec.key_type.as_str()),
            ("access-key", spec.access_key.as_deref().unwrap_or_default()),
        ];
        self.call(ctx, Method::DELETE, USER_PATH, Some(KEY_SELECTOR), &params)
            .await
            .map(|_| ())
    }
}
