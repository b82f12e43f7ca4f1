//! Admin API entity and request types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::access::AccessLevel;

/// A gateway user as returned by `GET /admin/user`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    #[serde(rename = "user_id")]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub display_name: String,
    /// Email address (empty when unset)
    #[serde(default)]
    pub email: String,
    /// Non-zero when the user is suspended
    #[serde(default)]
    pub suspended: u8,
    /// Subusers, with fully qualified `user:subuser` names
    #[serde(default)]
    pub subusers: Vec<Subuser>,
    /// S3 keys of the user and all of its subusers
    #[serde(default)]
    pub keys: Vec<UserKey>,
}

impl User {
    /// Check if user is suspended
    pub fn is_suspended(&self) -> bool {
        self.suspended != 0
    }
}

/// A subuser entry inside a [`User`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subuser {
    /// Fully qualified name (`user:subuser`)
    #[serde(rename = "id")]
    pub name: String,
    /// Access level in reply form (see [`crate::access`])
    #[serde(rename = "permissions", default)]
    pub access: String,
}

impl Subuser {
    /// Access level normalized to the request vocabulary
    pub fn access_level(&self) -> AccessLevel {
        AccessLevel::from_reply(&self.access)
    }
}

/// An S3 key pair as returned by the admin API
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserKey {
    /// Owner, either `user` or `user:subuser`
    pub user: String,
    /// Access key ID
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
}

impl fmt::Debug for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserKey")
            .field("user", &self.user)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// A bucket entry from `GET /admin/bucket?stats=true`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketStat {
    /// Bucket name
    pub bucket: String,
    /// Owning user ID
    #[serde(default)]
    pub owner: String,
}

/// Cluster identity from `GET /admin/info`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub cluster_id: String,
}

/// Parameters for creating or modifying a user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSpec {
    pub id: String,
    pub display_name: String,
    pub email: Option<String>,
}

impl UserSpec {
    /// Create a user spec
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: None,
        }
    }
}

/// Parameters for creating or modifying a subuser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubuserSpec {
    /// Local subuser name (without the `user:` prefix)
    pub name: String,
    pub access: AccessLevel,
    /// Whether the gateway should generate a secret alongside the subuser
    pub generate_secret: Option<bool>,
}

/// Key types understood by the admin API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyType {
    #[default]
    S3,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S3 => "s3",
        }
    }
}

/// Parameters for creating or removing a key
#[derive(Clone, Default, PartialEq, Eq)]
pub struct KeySpec {
    /// User receiving (or owning) the key
    pub uid: String,
    /// Subuser receiving the key, if any
    pub subuser: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub key_type: KeyType,
    /// Ask the gateway to generate the pair
    pub generate_key: Option<bool>,
}

impl fmt::Debug for KeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySpec")
            .field("uid", &self.uid)
            .field("subuser", &self.subuser)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("key_type", &self.key_type)
            .field("generate_key", &self.generate_key)
            .finish()
    }
}
