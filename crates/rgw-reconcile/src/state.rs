//! Declarative state records exchanged with the collaborator

use rgw_admin::ident::{join_owner, split_owner};
use rgw_admin::{AccessLevel, BucketStat, UserKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key entry listed on a user record
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEntry {
    /// Owner, either `user` or `user:subuser`
    pub user: String,
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for KeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyEntry")
            .field("user", &self.user)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl From<&UserKey> for KeyEntry {
    fn from(key: &UserKey) -> Self {
        Self {
            user: key.user.clone(),
            access_key: key.access_key.clone(),
            secret_key: key.secret_key.clone(),
        }
    }
}

/// User record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub user_id: String,
    pub display_name: String,
    /// Keys of the user and its subusers, filled on read
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<KeyEntry>,
}

impl UserState {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            keys: Vec::new(),
        }
    }
}

/// Subuser record, keyed by parent user and local name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubuserState {
    /// Parent user ID
    pub user_id: String,
    /// Local name without the `user:` prefix
    pub subuser: String,
    #[serde(default)]
    pub access: AccessLevel,
}

impl SubuserState {
    pub fn new(user_id: impl Into<String>, subuser: impl Into<String>, access: AccessLevel) -> Self {
        Self {
            user_id: user_id.into(),
            subuser: subuser.into(),
            access,
        }
    }

    /// External identifier (`user:subuser`)
    pub fn id(&self) -> String {
        join_owner(&self.user_id, Some(self.subuser.as_str()))
    }
}

/// Key record
///
/// Blank access or secret key on create asks the gateway to generate both.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subuser: Option<String>,
    #[serde(default)]
    pub access_key: Option<String>,
    #[serde(default)]
    pub secret_key: Option<String>,
}

impl fmt::Debug for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyState")
            .field("user", &self.user)
            .field("subuser", &self.subuser)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl KeyState {
    /// Key record for a user or subuser with gateway-generated credentials
    pub fn generated(user: impl Into<String>, subuser: Option<String>) -> Self {
        Self {
            user: user.into(),
            subuser,
            access_key: None,
            secret_key: None,
        }
    }

    /// Observed record for a key reported by the gateway
    pub fn from_key(key: &UserKey) -> Self {
        let (user, subuser) = split_owner(&key.user);
        Self {
            user: user.to_string(),
            subuser: subuser.map(str::to_string),
            access_key: Some(key.access_key.clone()),
            secret_key: Some(key.secret_key.clone()),
        }
    }

    /// Subuser local name, treating an empty string as absent
    pub fn subuser_name(&self) -> Option<&str> {
        self.subuser.as_deref().filter(|s| !s.is_empty())
    }

    /// Owner string the gateway reports for this key
    pub fn owner(&self) -> String {
        join_owner(&self.user, self.subuser_name())
    }

    /// Access key value, empty when unset
    pub fn access_key_value(&self) -> &str {
        self.access_key.as_deref().unwrap_or_default()
    }

    /// Secret key value, empty when unset
    pub fn secret_key_value(&self) -> &str {
        self.secret_key.as_deref().unwrap_or_default()
    }
}

/// Bucket entry of the buckets data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketEntry {
    pub bucket: String,
    pub owner: String,
}

impl From<BucketStat> for BucketEntry {
    fn from(stat: BucketStat) -> Self {
        Self {
            bucket: stat.bucket,
            owner: stat.owner,
        }
    }
}

/// Buckets data source record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketsState {
    pub buckets: Vec<BucketEntry>,
}
