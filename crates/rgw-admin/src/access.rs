//! Subuser access levels
//!
//! The admin API accepts one set of literals when a subuser is created or
//! modified and echoes a different set when the user is read back:
//!
//! | level      | request     | reply          |
//! |------------|-------------|----------------|
//! | none       | `""`        | `<none>`       |
//! | read       | `read`      | `read`         |
//! | write      | `write`     | `write`        |
//! | read-write | `readwrite` | `read-write`   |
//! | full       | `full`      | `full-control` |
//!
//! [`AccessLevel`] is the canonical form. Reads go through
//! [`normalize_access`] so observed state compares equal to declared state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const REQUEST_NONE: &str = "";
pub const REQUEST_READ: &str = "read";
pub const REQUEST_WRITE: &str = "write";
pub const REQUEST_READ_WRITE: &str = "readwrite";
pub const REQUEST_FULL: &str = "full";

pub const REPLY_NONE: &str = "<none>";
pub const REPLY_READ: &str = "read";
pub const REPLY_WRITE: &str = "write";
pub const REPLY_READ_WRITE: &str = "read-write";
pub const REPLY_FULL: &str = "full-control";

/// Map a reply-form literal to its request-form literal
///
/// Anything that is not a reply-form literal is returned unchanged, so
/// request-form values and values introduced by newer gateways pass through.
pub fn normalize_access(value: &str) -> &str {
    match value {
        REPLY_NONE => REQUEST_NONE,
        REPLY_READ => REQUEST_READ,
        REPLY_WRITE => REQUEST_WRITE,
        REPLY_READ_WRITE => REQUEST_READ_WRITE,
        REPLY_FULL => REQUEST_FULL,
        other => other,
    }
}

/// Error for access level strings outside the request vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown access level {0:?}: expected one of none, read, write, readwrite, full")]
pub struct UnknownAccessLevel(pub String);

/// Subuser access level
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccessLevel {
    #[default]
    None,
    Read,
    Write,
    ReadWrite,
    Full,
    /// A literal this client does not know, kept verbatim
    Unrecognized(String),
}

impl AccessLevel {
    /// Literal sent to the admin API on create/modify
    pub fn as_request_str(&self) -> &str {
        match self {
            Self::None => REQUEST_NONE,
            Self::Read => REQUEST_READ,
            Self::Write => REQUEST_WRITE,
            Self::ReadWrite => REQUEST_READ_WRITE,
            Self::Full => REQUEST_FULL,
            Self::Unrecognized(value) => value.as_str(),
        }
    }

    /// Literal the admin API echoes back on read
    pub fn as_reply_str(&self) -> &str {
        match self {
            Self::None => REPLY_NONE,
            Self::Read => REPLY_READ,
            Self::Write => REPLY_WRITE,
            Self::ReadWrite => REPLY_READ_WRITE,
            Self::Full => REPLY_FULL,
            Self::Unrecognized(value) => value.as_str(),
        }
    }

    /// Interpret a literal echoed by the admin API on read
    pub fn from_reply(value: &str) -> Self {
        Self::from_request_lenient(normalize_access(value))
    }

    fn from_request_lenient(value: &str) -> Self {
        value
            .parse()
            .unwrap_or_else(|_| Self::Unrecognized(value.to_string()))
    }
}

impl FromStr for AccessLevel {
    type Err = UnknownAccessLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            REQUEST_NONE | "none" => Ok(Self::None),
            REQUEST_READ => Ok(Self::Read),
            REQUEST_WRITE => Ok(Self::Write),
            REQUEST_READ_WRITE => Ok(Self::ReadWrite),
            REQUEST_FULL => Ok(Self::Full),
            other => Err(UnknownAccessLevel(other.to_string())),
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_request_str())
    }
}

impl From<String> for AccessLevel {
    fn from(value: String) -> Self {
        Self::from_request_lenient(&value)
    }
}

impl From<AccessLevel> for String {
    fn from(level: AccessLevel) -> Self {
        match level {
            AccessLevel::Unrecognized(value) => value,
            other => other.as_request_str().to_string(),
        }
    }
}
