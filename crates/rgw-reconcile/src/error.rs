//! Reconciler error types

use rgw_admin::AdminError;
use thiserror::Error;

/// Result type for reconciler operations
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors returned to the collaborator by reconciler operations
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The entity no longer exists on the gateway
    #[error("{kind} {id:?} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid {kind} identifier {id:?}: {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        id: String,
        reason: &'static str,
    },

    #[error("{kind} does not support this operation: {reason}")]
    Unsupported {
        kind: &'static str,
        reason: &'static str,
    },

    /// An admin API call failed
    #[error("could not {operation} {kind} {id:?}: {source}")]
    Api {
        operation: &'static str,
        kind: &'static str,
        id: String,
        #[source]
        source: AdminError,
    },
}

impl ReconcileError {
    /// Create a not found error
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create an invalid identifier error
    pub fn invalid_identifier(kind: &'static str, id: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidIdentifier {
            kind,
            id: id.into(),
            reason,
        }
    }

    /// Wrap an admin API failure with the operation and attempted id
    pub fn api(
        operation: &'static str,
        kind: &'static str,
        id: impl Into<String>,
        source: AdminError,
    ) -> Self {
        Self::Api {
            operation,
            kind,
            id: id.into(),
            source,
        }
    }

    /// Check if the collaborator should drop the entity from its state
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Underlying admin API error, if any
    #[must_use]
    pub fn admin_error(&self) -> Option<&AdminError> {
        match self {
            Self::Api { source, .. } => Some(source),
            _ => None,
        }
    }
}
