//! Error types for the workspace engine

use crate::types::{UserId, WorkspaceId};
use dayflow_common::RateLimitExceeded;
use dayflow_config::ConfigError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for workspace operations
pub type Result<T> = std::result::Result<T, WorkspaceError>;

/// Message shown to clients in place of internal failures
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong";

/// Client-facing classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthenticated,
    Forbidden,
    NotFound,
    BadRequest,
    RateLimitExceeded,
    Internal,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCode::Unauthenticated => "UNAUTHENTICATED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorCode::Internal => "INTERNAL",
        };
        f.write_str(s)
    }
}

/// Why a caller does not hold a live lease
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LeaseDenial {
    /// Nobody holds the lease
    NoLease,
    /// The stored lease ran out; `holder` was the last one to refresh it
    Expired { holder: UserId },
    /// Another user holds a live lease
    HeldByOther { holder: UserId },
}

impl std::fmt::Display for LeaseDenial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaseDenial::NoLease => f.write_str("nobody holds the editing lock"),
            LeaseDenial::Expired { .. } => f.write_str("the editing lock has expired"),
            LeaseDenial::HeldByOther { .. } => f.write_str("someone else is editing"),
        }
    }
}

/// Errors that can occur in workspace operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// No authenticated user on the request
    #[error("not authenticated")]
    Unauthenticated,

    /// Entity absent, or present but not visible to the caller
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Caller can see the workspace but may not perform the action
    #[error("forbidden: {action}")]
    Forbidden { action: String },

    /// A workspace-scoped mutation without a live lease
    #[error("you cannot edit this workspace: {reason}")]
    LockNotHeld {
        workspace_id: WorkspaceId,
        reason: LeaseDenial,
    },

    /// Acquiring a lease another user holds
    #[error("someone else is editing this workspace")]
    LockConflict {
        workspace_id: WorkspaceId,
        holder: Option<UserId>,
    },

    /// Target container does not exist or lives in another workspace
    #[error("invalid target: {message}")]
    InvalidTarget { message: String },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Creation limit reached
    #[error("limit reached: at most {limit} {resource}")]
    LimitReached { resource: &'static str, limit: u32 },

    /// Unique value already taken
    #[error("{resource} already exists: {value}")]
    AlreadyExists { resource: &'static str, value: String },

    /// Too many requests from one caller
    #[error(transparent)]
    RateLimited(#[from] RateLimitExceeded),

    /// SQLite error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl WorkspaceError {
    /// Create a not-found error
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    /// Create an invalid target error
    pub fn invalid_target(message: impl Into<String>) -> Self {
        Self::InvalidTarget {
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Classify for clients
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Unauthenticated => ErrorCode::Unauthenticated,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Forbidden { .. } | Self::LockNotHeld { .. } => ErrorCode::Forbidden,
            Self::LockConflict { .. }
            | Self::InvalidTarget { .. }
            | Self::InvalidValue { .. }
            | Self::LimitReached { .. }
            | Self::AlreadyExists { .. } => ErrorCode::BadRequest,
            Self::RateLimited(_) => ErrorCode::RateLimitExceeded,
            Self::Database(_) | Self::Json(_) | Self::Config(_) => ErrorCode::Internal,
        }
    }

    /// True for a failed acquire because someone else holds the lease
    pub fn is_lock_conflict(&self) -> bool {
        matches!(self, Self::LockConflict { .. })
    }

    /// True when the caller lacked a live lease for a guarded mutation
    pub fn is_lock_not_held(&self) -> bool {
        matches!(self, Self::LockNotHeld { .. })
    }

    /// Check if a client could reasonably try again later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockConflict { .. } | Self::RateLimited(_))
    }

    /// Convert to the shape sent to clients, hiding internal details
    pub fn to_client_error(&self) -> ClientError {
        let code = self.code();
        let message = if code == ErrorCode::Internal {
            tracing::error!(error = %self, "internal error");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        };
        ClientError { code, message }
    }
}

/// Error as delivered to a client
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ClientError {
    pub code: ErrorCode,
    pub message: String,
}

impl ClientError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_lock_conflict(&self) -> bool {
        self.code == ErrorCode::BadRequest && self.message == LOCK_CONFLICT_MESSAGE
    }
}

/// Message carried by [`WorkspaceError::LockConflict`]
pub const LOCK_CONFLICT_MESSAGE: &str = "someone else is editing this workspace";

impl From<WorkspaceError> for ClientError {
    fn from(error: WorkspaceError) -> Self {
        error.to_client_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkspaceError::not_found("card", "c1");
        assert_eq!(err.to_string(), "card not found: c1");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_lock_conflict_is_bad_request() {
        let err = WorkspaceError::LockConflict {
            workspace_id: WorkspaceId::from("w"),
            holder: Some(UserId::from("a")),
        };
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert!(err.is_lock_conflict());
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), LOCK_CONFLICT_MESSAGE);
        assert!(err.to_client_error().is_lock_conflict());
    }

    #[test]
    fn test_lock_not_held_is_forbidden_with_reason() {
        let err = WorkspaceError::LockNotHeld {
            workspace_id: WorkspaceId::from("w"),
            reason: LeaseDenial::HeldByOther {
                holder: UserId::from("a"),
            },
        };
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert!(err.is_lock_not_held());
        assert!(err.to_string().contains("someone else is editing"));
    }

    #[test]
    fn test_internal_errors_are_hidden() {
        let err = WorkspaceError::Database(rusqlite::Error::QueryReturnedNoRows);
        let client = err.to_client_error();
        assert_eq!(client.code, ErrorCode::Internal);
        assert_eq!(client.message, INTERNAL_ERROR_MESSAGE);
    }

    #[test]
    fn test_client_error_serializes_code() {
        let client = ClientError::new(ErrorCode::RateLimitExceeded, "slow down");
        let json = serde_json::to_value(&client).unwrap();
        assert_eq!(json["code"], "RATE_LIMIT_EXCEEDED");
    }
}
