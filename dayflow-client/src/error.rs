//! Error types for client-side workspace state

use dayflow_workspace::order::PlanError;
use dayflow_workspace::{ClientError, ErrorCode, WorkspaceError};
use thiserror::Error;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors seen by client code
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the request
    #[error("{0}")]
    Server(ClientError),

    /// A response did not have the expected shape
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No workspace has been loaded yet
    #[error("no workspace is loaded")]
    NotLoaded,

    /// The local copy has no such entity
    #[error("{resource} not found locally: {id}")]
    Missing { resource: &'static str, id: String },

    /// A requested ordering does not fit the local list
    #[error("invalid order: {0}")]
    InvalidOrder(#[from] PlanError),

    /// The undo buffer is empty
    #[error("nothing to undo")]
    NothingToUndo,
}

impl ApiError {
    pub fn missing(resource: &'static str, id: impl std::fmt::Display) -> Self {
        Self::Missing {
            resource,
            id: id.to_string(),
        }
    }

    /// Error code reported by the server, if the server produced this error
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Server(error) => Some(error.code),
            _ => None,
        }
    }

    /// True when the server refused because the caller lacks the editing lock
    pub fn is_forbidden(&self) -> bool {
        self.code() == Some(ErrorCode::Forbidden)
    }
}

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        Self::Server(error)
    }
}

impl From<WorkspaceError> for ApiError {
    fn from(error: WorkspaceError) -> Self {
        Self::Server(error.to_client_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayflow_workspace::WorkspaceId;

    #[test]
    fn test_server_errors_keep_their_code() {
        let error: ApiError = WorkspaceError::not_found("card", "c1").into();
        assert_eq!(error.code(), Some(ErrorCode::NotFound));
        assert!(!error.is_forbidden());

        let error: ApiError = WorkspaceError::LockNotHeld {
            workspace_id: WorkspaceId::from("w"),
            reason: dayflow_workspace::LeaseDenial::NoLease,
        }
        .into();
        assert!(error.is_forbidden());
    }

    #[test]
    fn test_local_errors_have_no_code() {
        assert_eq!(ApiError::NothingToUndo.code(), None);
        assert_eq!(
            ApiError::missing("card", "c9").to_string(),
            "card not found locally: c9"
        );
    }
}
