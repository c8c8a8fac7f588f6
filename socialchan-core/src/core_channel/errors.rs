//! Error types for channel operations

use super::policy::Operation;
use super::types::{AccountId, ChannelId};
use thiserror::Error;

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors returned by the channel service and its collaborators
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Actor is not the owner for an owner-gated operation
    #[error("Permission denied: {actor} cannot {operation} in channel {channel}")]
    PermissionDenied {
        actor: AccountId,
        operation: Operation,
        channel: ChannelId,
    },

    /// Account does not resolve in the account directory
    #[error("Invalid account: {0}")]
    InvalidAccount(AccountId),

    /// Channel does not exist
    #[error("Invalid channel: {0}")]
    InvalidChannel(ChannelId),

    /// Input violates configured limits
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Persistence collaborator failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ChannelError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ChannelError::PermissionDenied { .. })
    }
}

impl From<rusqlite::Error> for ChannelError {
    fn from(e: rusqlite::Error) -> Self {
        ChannelError::Storage(e.to_string())
    }
}

impl From<r2d2::Error> for ChannelError {
    fn from(e: r2d2::Error) -> Self {
        ChannelError::Storage(format!("connection pool: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_display() {
        let err = ChannelError::PermissionDenied {
            actor: AccountId::new("bob"),
            operation: Operation::AddParticipant,
            channel: ChannelId::from_bytes([0; 16]),
        };
        assert_eq!(
            err.to_string(),
            "Permission denied: bob cannot add_participant in channel 00000000000000000000000000000000"
        );
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_sqlite_errors_become_storage() {
        let err: ChannelError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, ChannelError::Storage(_)));
        assert!(!err.is_permission_denied());
    }
}
